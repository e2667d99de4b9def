use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::kernel::{DEFAULT_ORIGIN_URL, DEFAULT_SELECTION_RETRY_BUDGET};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Asset URL template with an `{id}` placeholder
    pub blob_origin_url: String,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub selection_retry_budget: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "studio".to_string()),
            blob_origin_url: env::var("BLOB_ORIGIN_URL")
                .unwrap_or_else(|_| DEFAULT_ORIGIN_URL.to_string()),
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            selection_retry_budget: match env::var("SELECTION_RETRY_BUDGET") {
                Ok(raw) => raw
                    .parse()
                    .context("SELECTION_RETRY_BUDGET must be a positive number")?,
                Err(_) => DEFAULT_SELECTION_RETRY_BUDGET,
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins("").is_empty());
        assert_eq!(
            parse_origins(" https://a.example.com, ,https://b.example.com "),
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }
}
