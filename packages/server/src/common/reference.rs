//! Customer-facing reference codes.
//!
//! A reference code scopes one delivery: its selection history, its lock, its
//! edit requests and at most one review. Codes are compared case-insensitively,
//! so every code is normalized to upper case at the boundary and only the
//! normalized form is ever stored.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

const MAX_LEN: usize = 64;

/// A validated, upper-cased reference code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct ReferenceId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceIdError {
    #[error("reference id is required")]
    Empty,

    #[error("reference id must be at most {MAX_LEN} characters")]
    TooLong,

    #[error("reference id may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

impl ReferenceId {
    pub fn parse(raw: &str) -> Result<Self, ReferenceIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReferenceIdError::Empty);
        }
        if trimmed.chars().count() > MAX_LEN {
            return Err(ReferenceIdError::TooLong);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ReferenceIdError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReferenceId {
    type Err = ReferenceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferenceId {
    type Error = ReferenceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferenceId> for String {
    fn from(id: ReferenceId) -> Self {
        id.0
    }
}

impl AsRef<str> for ReferenceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let id = ReferenceId::parse("  abc123 ").unwrap();
        assert_eq!(id.as_str(), "ABC123");
        assert_eq!(id, ReferenceId::parse("ABC123").unwrap());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(ReferenceId::parse("   "), Err(ReferenceIdError::Empty));
    }

    #[test]
    fn test_rejects_path_characters() {
        assert_eq!(
            ReferenceId::parse("abc/../x"),
            Err(ReferenceIdError::InvalidCharacter)
        );
    }

    #[test]
    fn test_rejects_overlong() {
        let raw = "a".repeat(MAX_LEN + 1);
        assert_eq!(ReferenceId::parse(&raw), Err(ReferenceIdError::TooLong));
    }

    #[test]
    fn test_deserialize_validates() {
        let id: ReferenceId = serde_json::from_str("\"wed-2024_07\"").unwrap();
        assert_eq!(id.as_str(), "WED-2024_07");
        assert!(serde_json::from_str::<ReferenceId>("\"bad code\"").is_err());
    }
}
