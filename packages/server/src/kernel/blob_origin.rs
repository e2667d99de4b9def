//! HTTP blob origin (Google Drive public downloads by default).

use async_trait::async_trait;
use axum::http::{header, HeaderValue};
use futures::{StreamExt, TryStreamExt};
use tracing::warn;
use url::Url;

use super::{BaseBlobOrigin, BlobOriginError, OriginResponse};

pub const DEFAULT_ORIGIN_URL: &str = "https://drive.google.com/uc?export=download&id={id}";

/// Fetches assets from an HTTPS origin addressed by a URL template with an
/// `{id}` placeholder.
pub struct HttpBlobOrigin {
    http_client: reqwest::Client,
    url_template: String,
}

impl HttpBlobOrigin {
    pub fn new(url_template: impl Into<String>) -> Result<Self, BlobOriginError> {
        let url_template = url_template.into();
        if !url_template.contains("{id}") {
            return Err(BlobOriginError::InvalidUrl(format!(
                "{} has no {{id}} placeholder",
                url_template
            )));
        }
        Url::parse(&url_template.replace("{id}", "probe"))
            .map_err(|e| BlobOriginError::InvalidUrl(e.to_string()))?;

        // No overall timeout: large videos legitimately stream for minutes
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| BlobOriginError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url_template,
        })
    }

    fn asset_url(&self, asset_id: &str) -> Result<Url, BlobOriginError> {
        Url::parse(&self.url_template.replace("{id}", asset_id))
            .map_err(|e| BlobOriginError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl BaseBlobOrigin for HttpBlobOrigin {
    async fn fetch(
        &self,
        asset_id: &str,
        range: Option<&HeaderValue>,
    ) -> Result<OriginResponse, BlobOriginError> {
        let url = self.asset_url(asset_id)?;

        let mut request = self.http_client.get(url);
        if let Some(range) = range {
            request = request.header(header::RANGE, range.clone());
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, asset_id, "blob origin request failed");
            BlobOriginError::Network(e.to_string())
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        // Dropping this stream drops the reqwest response and its connection
        let body = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();

        Ok(OriginResponse {
            status,
            headers,
            body,
        })
    }
}
