//! Byte-range-preserving media relay
//!
//! One upstream request per call, `Range` forwarded verbatim, status passed
//! through unchanged, and only an allow-list of response headers copied. The
//! body is handed on as a stream; dropping it (client gone) drops the
//! upstream connection.
//!
//! `Access-Control-Allow-Origin` is left to the router's CORS layer so the
//! configured origin allow-list applies to media like every other route.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use tracing::{debug, warn};

use crate::common::{CoreError, CoreResult};
use crate::kernel::{BaseBlobOrigin, BlobOriginError, ByteStream, OriginResponse};

const MAX_ASSET_ID_LEN: usize = 128;

/// Origin headers that survive the relay. Everything else (cookies,
/// redirects, auth challenges, origin diagnostics) is dropped.
pub const FORWARDED_HEADERS: [HeaderName; 5] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
    header::CACHE_CONTROL,
];

/// A relayed response ready to hand to the HTTP layer.
pub struct RelayedMedia {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl RelayedMedia {
    pub fn from_origin(origin: OriginResponse) -> Self {
        let mut headers = HeaderMap::new();
        for name in FORWARDED_HEADERS.iter() {
            for value in origin.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("Content-Length, Content-Range, Accept-Ranges"),
        );
        headers.insert(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        );

        Self {
            status: origin.status,
            headers,
            body: origin.body,
        }
    }
}

/// Drive-style ids: letters, digits, '-' and '_'
pub fn validate_asset_id(raw: &str) -> CoreResult<&str> {
    if raw.is_empty() {
        return Err(CoreError::validation("asset id is required"));
    }
    if raw.len() > MAX_ASSET_ID_LEN
        || !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::validation("malformed asset id"));
    }
    Ok(raw)
}

pub async fn stream_asset<O>(
    asset_id: &str,
    range: Option<&HeaderValue>,
    origin: &O,
) -> CoreResult<RelayedMedia>
where
    O: BaseBlobOrigin + ?Sized,
{
    let asset_id = validate_asset_id(asset_id)?;

    let upstream = origin.fetch(asset_id, range).await.map_err(|e| match e {
        BlobOriginError::Network(message) => {
            warn!(asset_id, error = %message, "Blob origin unreachable");
            CoreError::Upstream(message)
        }
        BlobOriginError::InvalidUrl(message) => {
            CoreError::Internal(anyhow::anyhow!("invalid blob origin url: {}", message))
        }
    })?;

    if upstream.status.is_success() {
        debug!(asset_id, status = %upstream.status, ranged = range.is_some(), "Relaying media");
    } else {
        warn!(asset_id, status = %upstream.status, "Blob origin returned an error status");
    }

    Ok(RelayedMedia::from_origin(upstream))
}
