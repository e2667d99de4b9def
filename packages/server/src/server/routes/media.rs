//! GET /media/:asset_id
//!
//! Streams an externally hosted asset through this origin so the browser can
//! read it cross-origin. The Range header is forwarded and the origin's status
//! (200, 206 or an error) is passed through.

use axum::{
    body::Body,
    extract::{Extension, Path},
    http::{header, HeaderMap},
    response::Response,
};

use crate::common::CoreError;
use crate::domains::media::stream_asset;
use crate::server::app::AxumAppState;

pub async fn media_handler(
    Extension(state): Extension<AxumAppState>,
    Path(asset_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, CoreError> {
    let relayed = stream_asset(
        &asset_id,
        headers.get(header::RANGE),
        state.server_deps.blob_origin.as_ref(),
    )
    .await?;

    // Client disconnect drops the body, which drops the upstream connection
    let mut response = Response::new(Body::from_stream(relayed.body));
    *response.status_mut() = relayed.status;
    *response.headers_mut() = relayed.headers;
    Ok(response)
}
