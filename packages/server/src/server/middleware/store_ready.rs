use axum::{
    extract::{Extension, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::server::app::AxumAppState;
use crate::server::error::ErrorBody;

/// Awaits the process-wide store initialization before any store access.
///
/// After the first successful run this is a cheap read of the recorded
/// outcome.
pub async fn ensure_store_ready(
    Extension(state): Extension<AxumAppState>,
    request: Request,
    next: Next,
) -> Response {
    let deps = &state.server_deps;
    if let Err(e) = deps.initializer.ensure(deps.store.as_ref()).await {
        tracing::error!(error = %e, "Store not initialized");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody {
                success: false,
                error: "service is starting up, try again shortly".to_string(),
            }),
        )
            .into_response();
    }

    next.run(request).await
}
