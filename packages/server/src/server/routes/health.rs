use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    status: String,
    initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Returns 200 OK when the store answers a ping, 503 Service Unavailable
/// otherwise.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let deps = &state.server_deps;

    let (status, error) =
        match tokio::time::timeout(Duration::from_secs(5), deps.store.ping()).await {
            Ok(Ok(())) => ("ok", None),
            Ok(Err(e)) => ("error", Some(format!("Ping failed: {}", e))),
            Err(_) => ("error", Some("Ping timeout (>5s)".to_string())),
        };

    let is_healthy = error.is_none();
    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            store: StoreHealth {
                status: status.to_string(),
                initialized: deps.initializer.is_initialized(),
                error,
            },
        }),
    )
}
