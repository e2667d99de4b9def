//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, RANGE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::middleware::{ensure_store_ready, jwt_auth_middleware};
use crate::server::routes::{
    admin_reviews_handler, create_selection_handler, edit_review_handler, health_handler,
    list_edit_requests_handler, list_selections_handler, lock_status_handler, media_handler,
    public_reviews_handler, publish_review_handler, set_lock_handler, submit_edit_request_handler,
    submit_review_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// `allowed_origins` restricts CORS; an empty list allows any origin.
pub fn build_app(server_deps: ServerDeps, allowed_origins: Vec<String>) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(server_deps),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, RANGE]);

    // Clone jwt_service for middleware closure
    let jwt_service = app_state.server_deps.jwt_service.clone();

    // Everything that touches the store waits for initialization
    let api = Router::new()
        .route(
            "/selections/:reference_id",
            post(create_selection_handler).get(list_selections_handler),
        )
        .route(
            "/selection-lock/:reference_id",
            get(lock_status_handler).patch(set_lock_handler),
        )
        .route(
            "/edit-requests/:reference_id",
            post(submit_edit_request_handler).get(list_edit_requests_handler),
        )
        .route(
            "/reviews",
            post(submit_review_handler).get(public_reviews_handler),
        )
        .route("/admin/reviews", get(admin_reviews_handler))
        .route("/admin/reviews/:id", patch(edit_review_handler))
        .route("/admin/reviews/:id/publish", post(publish_review_handler))
        .route_layer(middleware::from_fn(ensure_store_ready));

    Router::new()
        .merge(api)
        .route("/media/:asset_id", get(media_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn allow_origin(allowed_origins: &[String]) -> AllowOrigin {
    if allowed_origins.is_empty() {
        return AllowOrigin::from(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}
