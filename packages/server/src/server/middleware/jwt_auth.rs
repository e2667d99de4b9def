use crate::common::Actor;
use crate::domains::auth::JwtService;
use axum::{
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Cookie set by the login flow
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    pub is_admin: bool,
}

impl From<Option<&AuthUser>> for Actor {
    fn from(user: Option<&AuthUser>) -> Self {
        match user {
            Some(user) => Actor::new(user.subject.clone(), user.is_admin),
            None => Actor::anonymous(),
        }
    }
}

/// JWT authentication middleware
///
/// Reads the token from the Authorization header or the auth cookie, verifies
/// it, and adds AuthUser to request extensions. Without a valid token the
/// request continues anonymously; admin routes reject it later.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(request.headers(), &jwt_service);

    if let Some(user) = auth_user {
        debug!("Authenticated user: {} (admin: {})", user.subject, user.is_admin);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the token from request headers
fn extract_auth_user(headers: &HeaderMap, jwt_service: &JwtService) -> Option<AuthUser> {
    let token = bearer_token(headers).or_else(|| cookie_token(headers))?;
    let claims = jwt_service.verify_token(&token).ok()?;

    Some(AuthUser {
        is_admin: claims.is_admin(),
        subject: claims.sub,
    })
}

/// Handles both "Bearer <token>" and a raw token
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == AUTH_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}
