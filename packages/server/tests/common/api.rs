//! In-process API client.
//!
//! Builds the real router over `InMemoryStore` and `MockBlobOrigin` and drives
//! it with `tower::ServiceExt::oneshot`, so no socket or database is needed.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use studio_core::domains::auth::{JwtService, Role};
use studio_core::kernel::{InMemoryStore, MockBlobOrigin, ServerDeps};
use studio_core::server::build_app;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub origin: Arc<MockBlobOrigin>,
    pub jwt_service: Arc<JwtService>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_origin(MockBlobOrigin::new())
    }

    pub fn with_origin(origin: MockBlobOrigin) -> Self {
        Self::build(origin, Vec::new())
    }

    /// Router restricted to the given CORS origins
    pub fn with_allowed_origins(origin: MockBlobOrigin, allowed: &[&str]) -> Self {
        Self::build(origin, allowed.iter().map(|o| o.to_string()).collect())
    }

    fn build(origin: MockBlobOrigin, allowed_origins: Vec<String>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let origin = Arc::new(origin);
        let jwt_service = Arc::new(JwtService::new("test_secret", "studio".to_string()));

        let deps = ServerDeps::new(store.clone(), origin.clone(), jwt_service.clone());
        let router = build_app(deps, allowed_origins);

        Self {
            router,
            store,
            origin,
            jwt_service,
        }
    }

    pub fn admin_token(&self) -> String {
        self.jwt_service
            .create_token("studio-owner", Role::Admin)
            .expect("Failed to create admin token")
    }

    pub fn client_token(&self) -> String {
        self.jwt_service
            .create_token("client-42", Role::Client)
            .expect("Failed to create client token")
    }

    /// Send a raw request and get the unbuffered response back
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    /// Send a JSON request (body optional) with an optional bearer token
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        read_json(self.send(request).await).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }
}

pub async fn read_bytes(response: Response) -> (StatusCode, HeaderMap, Vec<u8>) {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, headers, bytes.to_vec())
}

pub async fn read_json(response: Response) -> TestResponse {
    let (status, headers, bytes) = read_bytes(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("Response is not JSON: {}", String::from_utf8_lossy(&bytes))
        })
    };
    TestResponse {
        status,
        headers,
        body,
    }
}
