//! Server dependencies (using traits for testability)
//!
//! Central container handed to every route. External services sit behind
//! `Base*` traits so tests swap in `InMemoryStore` / `MockBlobOrigin`.

use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseBlobOrigin, BaseDocumentStore, StoreInitializer};

/// Attempts allowed when a version number is claimed concurrently
pub const DEFAULT_SELECTION_RETRY_BUDGET: u32 = 5;

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseDocumentStore>,
    pub blob_origin: Arc<dyn BaseBlobOrigin>,
    pub jwt_service: Arc<JwtService>,
    pub initializer: Arc<StoreInitializer>,
    pub selection_retry_budget: u32,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseDocumentStore>,
        blob_origin: Arc<dyn BaseBlobOrigin>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            blob_origin,
            jwt_service,
            initializer: Arc::new(StoreInitializer::new()),
            selection_retry_budget: DEFAULT_SELECTION_RETRY_BUDGET,
        }
    }

    pub fn with_selection_retry_budget(mut self, budget: u32) -> Self {
        self.selection_retry_budget = budget.max(1);
        self
    }
}
