//! Kernel module - server infrastructure and dependencies.

pub mod blob_origin;
pub mod deps;
pub mod initializer;
pub mod postgres_store;
pub mod test_dependencies;
pub mod traits;

pub use blob_origin::{HttpBlobOrigin, DEFAULT_ORIGIN_URL};
pub use deps::{ServerDeps, DEFAULT_SELECTION_RETRY_BUDGET};
pub use initializer::StoreInitializer;
pub use postgres_store::PostgresStore;
pub use test_dependencies::{FetchCall, InMemoryStore, MockBlobOrigin};
pub use traits::*;
