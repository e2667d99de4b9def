//! One-time store initialization.
//!
//! Index creation runs at most once per process. Concurrent callers all await
//! the same attempt and observe the same outcome; a failure is remembered and
//! reported to every later caller instead of being retried per request.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use super::BaseDocumentStore;

pub struct StoreInitializer {
    outcome: OnceCell<Result<(), Arc<String>>>,
}

impl Default for StoreInitializer {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreInitializer {
    pub fn new() -> Self {
        Self {
            outcome: OnceCell::const_new(),
        }
    }

    /// Runs `ensure_indexes` on first call; every other call awaits or reads
    /// the recorded outcome.
    pub async fn ensure(&self, store: &dyn BaseDocumentStore) -> Result<(), Arc<String>> {
        self.outcome
            .get_or_init(|| async {
                info!("Ensuring store indexes");
                match store.ensure_indexes().await {
                    Ok(()) => {
                        info!("Store indexes ready");
                        Ok(())
                    }
                    Err(e) => {
                        error!(error = %e, "Store initialization failed");
                        Err(Arc::new(e.to_string()))
                    }
                }
            })
            .await
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(())))
    }
}
