use thiserror::Error;

use super::auth::AuthError;
use super::reference::{ReferenceId, ReferenceIdError};
use crate::kernel::StoreError;

/// Failure taxonomy shared by every selection, review and media operation.
///
/// Validation and authorization variants are produced before any side effect;
/// the rest come back from the store or the blob origin and are mapped here at
/// the boundary.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Authorization(#[from] AuthError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("selection for {0} is locked")]
    Locked(ReferenceId),

    #[error("{0}")]
    Conflict(String),

    #[error("blob origin unreachable: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<ReferenceIdError> for CoreError {
    fn from(err: ReferenceIdError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { index } => {
                Self::Conflict(format!("a record with the same {} already exists", index))
            }
            StoreError::NotFound => Self::NotFound("record".to_string()),
            // Callers that can hit a lock refusal map it with the reference in hand.
            StoreError::Locked => Self::Conflict("selection is locked".to_string()),
            StoreError::Backend(e) => Self::Internal(e),
        }
    }
}
