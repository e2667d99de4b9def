use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{CoreError, EditRequestId, ReferenceId};

pub const MAX_DETAILS_LEN: usize = 5000;

/// A customer's request to change a (usually locked) selection.
/// Append-only; there is no resolution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EditRequest {
    pub id: EditRequestId,
    pub reference_id: ReferenceId,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl EditRequest {
    pub fn new(
        reference_id: ReferenceId,
        details: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let details = details.trim();
        if details.is_empty() {
            return Err(CoreError::validation("details are required"));
        }
        if details.chars().count() > MAX_DETAILS_LEN {
            return Err(CoreError::validation(format!(
                "details must be at most {} characters",
                MAX_DETAILS_LEN
            )));
        }
        Ok(Self {
            id: EditRequestId::new(),
            reference_id,
            details: details.to_string(),
            created_at,
        })
    }
}
