use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{CoreError, ReferenceId, SelectionVersionId};

/// One immutable entry in a reference's selection history.
///
/// `(reference_id, version)` is unique in the store; versions start at 1 and
/// grow by one per accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SelectionVersion {
    pub id: SelectionVersionId,
    pub reference_id: ReferenceId,
    pub version: i32,
    pub selected_asset_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A version that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSelectionVersion {
    pub reference_id: ReferenceId,
    pub version: i32,
    pub selected_asset_ids: Vec<String>,
}

impl NewSelectionVersion {
    pub fn into_record(self, created_at: DateTime<Utc>) -> SelectionVersion {
        SelectionVersion {
            id: SelectionVersionId::new(),
            reference_id: self.reference_id,
            version: self.version,
            selected_asset_ids: self.selected_asset_ids,
            created_at,
        }
    }
}

/// Normalizes a submitted asset set: trims ids, drops repeats (first
/// occurrence wins) and rejects blank ids or an empty selection.
pub fn normalize_asset_ids(raw: Vec<String>) -> Result<Vec<String>, CoreError> {
    let mut ids: Vec<String> = Vec::with_capacity(raw.len());
    for id in raw {
        let id = id.trim();
        if id.is_empty() {
            return Err(CoreError::validation("asset ids must not be blank"));
        }
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    if ids.is_empty() {
        return Err(CoreError::validation("select at least one asset"));
    }
    Ok(ids)
}
