//! Wire shapes for the selection endpoints (camelCase JSON).

use serde::Serialize;

use crate::domains::selection::models::{EditRequest, Project, SelectionVersion};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionVersionData {
    pub reference_id: String,
    pub version: i32,
    pub selected_asset_ids: Vec<String>,
    pub created_at: String,
}

impl From<SelectionVersion> for SelectionVersionData {
    fn from(version: SelectionVersion) -> Self {
        Self {
            reference_id: version.reference_id.into(),
            version: version.version,
            selected_asset_ids: version.selected_asset_ids,
            created_at: version.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStateData {
    pub locked: bool,
    pub locked_at: Option<String>,
}

impl From<Option<&Project>> for LockStateData {
    fn from(project: Option<&Project>) -> Self {
        Self {
            locked: project.map(|p| p.selection_locked).unwrap_or(false),
            locked_at: project
                .and_then(|p| p.selection_locked_at)
                .map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequestData {
    pub id: String,
    pub reference_id: String,
    pub details: String,
    pub created_at: String,
}

impl From<EditRequest> for EditRequestData {
    fn from(request: EditRequest) -> Self {
        Self {
            id: request.id.to_string(),
            reference_id: request.reference_id.into(),
            details: request.details,
            created_at: request.created_at.to_rfc3339(),
        }
    }
}
