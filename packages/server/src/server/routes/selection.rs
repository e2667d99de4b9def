//! Selection versions and the selection lock.
//!
//! POST  /selections/:reference_id      record a new selection version
//! GET   /selections/:reference_id      version history plus lock state
//! GET   /selection-lock/:reference_id  lock state
//! PATCH /selection-lock/:reference_id  lock or unlock (admin)

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::actor_from;
use crate::common::{CoreError, ReferenceId};
use crate::domains::selection::actions::{
    create_selection_version, list_selection_versions, selection_lock_status, set_selection_lock,
};
use crate::domains::selection::{LockStateData, SelectionVersionData};
use crate::server::app::AxumAppState;
use crate::server::error::json_rejection;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSelectionRequest {
    pub selected_asset_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct SelectionCreatedResponse {
    pub success: bool,
    pub item: SelectionVersionData,
}

#[derive(Serialize)]
pub struct SelectionHistoryResponse {
    pub success: bool,
    #[serde(flatten)]
    pub lock: LockStateData,
    pub items: Vec<SelectionVersionData>,
}

#[derive(Serialize)]
pub struct LockStateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub lock: LockStateData,
}

pub async fn create_selection_handler(
    Extension(state): Extension<AxumAppState>,
    Path(reference_id): Path<String>,
    body: Result<Json<CreateSelectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SelectionCreatedResponse>), CoreError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let Json(body) = body.map_err(json_rejection)?;

    let deps = &state.server_deps;
    let version = create_selection_version(
        &reference_id,
        body.selected_asset_ids,
        deps.selection_retry_budget,
        deps.store.as_ref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SelectionCreatedResponse {
            success: true,
            item: version.into(),
        }),
    ))
}

pub async fn list_selections_handler(
    Extension(state): Extension<AxumAppState>,
    Path(reference_id): Path<String>,
) -> Result<Json<SelectionHistoryResponse>, CoreError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let store = state.server_deps.store.as_ref();

    let project = selection_lock_status(&reference_id, store).await?;
    let versions = list_selection_versions(&reference_id, store).await?;

    Ok(Json(SelectionHistoryResponse {
        success: true,
        lock: LockStateData::from(project.as_ref()),
        items: versions.into_iter().map(Into::into).collect(),
    }))
}

pub async fn lock_status_handler(
    Extension(state): Extension<AxumAppState>,
    Path(reference_id): Path<String>,
) -> Result<Json<LockStateResponse>, CoreError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let project = selection_lock_status(&reference_id, state.server_deps.store.as_ref()).await?;

    Ok(Json(LockStateResponse {
        success: true,
        lock: LockStateData::from(project.as_ref()),
    }))
}

pub async fn set_lock_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(reference_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LockStateResponse>, CoreError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let Json(body) = body.map_err(json_rejection)?;
    let locked = parse_locked(&body)?;

    let project = set_selection_lock(
        &actor_from(&auth),
        &reference_id,
        locked,
        state.server_deps.store.as_ref(),
    )
    .await?;

    Ok(Json(LockStateResponse {
        success: true,
        lock: LockStateData::from(Some(&project)),
    }))
}

/// `locked` must be a JSON boolean; `"true"`, `1` and null are rejected.
fn parse_locked(body: &Value) -> Result<bool, CoreError> {
    body.get("locked")
        .and_then(Value::as_bool)
        .ok_or_else(|| CoreError::validation("locked must be a boolean"))
}
