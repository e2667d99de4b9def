//! Post-lock edit requests.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::actor_from;
use crate::common::{CoreError, ReferenceId};
use crate::domains::selection::actions::{list_edit_requests, submit_edit_request};
use crate::domains::selection::EditRequestData;
use crate::server::app::AxumAppState;
use crate::server::error::json_rejection;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
pub struct SubmitEditRequest {
    pub details: String,
}

#[derive(Serialize)]
pub struct EditRequestResponse {
    pub success: bool,
    pub item: EditRequestData,
}

#[derive(Serialize)]
pub struct EditRequestListResponse {
    pub success: bool,
    pub items: Vec<EditRequestData>,
}

pub async fn submit_edit_request_handler(
    Extension(state): Extension<AxumAppState>,
    Path(reference_id): Path<String>,
    body: Result<Json<SubmitEditRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EditRequestResponse>), CoreError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let Json(body) = body.map_err(json_rejection)?;

    let request =
        submit_edit_request(&reference_id, &body.details, state.server_deps.store.as_ref())
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(EditRequestResponse {
            success: true,
            item: request.into(),
        }),
    ))
}

pub async fn list_edit_requests_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(reference_id): Path<String>,
) -> Result<Json<EditRequestListResponse>, CoreError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let requests = list_edit_requests(
        &actor_from(&auth),
        &reference_id,
        state.server_deps.store.as_ref(),
    )
    .await?;

    Ok(Json(EditRequestListResponse {
        success: true,
        items: requests.into_iter().map(Into::into).collect(),
    }))
}
