//! Edit request actions
//!
//! Customers may file edit requests at any time, including (mainly) after the
//! selection is locked. The log is append-only.

use chrono::Utc;
use tracing::info;

use crate::common::{Actor, AdminCapability, CoreResult, ReferenceId};
use crate::domains::selection::models::EditRequest;
use crate::kernel::{BaseEditRequestStore, BaseProjectStore};

pub async fn submit_edit_request<S>(
    reference_id: &ReferenceId,
    details: &str,
    store: &S,
) -> CoreResult<EditRequest>
where
    S: BaseProjectStore + BaseEditRequestStore + ?Sized,
{
    let request = EditRequest::new(reference_id.clone(), details, Utc::now())?;

    store.ensure_project(reference_id).await?;
    let request = store.insert_edit_request(request).await?;

    info!(reference_id = %reference_id, request_id = %request.id, "Edit request submitted");
    Ok(request)
}

/// Edit requests for the reference, newest first. Admin only.
pub async fn list_edit_requests<S>(
    actor: &Actor,
    reference_id: &ReferenceId,
    store: &S,
) -> CoreResult<Vec<EditRequest>>
where
    S: BaseEditRequestStore + ?Sized,
{
    actor.can(AdminCapability::ReadEditRequests).check()?;
    Ok(store.list_edit_requests(reference_id).await?)
}
