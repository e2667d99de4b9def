//! Selection lock actions

use tracing::info;

use crate::common::{Actor, AdminCapability, CoreResult, ReferenceId};
use crate::domains::selection::models::Project;
use crate::kernel::BaseProjectStore;

/// Lock or unlock a reference's selection. Admin only.
///
/// Setting the value the project already has is a no-op.
pub async fn set_selection_lock<S>(
    actor: &Actor,
    reference_id: &ReferenceId,
    locked: bool,
    store: &S,
) -> CoreResult<Project>
where
    S: BaseProjectStore + ?Sized,
{
    actor.can(AdminCapability::ToggleSelectionLock).check()?;

    let project = store.set_lock(reference_id, locked).await?;
    info!(
        reference_id = %reference_id,
        locked = project.selection_locked,
        by = actor.subject().unwrap_or("unknown"),
        "Selection lock set"
    );
    Ok(project)
}

/// Current lock state. A reference nobody has touched yet reads as unlocked.
pub async fn selection_lock_status<S>(
    reference_id: &ReferenceId,
    store: &S,
) -> CoreResult<Option<Project>>
where
    S: BaseProjectStore + ?Sized,
{
    Ok(store.find_project(reference_id).await?)
}
