//! Selection version actions
//!
//! Version numbers are assigned optimistically: read the current maximum,
//! try to insert `max + 1`, and let the `(reference_id, version)` unique
//! index arbitrate between concurrent writers. A loser re-reads and tries
//! again until the retry budget runs out.

use tracing::{info, warn};

use crate::common::{CoreError, CoreResult, ReferenceId};
use crate::domains::selection::models::{normalize_asset_ids, NewSelectionVersion, SelectionVersion};
use crate::kernel::{BaseProjectStore, BaseSelectionStore, StoreError};

/// Record a new selection for the reference.
///
/// Rejected with `CoreError::Locked` when the project is locked at write time,
/// even if it was still unlocked when this call started.
pub async fn create_selection_version<S>(
    reference_id: &ReferenceId,
    selected_asset_ids: Vec<String>,
    retry_budget: u32,
    store: &S,
) -> CoreResult<SelectionVersion>
where
    S: BaseProjectStore + BaseSelectionStore + ?Sized,
{
    let selected_asset_ids = normalize_asset_ids(selected_asset_ids)?;
    let attempts = retry_budget.max(1);

    for attempt in 1..=attempts {
        // Early exit for the common case; the insert re-checks atomically
        let project = store.ensure_project(reference_id).await?;
        if project.selection_locked {
            return Err(CoreError::Locked(reference_id.clone()));
        }

        let next = store.max_version(reference_id).await? + 1;
        let candidate = NewSelectionVersion {
            reference_id: reference_id.clone(),
            version: next,
            selected_asset_ids: selected_asset_ids.clone(),
        };

        match store.insert_version(candidate).await {
            Ok(version) => {
                info!(
                    reference_id = %reference_id,
                    version = version.version,
                    assets = version.selected_asset_ids.len(),
                    "Selection version recorded"
                );
                return Ok(version);
            }
            Err(StoreError::Duplicate { .. }) => {
                warn!(
                    reference_id = %reference_id,
                    version = next,
                    attempt,
                    "Selection version already claimed, retrying"
                );
            }
            Err(StoreError::Locked) => return Err(CoreError::Locked(reference_id.clone())),
            Err(e) => return Err(e.into()),
        }
    }

    warn!(reference_id = %reference_id, attempts, "Selection retry budget exhausted");
    Err(CoreError::Conflict(format!(
        "could not record a selection for {} after {} attempts, please retry",
        reference_id, attempts
    )))
}

/// Full selection history, oldest first.
pub async fn list_selection_versions<S>(
    reference_id: &ReferenceId,
    store: &S,
) -> CoreResult<Vec<SelectionVersion>>
where
    S: BaseSelectionStore + ?Sized,
{
    Ok(store.list_versions(reference_id).await?)
}
