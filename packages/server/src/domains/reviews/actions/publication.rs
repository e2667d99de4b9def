//! Review publication actions
//!
//! Reviews start as drafts and move one way to `published`. The public site
//! only ever reads the frozen snapshot, merged with identity fields from the
//! live document.

use chrono::Utc;
use tracing::info;

use crate::common::{Actor, AdminCapability, CoreError, CoreResult, ReviewId};
use crate::domains::reviews::models::{NewReview, Review, ReviewEdit};
use crate::domains::reviews::PublicReview;
use crate::kernel::{BaseReviewStore, StoreError};

/// Store a customer's review as a draft.
///
/// A second review for the same reference or customer is a conflict.
pub async fn submit_review<S>(review: NewReview, store: &S) -> CoreResult<Review>
where
    S: BaseReviewStore + ?Sized,
{
    let review = store
        .insert_review(review.into_record(Utc::now()))
        .await
        .map_err(uniqueness_conflict)?;

    info!(review_id = %review.id, reference_id = ?review.reference_id, "Review drafted");
    Ok(review)
}

/// Edit the live display fields. Admin only; a published snapshot is not
/// affected until the next publish.
///
/// The merge happens in the store, so a concurrent edit to other fields of
/// the same review is kept.
pub async fn edit_review<S>(
    actor: &Actor,
    id: ReviewId,
    edit: ReviewEdit,
    store: &S,
) -> CoreResult<Review>
where
    S: BaseReviewStore + ?Sized,
{
    actor.can(AdminCapability::ModerateReviews).check()?;
    let edit = edit.validated()?;

    let review = store
        .apply_review_edit(id, edit)
        .await
        .map_err(|e| not_found_as_review(e, id))?;

    info!(review_id = %id, "Review edited");
    Ok(review)
}

/// Freeze the review's current fields as its public snapshot. Admin only.
pub async fn publish_review<S>(actor: &Actor, id: ReviewId, store: &S) -> CoreResult<Review>
where
    S: BaseReviewStore + ?Sized,
{
    actor.can(AdminCapability::PublishReviews).check()?;

    let review = store
        .publish_review(id)
        .await
        .map_err(|e| not_found_as_review(e, id))?;

    info!(
        review_id = %review.id,
        published_at = ?review.published_at,
        by = actor.subject().unwrap_or("unknown"),
        "Review published"
    );
    Ok(review)
}

/// Published reviews as the public site shows them.
pub async fn list_public_reviews<S>(store: &S) -> CoreResult<Vec<PublicReview>>
where
    S: BaseReviewStore + ?Sized,
{
    let reviews = store.list_published_reviews().await?;
    Ok(reviews.iter().filter_map(PublicReview::from_live).collect())
}

/// Every review, newest first, for moderation. Admin only.
pub async fn list_all_reviews<S>(actor: &Actor, store: &S) -> CoreResult<Vec<Review>>
where
    S: BaseReviewStore + ?Sized,
{
    actor.can(AdminCapability::ModerateReviews).check()?;
    Ok(store.list_reviews().await?)
}

fn uniqueness_conflict(err: StoreError) -> CoreError {
    match err {
        StoreError::Duplicate { index } if index.contains("customer_ref") => {
            CoreError::Conflict("a review for this customer already exists".to_string())
        }
        StoreError::Duplicate { index } if index.contains("reference_id") => {
            CoreError::Conflict("a review for this reference already exists".to_string())
        }
        other => other.into(),
    }
}

fn not_found_as_review(err: StoreError, id: ReviewId) -> CoreError {
    match err {
        StoreError::NotFound => CoreError::NotFound(format!("review {}", id)),
        other => other.into(),
    }
}
