//! Wire shapes for reviews.

use serde::Serialize;

use crate::domains::reviews::models::{Review, ReviewContent, ReviewStatus};

/// A review as the public site sees it.
///
/// Identity fields (`reference_id`, `customer_ref`, `published_at`) always come
/// from the live document; everything else comes from the published snapshot,
/// so a stale snapshot can never be attributed to the wrong reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReview {
    pub id: String,
    pub reference_id: Option<String>,
    pub customer_ref: Option<String>,
    pub published_at: String,
    pub name: String,
    pub rating: i16,
    pub text: String,
    pub images: Vec<String>,
}

impl PublicReview {
    /// `None` unless the review is published and carries a snapshot.
    pub fn from_live(review: &Review) -> Option<Self> {
        if !review.is_public() {
            return None;
        }
        let snapshot = review.snapshot()?;
        let published_at = review.published_at?;
        Some(Self {
            id: review.id.to_string(),
            reference_id: review.reference_id.as_ref().map(|r| r.to_string()),
            customer_ref: review.customer_ref.clone(),
            published_at: published_at.to_rfc3339(),
            name: snapshot.name.clone(),
            rating: snapshot.rating,
            text: snapshot.text.clone(),
            images: snapshot.images.clone(),
        })
    }
}

/// Full review for moderation screens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    pub id: String,
    pub reference_id: Option<String>,
    pub customer_ref: Option<String>,
    pub status: ReviewStatus,
    pub published_at: Option<String>,
    pub published_snapshot: Option<ReviewContent>,
    pub name: String,
    pub rating: i16,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Review> for ReviewData {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            reference_id: review.reference_id.map(String::from),
            customer_ref: review.customer_ref,
            status: review.status,
            published_at: review.published_at.map(|t| t.to_rfc3339()),
            published_snapshot: review.published_snapshot.map(|s| s.0),
            name: review.name,
            rating: review.rating,
            text: review.text,
            images: review.images,
            created_at: review.created_at.to_rfc3339(),
            updated_at: review.updated_at.to_rfc3339(),
        }
    }
}
