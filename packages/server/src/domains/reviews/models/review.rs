use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::common::{CoreError, ReferenceId, ReviewId};

const MAX_NAME_LEN: usize = 120;
const MAX_TEXT_LEN: usize = 5000;
const MAX_IMAGES: usize = 20;

/// Review lifecycle. `Published` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Draft,
    Published,
}

impl ReviewStatus {
    /// The only transition: any status publishes to `Published`.
    pub fn publish(self) -> Self {
        Self::Published
    }
}

/// The display fields of a review. Drafts edit these in place; publishing
/// freezes a copy of them as the public snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewContent {
    pub name: String,
    pub rating: i16,
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ReviewContent {
    /// Trims text fields and checks bounds.
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: validate_name(&self.name)?,
            rating: validate_rating(self.rating)?,
            text: validate_text(&self.text)?,
            images: validate_images(self.images)?,
        })
    }
}

fn validate_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_rating(rating: i16) -> Result<i16, CoreError> {
    if !(1..=5).contains(&rating) {
        return Err(CoreError::validation("rating must be between 1 and 5"));
    }
    Ok(rating)
}

fn validate_text(text: &str) -> Result<String, CoreError> {
    let text = text.trim();
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::validation(format!(
            "text must be at most {} characters",
            MAX_TEXT_LEN
        )));
    }
    Ok(text.to_string())
}

fn validate_images(images: Vec<String>) -> Result<Vec<String>, CoreError> {
    if images.len() > MAX_IMAGES {
        return Err(CoreError::validation(format!(
            "at most {} images per review",
            MAX_IMAGES
        )));
    }
    let images = images
        .into_iter()
        .map(|i| i.trim().to_string())
        .collect::<Vec<_>>();
    if images.iter().any(|i| i.is_empty()) {
        return Err(CoreError::validation("image references must not be blank"));
    }
    Ok(images)
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub reference_id: Option<ReferenceId>,
    pub customer_ref: Option<String>,
    pub status: ReviewStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub published_snapshot: Option<Json<ReviewContent>>,
    pub name: String,
    pub rating: i16,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer submission before it is stored.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub reference_id: Option<ReferenceId>,
    pub customer_ref: Option<String>,
    pub content: ReviewContent,
}

impl NewReview {
    pub fn new(
        reference_id: Option<ReferenceId>,
        customer_ref: Option<String>,
        content: ReviewContent,
    ) -> Result<Self, CoreError> {
        let customer_ref = customer_ref
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(Self {
            reference_id,
            customer_ref,
            content: content.validated()?,
        })
    }

    pub fn into_record(self, now: DateTime<Utc>) -> Review {
        Review {
            id: ReviewId::new(),
            reference_id: self.reference_id,
            customer_ref: self.customer_ref,
            status: ReviewStatus::Draft,
            published_at: None,
            published_snapshot: None,
            name: self.content.name,
            rating: self.content.rating,
            text: self.content.text,
            images: self.content.images,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of the display fields; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEdit {
    pub name: Option<String>,
    pub rating: Option<i16>,
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ReviewEdit {
    /// Checks each present field on its own. Stored fields are already
    /// valid, so merging a validated edit over any stored review is too.
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            rating: self.rating.map(validate_rating).transpose()?,
            text: self.text.as_deref().map(validate_text).transpose()?,
            images: self.images.map(validate_images).transpose()?,
        })
    }
}

impl Review {
    pub fn content(&self) -> ReviewContent {
        ReviewContent {
            name: self.name.clone(),
            rating: self.rating,
            text: self.text.clone(),
            images: self.images.clone(),
        }
    }

    pub fn snapshot(&self) -> Option<&ReviewContent> {
        self.published_snapshot.as_ref().map(|Json(content)| content)
    }

    /// Published with a snapshot to show. Both must hold for public listing.
    pub fn is_public(&self) -> bool {
        self.status == ReviewStatus::Published && self.published_snapshot.is_some()
    }

    /// Merges a validated edit over the live display fields. An existing
    /// snapshot is left exactly as it was.
    pub fn apply_edit(&mut self, edit: ReviewEdit, now: DateTime<Utc>) {
        if let Some(name) = edit.name {
            self.name = name;
        }
        if let Some(rating) = edit.rating {
            self.rating = rating;
        }
        if let Some(text) = edit.text {
            self.text = text;
        }
        if let Some(images) = edit.images {
            self.images = images;
        }
        self.updated_at = now;
    }

    /// Freezes the current display fields into the public snapshot.
    ///
    /// Publishing an already published review replaces the snapshot with the
    /// fields as they are now; no history is retained.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published_snapshot = Some(Json(self.content()));
        self.published_at = Some(now);
        self.status = self.status.publish();
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn content(name: &str, rating: i16) -> ReviewContent {
        ReviewContent {
            name: name.to_string(),
            rating,
            text: "Lovely shoot".to_string(),
            images: vec!["img-1".to_string()],
        }
    }

    fn draft() -> Review {
        NewReview::new(
            Some(ReferenceId::parse("abc123").unwrap()),
            Some("cust-1".to_string()),
            content("Ana", 5),
        )
        .unwrap()
        .into_record(Utc::now())
    }

    #[test]
    fn test_new_review_is_draft_without_snapshot() {
        let review = draft();
        assert_eq!(review.status, ReviewStatus::Draft);
        assert!(review.snapshot().is_none());
        assert!(!review.is_public());
    }

    #[test]
    fn test_publish_freezes_snapshot() {
        let mut review = draft();
        let now = Utc::now();
        review.publish(now);

        assert!(review.is_public());
        assert_eq!(review.published_at, Some(now));
        assert_eq!(review.snapshot(), Some(&content("Ana", 5)));
    }

    #[test]
    fn test_edit_after_publish_keeps_snapshot() {
        let mut review = draft();
        review.publish(Utc::now());

        review
            .apply_edit(
                ReviewEdit {
                    name: Some("Ana M.".to_string()),
                    rating: Some(4),
                    ..Default::default()
                },
                Utc::now(),
            );

        assert_eq!(review.name, "Ana M.");
        assert_eq!(review.snapshot(), Some(&content("Ana", 5)));
    }

    #[test]
    fn test_republish_takes_current_fields() {
        let mut review = draft();
        let first = Utc::now();
        review.publish(first);
        review
            .apply_edit(
                ReviewEdit {
                    text: Some("Even better in print".to_string()),
                    ..Default::default()
                },
                first + Duration::seconds(1),
            );
        let second = first + Duration::seconds(2);
        review.publish(second);

        assert_eq!(review.published_at, Some(second));
        assert_eq!(
            review.snapshot().map(|s| s.text.as_str()),
            Some("Even better in print")
        );
    }

    #[test]
    fn test_rating_bounds() {
        assert!(content("Ana", 0).validated().is_err());
        assert!(content("Ana", 6).validated().is_err());
        assert!(content("Ana", 1).validated().is_ok());
    }

    #[test]
    fn test_edit_validates_present_fields_only() {
        let edit = ReviewEdit {
            name: Some("  Ana M.  ".to_string()),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(edit.name.as_deref(), Some("Ana M."));
        assert_eq!(edit.rating, None);

        let bad_rating = ReviewEdit {
            rating: Some(9),
            ..Default::default()
        };
        assert!(bad_rating.validated().is_err());

        let blank_name = ReviewEdit {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank_name.validated().is_err());
    }

    #[test]
    fn test_blank_customer_ref_is_absent() {
        let review = NewReview::new(None, Some("   ".to_string()), content("Ana", 5)).unwrap();
        assert_eq!(review.customer_ref, None);
    }
}
