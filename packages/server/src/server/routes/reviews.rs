//! Client reviews: customer submission, admin moderation and the public feed.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::actor_from;
use crate::common::{CoreError, ReferenceId, ReviewId};
use crate::domains::reviews::actions::{
    edit_review, list_all_reviews, list_public_reviews, publish_review, submit_review,
};
use crate::domains::reviews::{NewReview, PublicReview, ReviewContent, ReviewData, ReviewEdit};
use crate::server::app::AxumAppState;
use crate::server::error::json_rejection;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub reference_id: Option<String>,
    pub customer_ref: Option<String>,
    #[serde(flatten)]
    pub content: ReviewContent,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub item: ReviewData,
}

#[derive(Serialize)]
pub struct ReviewListResponse<T> {
    pub success: bool,
    pub items: Vec<T>,
}

pub async fn submit_review_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewResponse>), CoreError> {
    let Json(body) = body.map_err(json_rejection)?;

    let reference_id = body
        .reference_id
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(ReferenceId::parse)
        .transpose()?;
    let review = NewReview::new(reference_id, body.customer_ref, body.content)?;

    let review = submit_review(review, state.server_deps.store.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            success: true,
            item: review.into(),
        }),
    ))
}

pub async fn edit_review_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    body: Result<Json<ReviewEdit>, JsonRejection>,
) -> Result<Json<ReviewResponse>, CoreError> {
    let id = parse_review_id(&id)?;
    let Json(edit) = body.map_err(json_rejection)?;

    let review = edit_review(&actor_from(&auth), id, edit, state.server_deps.store.as_ref()).await?;

    Ok(Json(ReviewResponse {
        success: true,
        item: review.into(),
    }))
}

pub async fn publish_review_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<ReviewResponse>, CoreError> {
    let id = parse_review_id(&id)?;
    let review = publish_review(&actor_from(&auth), id, state.server_deps.store.as_ref()).await?;

    Ok(Json(ReviewResponse {
        success: true,
        item: review.into(),
    }))
}

pub async fn public_reviews_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<ReviewListResponse<PublicReview>>, CoreError> {
    let items = list_public_reviews(state.server_deps.store.as_ref()).await?;
    Ok(Json(ReviewListResponse {
        success: true,
        items,
    }))
}

pub async fn admin_reviews_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<ReviewListResponse<ReviewData>>, CoreError> {
    let reviews = list_all_reviews(&actor_from(&auth), state.server_deps.store.as_ref()).await?;
    Ok(Json(ReviewListResponse {
        success: true,
        items: reviews.into_iter().map(Into::into).collect(),
    }))
}

fn parse_review_id(raw: &str) -> Result<ReviewId, CoreError> {
    ReviewId::parse(raw).map_err(|_| CoreError::validation("malformed review id"))
}
