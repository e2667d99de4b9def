// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Version numbering, lock rules and snapshot rules live in the domain actions;
// stores only guarantee single-record atomicity and unique indexes.
//
// Naming convention: Base* for trait names (e.g., BaseSelectionStore, BaseBlobOrigin)

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::common::{ReferenceId, ReviewId};
use crate::domains::reviews::models::{Review, ReviewEdit};
use crate::domains::selection::models::{
    EditRequest, NewSelectionVersion, Project, SelectionVersion,
};

// =============================================================================
// Store errors
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique (or sparse unique) index rejected the write
    #[error("duplicate value for unique index {index}")]
    Duplicate { index: String },

    /// A write conditioned on an unlocked project found it locked
    #[error("selection is locked")]
    Locked,

    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Projects (reference registry + lock state)
// =============================================================================

#[async_trait]
pub trait BaseProjectStore: Send + Sync {
    /// Returns the project, creating an unlocked one if none exists
    async fn ensure_project(&self, reference_id: &ReferenceId) -> StoreResult<Project>;

    async fn find_project(&self, reference_id: &ReferenceId) -> StoreResult<Option<Project>>;

    /// Sets the lock flag (creating the project if needed). Writing the value
    /// the project already has changes nothing, including timestamps.
    async fn set_lock(&self, reference_id: &ReferenceId, locked: bool) -> StoreResult<Project>;
}

// =============================================================================
// Selection versions
// =============================================================================

#[async_trait]
pub trait BaseSelectionStore: Send + Sync {
    /// Highest stored version for the reference, 0 when there is none
    async fn max_version(&self, reference_id: &ReferenceId) -> StoreResult<i32>;

    /// Inserts the version only if the project is unlocked at write time.
    ///
    /// The lock read and the insert are one atomic step: a lock that commits
    /// first yields `StoreError::Locked`, a lock that commits later is ordered
    /// after this insert. A taken `(reference_id, version)` yields
    /// `StoreError::Duplicate`.
    async fn insert_version(&self, version: NewSelectionVersion) -> StoreResult<SelectionVersion>;

    /// All versions for the reference, ascending
    async fn list_versions(&self, reference_id: &ReferenceId) -> StoreResult<Vec<SelectionVersion>>;
}

// =============================================================================
// Edit requests
// =============================================================================

#[async_trait]
pub trait BaseEditRequestStore: Send + Sync {
    async fn insert_edit_request(&self, request: EditRequest) -> StoreResult<EditRequest>;

    /// Newest first
    async fn list_edit_requests(&self, reference_id: &ReferenceId) -> StoreResult<Vec<EditRequest>>;
}

// =============================================================================
// Reviews
// =============================================================================

#[async_trait]
pub trait BaseReviewStore: Send + Sync {
    /// Fails with `Duplicate` when `reference_id` or `customer_ref` is taken
    async fn insert_review(&self, review: Review) -> StoreResult<Review>;

    async fn find_review(&self, id: ReviewId) -> StoreResult<Option<Review>>;

    /// Merges a validated edit into the stored display fields in one atomic
    /// step; absent fields keep their current stored value. Never touches
    /// the snapshot.
    async fn apply_review_edit(&self, id: ReviewId, edit: ReviewEdit) -> StoreResult<Review>;

    /// Atomically applies `Review::publish` to the stored document
    async fn publish_review(&self, id: ReviewId) -> StoreResult<Review>;

    /// Published reviews with a snapshot, `published_at` desc then `updated_at` desc
    async fn list_published_reviews(&self) -> StoreResult<Vec<Review>>;

    /// Every review, newest created first
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;
}

// =============================================================================
// Document store (all collections)
// =============================================================================

#[async_trait]
pub trait BaseDocumentStore:
    BaseProjectStore + BaseSelectionStore + BaseEditRequestStore + BaseReviewStore
{
    /// Creates collections and unique indexes. Idempotent, but callers go
    /// through `StoreInitializer` so it runs once per process.
    async fn ensure_indexes(&self) -> StoreResult<()>;

    /// Cheap reachability probe for health checks
    async fn ping(&self) -> StoreResult<()>;
}

// =============================================================================
// Blob origin (Infrastructure - externally hosted media)
// =============================================================================

pub type ByteStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// What the origin answered: status, raw headers and an unbuffered body.
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

#[derive(Error, Debug)]
pub enum BlobOriginError {
    #[error("blob origin request failed: {0}")]
    Network(String),

    #[error("invalid blob origin url: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait BaseBlobOrigin: Send + Sync {
    /// Issues exactly one request for the asset, forwarding `range` verbatim
    async fn fetch(
        &self,
        asset_id: &str,
        range: Option<&HeaderValue>,
    ) -> Result<OriginResponse, BlobOriginError>;
}
