// TestDependencies - in-process implementations for testing
//
// `InMemoryStore` honors the same atomicity contract as the Postgres store
// (lock check and insert under one guard, unique indexes on insert) and adds
// hooks for injecting the interleavings that are hard to hit on purpose.
// `MockBlobOrigin` replays canned origin responses and records every call.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use bytes::Bytes;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    BaseBlobOrigin, BaseDocumentStore, BaseEditRequestStore, BaseProjectStore, BaseReviewStore,
    BaseSelectionStore, BlobOriginError, OriginResponse, StoreError, StoreResult,
};
use crate::common::{ReferenceId, ReviewId};
use crate::domains::reviews::models::{Review, ReviewEdit};
use crate::domains::selection::models::{
    EditRequest, NewSelectionVersion, Project, SelectionVersion,
};

// =============================================================================
// In-memory document store
// =============================================================================

#[derive(Default)]
struct State {
    projects: HashMap<ReferenceId, Project>,
    versions: Vec<SelectionVersion>,
    edit_requests: Vec<EditRequest>,
    reviews: Vec<Review>,
    /// Versions another writer sneaks in right before our next inserts
    competing_inserts: usize,
    /// References that get locked right before the next insert against them
    lock_before_insert: Vec<ReferenceId>,
    /// Edits another admin lands right before our next edit of that review
    competing_review_edits: Vec<(ReviewId, ReviewEdit)>,
}

pub struct InMemoryStore {
    state: Mutex<State>,
    index_runs: AtomicUsize,
    index_delay: Duration,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            index_runs: AtomicUsize::new(0),
            index_delay: Duration::ZERO,
        }
    }

    /// Makes `ensure_indexes` take a while, to widen initialization races
    pub fn with_index_delay(mut self, delay: Duration) -> Self {
        self.index_delay = delay;
        self
    }

    /// The next `n` version inserts collide with a concurrent writer that
    /// claimed the same version number first
    pub fn inject_competing_inserts(&self, n: usize) {
        self.state.lock().unwrap().competing_inserts = n;
    }

    /// An admin lock lands between the caller's lock read and its insert
    pub fn lock_before_next_insert(&self, reference_id: &ReferenceId) {
        self.state
            .lock()
            .unwrap()
            .lock_before_insert
            .push(reference_id.clone());
    }

    /// Another admin's edit lands while the caller's edit is in flight
    pub fn edit_before_next_review_update(&self, id: ReviewId, edit: ReviewEdit) {
        self.state
            .lock()
            .unwrap()
            .competing_review_edits
            .push((id, edit));
    }

    /// Number of times `ensure_indexes` actually ran
    pub fn index_runs(&self) -> usize {
        self.index_runs.load(Ordering::SeqCst)
    }

    /// Writes a review row as-is, bypassing uniqueness and lifecycle rules
    pub fn put_raw_review(&self, review: Review) {
        self.state.lock().unwrap().reviews.push(review);
    }
}

fn project_entry<'a>(state: &'a mut State, reference_id: &ReferenceId) -> &'a mut Project {
    state
        .projects
        .entry(reference_id.clone())
        .or_insert_with(|| Project::new(reference_id.clone(), Utc::now()))
}

#[async_trait]
impl BaseProjectStore for InMemoryStore {
    async fn ensure_project(&self, reference_id: &ReferenceId) -> StoreResult<Project> {
        let mut state = self.state.lock().unwrap();
        Ok(project_entry(&mut state, reference_id).clone())
    }

    async fn find_project(&self, reference_id: &ReferenceId) -> StoreResult<Option<Project>> {
        Ok(self.state.lock().unwrap().projects.get(reference_id).cloned())
    }

    async fn set_lock(&self, reference_id: &ReferenceId, locked: bool) -> StoreResult<Project> {
        let mut state = self.state.lock().unwrap();
        let project = project_entry(&mut state, reference_id);
        project.apply_lock(locked, Utc::now());
        Ok(project.clone())
    }
}

#[async_trait]
impl BaseSelectionStore for InMemoryStore {
    async fn max_version(&self, reference_id: &ReferenceId) -> StoreResult<i32> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .versions
            .iter()
            .filter(|v| &v.reference_id == reference_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_version(&self, version: NewSelectionVersion) -> StoreResult<SelectionVersion> {
        let mut state = self.state.lock().unwrap();

        if let Some(pos) = state
            .lock_before_insert
            .iter()
            .position(|r| r == &version.reference_id)
        {
            let reference_id = state.lock_before_insert.remove(pos);
            project_entry(&mut state, &reference_id).apply_lock(true, Utc::now());
        }

        if project_entry(&mut state, &version.reference_id).selection_locked {
            return Err(StoreError::Locked);
        }

        if state.competing_inserts > 0 {
            state.competing_inserts -= 1;
            let competitor = NewSelectionVersion {
                reference_id: version.reference_id.clone(),
                version: version.version,
                selected_asset_ids: vec!["competing-writer".to_string()],
            };
            state.versions.push(competitor.into_record(Utc::now()));
        }

        let taken = state
            .versions
            .iter()
            .any(|v| v.reference_id == version.reference_id && v.version == version.version);
        if taken {
            return Err(StoreError::Duplicate {
                index: "reference_id_version".to_string(),
            });
        }

        let record = version.into_record(Utc::now());
        state.versions.push(record.clone());
        Ok(record)
    }

    async fn list_versions(&self, reference_id: &ReferenceId) -> StoreResult<Vec<SelectionVersion>> {
        let mut versions: Vec<SelectionVersion> = self
            .state
            .lock()
            .unwrap()
            .versions
            .iter()
            .filter(|v| &v.reference_id == reference_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }
}

#[async_trait]
impl BaseEditRequestStore for InMemoryStore {
    async fn insert_edit_request(&self, request: EditRequest) -> StoreResult<EditRequest> {
        self.state
            .lock()
            .unwrap()
            .edit_requests
            .push(request.clone());
        Ok(request)
    }

    async fn list_edit_requests(&self, reference_id: &ReferenceId) -> StoreResult<Vec<EditRequest>> {
        let state = self.state.lock().unwrap();
        // Insertion order breaks created_at ties, newest last
        let mut requests: Vec<(usize, EditRequest)> = state
            .edit_requests
            .iter()
            .enumerate()
            .filter(|(_, r)| &r.reference_id == reference_id)
            .map(|(i, r)| (i, r.clone()))
            .collect();
        requests.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(requests.into_iter().map(|(_, r)| r).collect())
    }
}

#[async_trait]
impl BaseReviewStore for InMemoryStore {
    async fn insert_review(&self, review: Review) -> StoreResult<Review> {
        let mut state = self.state.lock().unwrap();
        for existing in &state.reviews {
            if review.reference_id.is_some() && existing.reference_id == review.reference_id {
                return Err(StoreError::Duplicate {
                    index: "reference_id".to_string(),
                });
            }
            if review.customer_ref.is_some() && existing.customer_ref == review.customer_ref {
                return Err(StoreError::Duplicate {
                    index: "customer_ref".to_string(),
                });
            }
        }
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: ReviewId) -> StoreResult<Option<Review>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .reviews
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn apply_review_edit(&self, id: ReviewId, edit: ReviewEdit) -> StoreResult<Review> {
        let mut state = self.state.lock().unwrap();
        let competing: Vec<ReviewEdit> = {
            let (hits, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut state.competing_review_edits)
                .into_iter()
                .partition(|(target, _)| *target == id);
            state.competing_review_edits = rest;
            hits.into_iter().map(|(_, edit)| edit).collect()
        };

        let review = state
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        for other in competing {
            review.apply_edit(other, Utc::now());
        }
        review.apply_edit(edit, Utc::now());
        Ok(review.clone())
    }

    async fn publish_review(&self, id: ReviewId) -> StoreResult<Review> {
        let mut state = self.state.lock().unwrap();
        let review = state
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        review.publish(Utc::now());
        Ok(review.clone())
    }

    async fn list_published_reviews(&self) -> StoreResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .state
            .lock()
            .unwrap()
            .reviews
            .iter()
            .filter(|r| r.is_public())
            .cloned()
            .collect();
        reviews.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then(b.updated_at.cmp(&a.updated_at))
        });
        Ok(reviews)
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let mut reviews = self.state.lock().unwrap().reviews.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

#[async_trait]
impl BaseDocumentStore for InMemoryStore {
    async fn ensure_indexes(&self) -> StoreResult<()> {
        if !self.index_delay.is_zero() {
            tokio::time::sleep(self.index_delay).await;
        }
        self.index_runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Mock blob origin
// =============================================================================

/// Arguments captured from a fetch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub asset_id: String,
    pub range: Option<String>,
}

enum MockReply {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        chunks: Vec<Bytes>,
        endless: bool,
    },
    Fail(String),
}

/// Sets its flag when dropped; rides inside the body stream.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct MockBlobOrigin {
    replies: Mutex<Vec<MockReply>>,
    calls: Mutex<Vec<FetchCall>>,
    body_dropped: Arc<AtomicBool>,
}

impl Default for MockBlobOrigin {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBlobOrigin {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            body_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue a complete response
    pub fn with_response(self, status: StatusCode, headers: &[(&str, &str)], body: &[u8]) -> Self {
        self.replies.lock().unwrap().push(MockReply::Respond {
            status,
            headers: header_map(headers),
            chunks: vec![Bytes::copy_from_slice(body)],
            endless: false,
        });
        self
    }

    /// Queue a response whose body yields `first_chunk` and then never ends
    pub fn with_endless_body(self, status: StatusCode, first_chunk: &[u8]) -> Self {
        self.replies.lock().unwrap().push(MockReply::Respond {
            status,
            headers: HeaderMap::new(),
            chunks: vec![Bytes::copy_from_slice(first_chunk)],
            endless: true,
        });
        self
    }

    /// Queue a network failure
    pub fn with_network_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether a body handed out by this origin has been dropped
    pub fn body_dropped(&self) -> bool {
        self.body_dropped.load(Ordering::SeqCst)
    }
}

fn header_map(headers: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}

#[async_trait]
impl BaseBlobOrigin for MockBlobOrigin {
    async fn fetch(
        &self,
        asset_id: &str,
        range: Option<&HeaderValue>,
    ) -> Result<OriginResponse, BlobOriginError> {
        self.calls.lock().unwrap().push(FetchCall {
            asset_id: asset_id.to_string(),
            range: range.and_then(|r| r.to_str().ok()).map(str::to_string),
        });

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                MockReply::Respond {
                    status: StatusCode::NOT_FOUND,
                    headers: HeaderMap::new(),
                    chunks: Vec::new(),
                    endless: false,
                }
            } else {
                replies.remove(0)
            }
        };

        match reply {
            MockReply::Fail(message) => Err(BlobOriginError::Network(message)),
            MockReply::Respond {
                status,
                headers,
                chunks,
                endless,
            } => {
                let guard = DropFlag(self.body_dropped.clone());
                let chunks = stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));
                let body = if endless {
                    chunks.chain(stream::pending()).boxed()
                } else {
                    chunks.boxed()
                };
                let body = body
                    .map(move |chunk| {
                        let _ = &guard;
                        chunk
                    })
                    .boxed();
                Ok(OriginResponse {
                    status,
                    headers,
                    body,
                })
            }
        }
    }
}
