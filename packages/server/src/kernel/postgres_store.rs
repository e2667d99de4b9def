//! PostgreSQL-backed document store.
//!
//! Each collection is a table; uniqueness lives in the indexes created by the
//! migrations (`reference_id_version`, and the partial indexes on reviews).
//! Lock enforcement for version inserts relies on row locks on `projects`:
//! inserts hold `FOR SHARE` on the project row, lock toggles take
//! `FOR UPDATE`, so the two are strictly ordered.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::{
    BaseDocumentStore, BaseEditRequestStore, BaseProjectStore, BaseReviewStore,
    BaseSelectionStore, StoreError, StoreResult,
};
use crate::common::{ReferenceId, ReviewId, SelectionVersionId};
use crate::domains::reviews::models::{Review, ReviewEdit};
use crate::domains::selection::models::{
    EditRequest, NewSelectionVersion, Project, SelectionVersion,
};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate {
                index: db.constraint().unwrap_or("unknown").to_string(),
            },
            _ => StoreError::Backend(err.into()),
        }
    }
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const INSERT_PROJECT_IF_MISSING: &str =
    "INSERT INTO projects (reference_id) VALUES ($1) ON CONFLICT (reference_id) DO NOTHING";

// =============================================================================
// Projects
// =============================================================================

#[async_trait]
impl BaseProjectStore for PostgresStore {
    async fn ensure_project(&self, reference_id: &ReferenceId) -> StoreResult<Project> {
        sqlx::query(INSERT_PROJECT_IF_MISSING)
            .bind(reference_id)
            .execute(&self.pool)
            .await?;

        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE reference_id = $1")
            .bind(reference_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(project)
    }

    async fn find_project(&self, reference_id: &ReferenceId) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE reference_id = $1")
            .bind(reference_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn set_lock(&self, reference_id: &ReferenceId, locked: bool) -> StoreResult<Project> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(INSERT_PROJECT_IF_MISSING)
            .bind(reference_id)
            .execute(&mut *tx)
            .await?;

        // Waits for in-flight version inserts holding FOR SHARE on this row
        let current = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE reference_id = $1 FOR UPDATE",
        )
        .bind(reference_id)
        .fetch_one(&mut *tx)
        .await?;

        if current.selection_locked == locked {
            tx.commit().await?;
            return Ok(current);
        }

        // clock_timestamp(), not now(): the stamp must postdate every insert
        // we just waited for, not the start of this transaction
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET selection_locked = $2,
                selection_locked_at = CASE WHEN $2 THEN clock_timestamp() ELSE NULL END,
                updated_at = clock_timestamp()
            WHERE reference_id = $1
            RETURNING *
            "#,
        )
        .bind(reference_id)
        .bind(locked)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project)
    }
}

// =============================================================================
// Selection versions
// =============================================================================

#[async_trait]
impl BaseSelectionStore for PostgresStore {
    async fn max_version(&self, reference_id: &ReferenceId) -> StoreResult<i32> {
        let max = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version), 0) FROM selection_versions WHERE reference_id = $1",
        )
        .bind(reference_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(max)
    }

    async fn insert_version(&self, version: NewSelectionVersion) -> StoreResult<SelectionVersion> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(INSERT_PROJECT_IF_MISSING)
            .bind(&version.reference_id)
            .execute(&mut *tx)
            .await?;

        let locked = sqlx::query_scalar::<_, bool>(
            "SELECT selection_locked FROM projects WHERE reference_id = $1 FOR SHARE",
        )
        .bind(&version.reference_id)
        .fetch_one(&mut *tx)
        .await?;

        if locked {
            // Dropping the transaction rolls it back
            return Err(StoreError::Locked);
        }

        let record = sqlx::query_as::<_, SelectionVersion>(
            r#"
            INSERT INTO selection_versions (id, reference_id, version, selected_asset_ids, created_at)
            VALUES ($1, $2, $3, $4, clock_timestamp())
            RETURNING *
            "#,
        )
        .bind(SelectionVersionId::new())
        .bind(&version.reference_id)
        .bind(version.version)
        .bind(&version.selected_asset_ids)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn list_versions(&self, reference_id: &ReferenceId) -> StoreResult<Vec<SelectionVersion>> {
        let versions = sqlx::query_as::<_, SelectionVersion>(
            "SELECT * FROM selection_versions WHERE reference_id = $1 ORDER BY version ASC",
        )
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(versions)
    }
}

// =============================================================================
// Edit requests
// =============================================================================

#[async_trait]
impl BaseEditRequestStore for PostgresStore {
    async fn insert_edit_request(&self, request: EditRequest) -> StoreResult<EditRequest> {
        let request = sqlx::query_as::<_, EditRequest>(
            r#"
            INSERT INTO edit_requests (id, reference_id, details, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.id)
        .bind(&request.reference_id)
        .bind(&request.details)
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    async fn list_edit_requests(&self, reference_id: &ReferenceId) -> StoreResult<Vec<EditRequest>> {
        // ids are v7, so they break created_at ties in insertion order
        let requests = sqlx::query_as::<_, EditRequest>(
            "SELECT * FROM edit_requests WHERE reference_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }
}

// =============================================================================
// Reviews
// =============================================================================

#[async_trait]
impl BaseReviewStore for PostgresStore {
    async fn insert_review(&self, review: Review) -> StoreResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                id, reference_id, customer_ref, status, name, rating, text, images,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(&review.reference_id)
        .bind(&review.customer_ref)
        .bind(review.status)
        .bind(&review.name)
        .bind(review.rating)
        .bind(&review.text)
        .bind(&review.images)
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(review)
    }

    async fn find_review(&self, id: ReviewId) -> StoreResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(review)
    }

    async fn apply_review_edit(&self, id: ReviewId, edit: ReviewEdit) -> StoreResult<Review> {
        // One statement: a concurrent edit to other fields is never overwritten
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET name = COALESCE($2, name),
                rating = COALESCE($3, rating),
                text = COALESCE($4, text),
                images = COALESCE($5, images),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&edit.name)
        .bind(edit.rating)
        .bind(&edit.text)
        .bind(&edit.images)
        .fetch_optional(&self.pool)
        .await?;
        review.ok_or(StoreError::NotFound)
    }

    async fn publish_review(&self, id: ReviewId) -> StoreResult<Review> {
        let mut tx = self.pool.begin().await?;

        let mut review =
            sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::NotFound)?;

        review.publish(Utc::now());

        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET status = $2, published_at = $3, published_snapshot = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(review.status)
        .bind(review.published_at)
        .bind(&review.published_snapshot)
        .bind(review.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review)
    }

    async fn list_published_reviews(&self) -> StoreResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE status = 'published' AND published_snapshot IS NOT NULL
            ORDER BY published_at DESC, updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }
}

#[async_trait]
impl BaseDocumentStore for PostgresStore {
    async fn ensure_indexes(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.into()))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
