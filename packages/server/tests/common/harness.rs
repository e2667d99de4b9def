//! Test harness with testcontainers for Postgres-backed store tests.
//!
//! One container is shared by every test in the binary; migrations run once
//! through the store's own initialization. Tests isolate themselves by using
//! fresh reference ids.

use anyhow::{Context, Result};
use sqlx::PgPool;
use studio_core::common::ReferenceId;
use studio_core::kernel::{BaseDocumentStore, PostgresStore};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --ignored --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        PostgresStore::new(pool)
            .ensure_indexes()
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test handle onto the shared database.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// #[ignore = "requires Docker"]
/// async fn my_test(ctx: &TestHarness) {
///     let r = ctx.fresh_reference();
///     ctx.store.ensure_project(&r).await.unwrap();
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub store: PostgresStore,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Pool is dropped with the harness
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            store: PostgresStore::new(db_pool.clone()),
            db_pool,
        })
    }

    /// A reference id no other test uses
    pub fn fresh_reference(&self) -> ReferenceId {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        ReferenceId::parse(&format!("T-{}", &suffix[..16])).expect("valid reference id")
    }
}
