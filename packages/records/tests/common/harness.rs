//! Test harnesses for integration testing.
//!
//! `TestHarness` wires the engine to the in-memory store. `PgTestHarness`
//! uses a shared Postgres container (started once, migrations run once) and
//! needs Docker.

use anyhow::{Context, Result};
use records_core::kernel::{EngineDeps, MemoryRecordStore, PgRecordStore};
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::test_registry;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// In-memory harness
// =============================================================================

pub struct TestHarness {
    /// Store handle for assertions on stored state and received calls
    pub store: Arc<MemoryRecordStore>,
    pub deps: EngineDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        init_tracing();
        let store = Arc::new(MemoryRecordStore::new());
        let deps = EngineDeps::in_memory(store.clone(), test_registry());
        Self { store, deps }
    }
}

// =============================================================================
// Postgres harness
// =============================================================================

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
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
        PgRecordStore::new(pool).migrate().await?;

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

pub struct PgTestHarness {
    pub db_pool: PgPool,
    pub deps: EngineDeps,
}

impl AsyncTestContext for PgTestHarness {
    async fn setup() -> Self {
        let infra = SharedTestInfra::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .expect("Failed to connect to test database");
        let deps = EngineDeps::postgres(db_pool.clone(), test_registry());
        Self { db_pool, deps }
    }
}
