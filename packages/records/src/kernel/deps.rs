//! Engine dependencies for the record actions (using traits for testability)

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::fields::StaticFieldRegistry;
use crate::kernel::{BaseFieldRegistry, BaseRecordStore, MemoryRecordStore, PgRecordStore};

/// Dependencies accessible to the record actions
#[derive(Clone)]
pub struct EngineDeps {
    pub store: Arc<dyn BaseRecordStore>,
    pub registry: Arc<dyn BaseFieldRegistry>,
}

impl EngineDeps {
    pub fn new(store: Arc<dyn BaseRecordStore>, registry: Arc<dyn BaseFieldRegistry>) -> Self {
        Self { store, registry }
    }

    /// Postgres-backed store with a static registry
    pub fn postgres(pool: PgPool, registry: StaticFieldRegistry) -> Self {
        Self::new(Arc::new(PgRecordStore::new(pool)), Arc::new(registry))
    }

    /// In-memory store, for tests and database-less callers
    pub fn in_memory(store: Arc<MemoryRecordStore>, registry: StaticFieldRegistry) -> Self {
        Self::new(store, Arc::new(registry))
    }
}
