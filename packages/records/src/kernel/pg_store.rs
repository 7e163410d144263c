//! Postgres record store.
//!
//! Every method is a single statement, so each mutation performs exactly one
//! atomic operation against the database.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::common::RecordId;
use crate::domains::records::models::{NewRecord, Record, UpdateOps};
use crate::kernel::BaseRecordStore;

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the bundled schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")
    }
}

#[async_trait]
impl BaseRecordStore for PgRecordStore {
    async fn insert(&self, collection: &str, record: NewRecord) -> Result<Record> {
        let record = Record::insert(collection, &record, &self.pool).await?;
        debug!("Inserted record {}/{}", collection, record.id);
        Ok(record)
    }

    async fn conditional_update(
        &self,
        collection: &str,
        id: RecordId,
        ops: &UpdateOps,
    ) -> Result<Option<Record>> {
        Record::apply_ops(collection, id, ops, &self.pool).await
    }

    async fn delete_by_id(&self, collection: &str, id: RecordId) -> Result<Option<Record>> {
        Record::delete(collection, id, &self.pool).await
    }

    async fn find_by_id(&self, collection: &str, id: RecordId) -> Result<Option<Record>> {
        Record::find_by_id(collection, id, &self.pool).await
    }
}
