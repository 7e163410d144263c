// In-memory record store - test double for BaseRecordStore
//
// Applies the same semantics as PgRecordStore and records every call, so
// tests can assert on how many writes a mutation issued.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::BaseRecordStore;
use crate::common::RecordId;
use crate::domains::records::models::{NewRecord, OpPath, Record, UpdateOps};

/// A call received by the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Insert { collection: String },
    ConditionalUpdate {
        collection: String,
        id: RecordId,
        ops: UpdateOps,
    },
    DeleteById { collection: String, id: RecordId },
    FindById { collection: String, id: RecordId },
}

impl StoreCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreCall::FindById { .. })
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<(String, RecordId), Record>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_writes: Mutex<Option<String>>,
    fail_reads: Mutex<Option<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `message`
    pub async fn fail_writes_with(&self, message: &str) {
        *self.fail_writes.lock().await = Some(message.to_string());
    }

    /// Make every subsequent `find_by_id` fail with `message`
    pub async fn fail_reads_with(&self, message: &str) {
        *self.fail_reads.lock().await = Some(message.to_string());
    }

    /// Get all calls received so far
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.calls.lock().await.iter().filter(|c| c.is_write()).count()
    }

    /// Number of records currently stored, across collections
    pub async fn record_count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Raw stored record, bypassing call recording
    pub async fn stored(&self, collection: &str, id: RecordId) -> Option<Record> {
        self.records
            .lock()
            .await
            .get(&(collection.to_string(), id))
            .cloned()
    }

    async fn record_call(&self, call: StoreCall) -> Result<()> {
        let failure = if call.is_write() {
            &self.fail_writes
        } else {
            &self.fail_reads
        };
        self.calls.lock().await.push(call);
        match failure.lock().await.as_ref() {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BaseRecordStore for MemoryRecordStore {
    async fn insert(&self, collection: &str, record: NewRecord) -> Result<Record> {
        self.record_call(StoreCall::Insert {
            collection: collection.to_string(),
        })
        .await?;

        let now = Utc::now();
        let stored = Record {
            id: RecordId::new(),
            collection: collection.to_string(),
            data: record.data_json(),
            visibility_roles: record.visibility_roles(),
            owner: record.stamp(&OpPath::Owner)?,
            created_by: record.stamp(&OpPath::CreatedBy)?,
            updated_by: record.stamp(&OpPath::UpdatedBy)?,
            created_at: now,
            updated_at: now,
        };

        self.records
            .lock()
            .await
            .insert((collection.to_string(), stored.id), stored.clone());
        Ok(stored)
    }

    async fn conditional_update(
        &self,
        collection: &str,
        id: RecordId,
        ops: &UpdateOps,
    ) -> Result<Option<Record>> {
        self.record_call(StoreCall::ConditionalUpdate {
            collection: collection.to_string(),
            id,
            ops: ops.clone(),
        })
        .await?;

        // Single lock for the read-modify-write
        let mut records = self.records.lock().await;
        let Some(current) = records.get_mut(&(collection.to_string(), id)) else {
            return Ok(None);
        };
        *current = current.clone().with_ops(ops, Utc::now());
        Ok(Some(current.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: RecordId) -> Result<Option<Record>> {
        self.record_call(StoreCall::DeleteById {
            collection: collection.to_string(),
            id,
        })
        .await?;

        Ok(self
            .records
            .lock()
            .await
            .remove(&(collection.to_string(), id)))
    }

    async fn find_by_id(&self, collection: &str, id: RecordId) -> Result<Option<Record>> {
        self.record_call(StoreCall::FindById {
            collection: collection.to_string(),
            id,
        })
        .await?;

        Ok(self.stored(collection, id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ActorId;
    use crate::domains::records::builders::{build_audit_ops, AuditMode};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryRecordStore::new();
        let meta = build_audit_ops(AuditMode::Create, ActorId::new());
        let record = store
            .insert("clienti", NewRecord::new(BTreeMap::new(), meta))
            .await
            .unwrap();

        assert!(store.find_by_id("clienti", record.id).await.unwrap().is_some());
        assert!(store.find_by_id("fatture", record.id).await.unwrap().is_none());
        assert!(store.delete_by_id("fatture", record.id).await.unwrap().is_none());
        assert_eq!(store.write_count().await, 2);
    }

    #[tokio::test]
    async fn test_insert_without_stamps_fails() {
        let store = MemoryRecordStore::new();
        let result = store
            .insert("clienti", NewRecord::new(BTreeMap::new(), UpdateOps::new()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let store = MemoryRecordStore::new();
        store.fail_writes_with("disk full").await;
        let meta = build_audit_ops(AuditMode::Create, ActorId::new());
        let err = store
            .insert("clienti", NewRecord::new(BTreeMap::new(), meta))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(store.record_count().await, 0);
        // Reads are unaffected
        assert!(store.find_by_id("clienti", RecordId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_reads() {
        let store = MemoryRecordStore::new();
        store.fail_reads_with("replica lag").await;
        let meta = build_audit_ops(AuditMode::Create, ActorId::new());
        let record = store
            .insert("clienti", NewRecord::new(BTreeMap::new(), meta))
            .await
            .unwrap();

        let err = store.find_by_id("clienti", record.id).await.unwrap_err();
        assert_eq!(err.to_string(), "replica lag");
        assert_eq!(store.calls().await.len(), 2);
    }
}
