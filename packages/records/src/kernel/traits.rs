// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no casting or merging logic.
// The mutation pipeline in domains/records is written against these traits.
//
// Naming convention: Base* for trait names (e.g., BaseRecordStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::RecordId;
use crate::domains::fields::FieldMap;
use crate::domains::records::models::{NewRecord, Record, UpdateOps};

// =============================================================================
// Record Store Trait (Infrastructure - persistence boundary)
// =============================================================================

/// The only component allowed to perform persistence side effects.
///
/// Implementations must apply `conditional_update` atomically per record.
/// Concurrent updates of one record are last-writer-wins.
#[async_trait]
pub trait BaseRecordStore: Send + Sync {
    /// Insert a new record, stamping `created_at`/`updated_at`
    async fn insert(&self, collection: &str, record: NewRecord) -> Result<Record>;

    /// Apply the instruction set to the record matching `id`, returning the
    /// post-update state, or `None` if no record matched
    async fn conditional_update(
        &self,
        collection: &str,
        id: RecordId,
        ops: &UpdateOps,
    ) -> Result<Option<Record>>;

    /// Delete by id, returning the removed record if there was one
    async fn delete_by_id(&self, collection: &str, id: RecordId) -> Result<Option<Record>>;

    /// Read-only fetch
    async fn find_by_id(&self, collection: &str, id: RecordId) -> Result<Option<Record>>;
}

// =============================================================================
// Field Registry Trait (Infrastructure - per-type field definitions)
// =============================================================================

#[async_trait]
pub trait BaseFieldRegistry: Send + Sync {
    /// Field definitions of a record type; empty when the type is unknown
    async fn field_definitions(&self, type_slug: &str) -> Result<FieldMap>;
}
