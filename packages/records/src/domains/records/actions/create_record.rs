//! Create record action

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::common::{RecordError, RecordId, RecordResult};
use crate::domains::records::builders::{
    build_audit_ops, build_create_object, build_visibility_ops, AuditMode, Delta,
};
use crate::domains::records::data::RecordData;
use crate::domains::records::input::validate_create;
use crate::domains::records::models::{merge_ops, NewRecord};
use crate::kernel::EngineDeps;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedRecord {
    pub id: RecordId,
}

/// Create a record of `type_slug` from a creation delta.
///
/// Empty or malformed values are simply left out of the stored document.
/// Without `visibility_roles` the record starts with no roles.
pub async fn create_record(
    type_slug: &str,
    actor_id: &str,
    delta: &Delta,
    visibility_roles: Option<&[String]>,
    deps: &EngineDeps,
) -> RecordResult<CreatedRecord> {
    let input = validate_create(type_slug, actor_id)?;

    info!(
        "Creating {} record with {} delta keys",
        input.collection,
        delta.len()
    );

    let fields = deps.registry.field_definitions(&input.collection).await?;
    let data = build_create_object(delta, &fields);
    let meta = merge_ops([
        Some(build_audit_ops(AuditMode::Create, input.actor)),
        build_visibility_ops(Some(visibility_roles.unwrap_or_default())),
    ]);

    let record = deps
        .store
        .insert(&input.collection, NewRecord::new(data, meta))
        .await
        .map_err(|e| {
            error!("Failed to insert {} record: {}", input.collection, e);
            RecordError::Store(e)
        })?;

    let created = RecordData::from(record);
    info!("Created {} record {}", input.collection, created.id);

    Ok(CreatedRecord { id: created.id })
}
