//! Update record action

use tracing::{debug, error, info};

use crate::common::{RecordError, RecordResult};
use crate::domains::records::builders::{
    build_audit_ops, build_patch_ops, build_visibility_ops, AuditMode, Delta,
};
use crate::domains::records::data::RecordData;
use crate::domains::records::input::validate_update;
use crate::domains::records::models::merge_ops;
use crate::kernel::EngineDeps;

/// Patch a record with a delta.
///
/// Only delta keys are touched: values set `data.<key>`, empty or malformed
/// values remove it. Visibility roles change only when `visibility_roles` is
/// `Some`. When neither produces an instruction the record is fetched and
/// returned unchanged, without stamping `updatedBy`.
///
/// Returns `Ok(None)` when no record has this id.
pub async fn update_record(
    type_slug: &str,
    id: &str,
    actor_id: &str,
    delta: &Delta,
    visibility_roles: Option<&[String]>,
    deps: &EngineDeps,
) -> RecordResult<Option<RecordData>> {
    let input = validate_update(type_slug, id, actor_id)?;

    info!(
        "Updating {} record {} with {} delta keys",
        input.collection,
        input.id,
        delta.len()
    );

    let fields = deps.registry.field_definitions(&input.collection).await?;
    let data_ops = build_patch_ops(delta, &fields);
    let visibility_ops = build_visibility_ops(visibility_roles);

    if data_ops.is_none() && visibility_ops.is_none() {
        debug!("No-op update of {}/{}", input.collection, input.id);
        let current = deps
            .store
            .find_by_id(&input.collection, input.id)
            .await
            .map_err(|e| {
                error!("Failed to read {}/{}: {}", input.collection, input.id, e);
                RecordError::Store(e)
            })?;
        return Ok(current.map(RecordData::from));
    }

    let ops = merge_ops([
        data_ops,
        Some(build_audit_ops(AuditMode::Update, input.actor)),
        visibility_ops,
    ]);

    let updated = deps
        .store
        .conditional_update(&input.collection, input.id, &ops)
        .await
        .map_err(|e| {
            error!("Failed to update {}/{}: {}", input.collection, input.id, e);
            RecordError::Store(e)
        })?;

    match updated {
        Some(record) => {
            debug!(
                "Updated {}/{}: {} set, {} unset",
                input.collection,
                input.id,
                ops.set.len(),
                ops.unset.len()
            );
            Ok(Some(RecordData::from(record)))
        }
        None => {
            info!("Record {}/{} not found", input.collection, input.id);
            Ok(None)
        }
    }
}
