//! Read-only record fetch

use tracing::error;

use crate::common::{RecordError, RecordResult};
use crate::domains::records::data::RecordData;
use crate::domains::records::input::validate_target;
use crate::kernel::EngineDeps;

/// Fetch one record without touching it; `None` when the id is unknown.
pub async fn get_record(
    type_slug: &str,
    id: &str,
    deps: &EngineDeps,
) -> RecordResult<Option<RecordData>> {
    let target = validate_target(type_slug, id)?;

    let record = deps
        .store
        .find_by_id(&target.collection, target.id)
        .await
        .map_err(|e| {
            error!("Failed to read {}/{}: {}", target.collection, target.id, e);
            RecordError::Store(e)
        })?;
    Ok(record.map(RecordData::from))
}
