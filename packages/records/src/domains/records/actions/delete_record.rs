//! Delete record action

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::common::{RecordError, RecordId, RecordResult};
use crate::domains::records::input::validate_target;
use crate::kernel::EngineDeps;

/// `{ok: false}` when nothing was removed, `{ok: true, id}` otherwise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
}

pub async fn delete_record(
    type_slug: &str,
    id: &str,
    deps: &EngineDeps,
) -> RecordResult<DeleteOutcome> {
    let target = validate_target(type_slug, id)?;

    let removed = deps
        .store
        .delete_by_id(&target.collection, target.id)
        .await
        .map_err(|e| {
            error!("Failed to delete {}/{}: {}", target.collection, target.id, e);
            RecordError::Store(e)
        })?;

    match removed {
        Some(record) => {
            info!("Deleted {} record {}", target.collection, record.id);
            Ok(DeleteOutcome {
                ok: true,
                id: Some(record.id),
            })
        }
        None => {
            info!("Nothing to delete at {}/{}", target.collection, target.id);
            Ok(DeleteOutcome { ok: false, id: None })
        }
    }
}
