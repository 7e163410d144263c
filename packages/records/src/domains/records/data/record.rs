use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::RecordId;
use crate::domains::fields::is_empty;
use crate::domains::records::models::Record;

/// Outward-facing record representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordData {
    pub id: RecordId,

    /// Only the keys currently set; cleared fields have no key at all
    pub data: Map<String, Value>,

    pub visibility_roles: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl From<Record> for RecordData {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            // Documents written outside this engine may still carry empty markers
            data: record
                .data
                .into_iter()
                .filter(|(_, value)| !is_empty(Some(value)))
                .collect(),
            visibility_roles: record.visibility_roles.into_iter().collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
