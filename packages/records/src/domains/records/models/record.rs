use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet};

use super::ops::{OpPath, UpdateOps};
use crate::common::{ActorId, RecordId};
use crate::domains::fields::CanonicalValue;

/// A stored record of some collection ("type").
///
/// `data` is sparse: a key is present only while it holds a non-empty value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub collection: String,
    pub data: Map<String, Value>,
    pub visibility_roles: BTreeSet<String>,
    pub owner: ActorId,
    pub created_by: ActorId,
    pub updated_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a record: the sparse data object plus the metadata
/// instructions (audit stamps, visibility roles) produced by the builders.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub data: BTreeMap<String, CanonicalValue>,
    pub meta: UpdateOps,
}

impl NewRecord {
    pub fn new(data: BTreeMap<String, CanonicalValue>, meta: UpdateOps) -> Self {
        Self { data, meta }
    }

    pub fn data_json(&self) -> Map<String, Value> {
        self.data
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }

    pub fn visibility_roles(&self) -> BTreeSet<String> {
        self.meta
            .visibility_roles()
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    /// The actor stamped at `path`; every insert must carry all three stamps.
    pub fn stamp(&self, path: &OpPath) -> Result<ActorId> {
        self.meta
            .actor(path)
            .ok_or_else(|| anyhow!("New record is missing the {} stamp", path))
    }
}

// =============================================================================
// Postgres queries
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: RecordId,
    collection: String,
    data: Json<Map<String, Value>>,
    visibility_roles: Vec<String>,
    owner: ActorId,
    created_by: ActorId,
    updated_by: ActorId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            collection: row.collection,
            data: row.data.0,
            visibility_roles: row.visibility_roles.into_iter().collect(),
            owner: row.owner,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Record {
    pub async fn insert(collection: &str, record: &NewRecord, pool: &PgPool) -> Result<Self> {
        let roles: Vec<String> = record.visibility_roles().into_iter().collect();

        sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO records (id, collection, data, visibility_roles, owner, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(RecordId::new())
        .bind(collection)
        .bind(Json(record.data_json()))
        .bind(roles)
        .bind(record.stamp(&OpPath::Owner)?)
        .bind(record.stamp(&OpPath::CreatedBy)?)
        .bind(record.stamp(&OpPath::UpdatedBy)?)
        .fetch_one(pool)
        .await
        .map(Into::into)
        .map_err(Into::into)
    }

    /// Apply `ops` in a single statement; `None` when no record matched.
    ///
    /// Unset paths are removed before set paths are merged, which matches the
    /// merger's guarantee that a path is never in both.
    pub async fn apply_ops(
        collection: &str,
        id: RecordId,
        ops: &UpdateOps,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE records
            SET data = (data - $3::text[]) || $4::jsonb,
                visibility_roles = COALESCE($5::text[], visibility_roles),
                owner = COALESCE($6, owner),
                created_by = COALESCE($7, created_by),
                updated_by = COALESCE($8, updated_by),
                updated_at = now()
            WHERE collection = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(ops.data_unset_keys())
        .bind(Json(ops.data_set_json()))
        .bind(ops.visibility_roles())
        .bind(ops.actor(&OpPath::Owner))
        .bind(ops.actor(&OpPath::CreatedBy))
        .bind(ops.actor(&OpPath::UpdatedBy))
        .fetch_optional(pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(Into::into)
    }

    pub async fn find_by_id(collection: &str, id: RecordId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, RecordRow>("SELECT * FROM records WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(Into::into)
    }

    pub async fn delete(collection: &str, id: RecordId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, RecordRow>(
            "DELETE FROM records WHERE collection = $1 AND id = $2 RETURNING *",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(Into::into)
    }

    /// Apply `ops` to an in-memory copy, mirroring `apply_ops`.
    pub fn with_ops(mut self, ops: &UpdateOps, now: DateTime<Utc>) -> Self {
        for key in ops.data_unset_keys() {
            self.data.remove(&key);
        }
        self.data.extend(ops.data_set_json());
        if let Some(roles) = ops.visibility_roles() {
            self.visibility_roles = roles.into_iter().collect();
        }
        if let Some(owner) = ops.actor(&OpPath::Owner) {
            self.owner = owner;
        }
        if let Some(created_by) = ops.actor(&OpPath::CreatedBy) {
            self.created_by = created_by;
        }
        if let Some(updated_by) = ops.actor(&OpPath::UpdatedBy) {
            self.updated_by = updated_by;
        }
        self.updated_at = now;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored(data: Value) -> Record {
        let actor = ActorId::new();
        let now = Utc::now();
        Record {
            id: RecordId::new(),
            collection: "clienti".into(),
            data: data.as_object().cloned().unwrap_or_default(),
            visibility_roles: BTreeSet::new(),
            owner: actor,
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_with_ops_touches_only_named_paths() {
        let record = stored(json!({"ragioneSociale": "Acme", "citta": "Milano", "note": "vip"}));
        let editor = ActorId::new();

        let mut ops = UpdateOps::new();
        ops.unset(OpPath::data("ragioneSociale"));
        ops.set(OpPath::data("telefono"), CanonicalValue::Text("02123".into()));
        ops.set(OpPath::UpdatedBy, CanonicalValue::Reference(editor.into_uuid()));

        let updated = record.clone().with_ops(&ops, Utc::now());

        assert!(!updated.data.contains_key("ragioneSociale"));
        assert_eq!(updated.data["telefono"], json!("02123"));
        assert_eq!(updated.data["citta"], record.data["citta"]);
        assert_eq!(updated.data["note"], record.data["note"]);
        assert_eq!(updated.owner, record.owner);
        assert_eq!(updated.created_by, record.created_by);
        assert_eq!(updated.updated_by, editor);
    }

    #[test]
    fn test_new_record_requires_stamps() {
        let record = NewRecord::new(BTreeMap::new(), UpdateOps::new());
        let err = record.stamp(&OpPath::Owner).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }
}
