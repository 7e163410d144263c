//! Pure builders turning deltas and actors into instruction fragments.
//!
//! Nothing here performs I/O. The orchestrating actions compose the fragments
//! with [`merge_ops`](super::models::merge_ops) and hand the result to a store.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::models::{OpPath, UpdateOps};
use crate::common::ActorId;
use crate::domains::fields::{cast_field, CanonicalValue, FieldMap};

/// Partial map of field key to raw value supplied by a caller.
pub type Delta = Map<String, Value>;

/// Which audit stamps a write carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditMode {
    Create,
    Update,
}

/// Instructions for an update delta.
///
/// Each delta key becomes `set data.<key>` or, when it casts to absent,
/// `unset data.<key>`. Keys outside the delta are never mentioned. Returns
/// `None` when the delta produces no instruction.
pub fn build_patch_ops(delta: &Delta, fields: &FieldMap) -> Option<UpdateOps> {
    let mut ops = UpdateOps::new();

    for (key, raw) in delta {
        let path = OpPath::data(key.as_str());
        match cast_field(fields.get(key), Some(raw)) {
            Some(value) => ops.set(path, value),
            None => ops.unset(path),
        }
    }

    (!ops.is_empty()).then_some(ops)
}

/// Sparse data object for a creation delta; absent values are omitted.
pub fn build_create_object(delta: &Delta, fields: &FieldMap) -> BTreeMap<String, CanonicalValue> {
    delta
        .iter()
        .filter_map(|(key, raw)| {
            cast_field(fields.get(key), Some(raw)).map(|value| (key.clone(), value))
        })
        .collect()
}

/// Audit stamps for a write by `actor`.
///
/// Creation stamps owner, creator and last editor. Updates stamp only the
/// last editor; owner and creator are immutable after creation.
pub fn build_audit_ops(mode: AuditMode, actor: ActorId) -> UpdateOps {
    let stamp = CanonicalValue::Reference(actor.into_uuid());
    let mut ops = UpdateOps::new();

    if mode == AuditMode::Create {
        ops.set(OpPath::Owner, stamp.clone());
        ops.set(OpPath::CreatedBy, stamp.clone());
    }
    ops.set(OpPath::UpdatedBy, stamp);
    ops
}

/// Visibility-roles instruction, only when the caller supplied roles.
///
/// Roles are trimmed, blank ones dropped, and the result de-duplicated.
/// An empty list clears the roles.
pub fn build_visibility_ops(roles: Option<&[String]>) -> Option<UpdateOps> {
    let roles = roles?;
    let normalized: BTreeSet<String> = roles
        .iter()
        .map(|role| role.trim())
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect();

    let mut ops = UpdateOps::new();
    ops.set(
        OpPath::VisibilityRoles,
        CanonicalValue::TextList(normalized.into_iter().collect()),
    );
    Some(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::fields::{FieldDefinition, FieldType};
    use serde_json::json;

    fn clienti_fields() -> FieldMap {
        [
            FieldDefinition::new("ragioneSociale", FieldType::Text),
            FieldDefinition::new("telefono", FieldType::Tel),
            FieldDefinition::new("notes", FieldType::Textarea),
            FieldDefinition::new("fatturato", FieldType::Number),
            FieldDefinition::reference("clienteId", "clienti"),
        ]
        .into_iter()
        .map(|field| (field.key.clone(), field))
        .collect()
    }

    fn delta(value: Value) -> Delta {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_patch_ops_blank_text_unsets_and_phone_sets() {
        let ops = build_patch_ops(
            &delta(json!({"ragioneSociale": "  ", "telefono": "02123"})),
            &clienti_fields(),
        )
        .unwrap();

        assert_eq!(
            ops.unset.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["data.ragioneSociale"]
        );
        assert_eq!(ops.set.len(), 1);
        assert_eq!(
            ops.set.get(&OpPath::data("telefono")),
            Some(&CanonicalValue::Text("02123".into()))
        );
    }

    #[test]
    fn test_patch_ops_invalid_reference_unsets() {
        let ops =
            build_patch_ops(&delta(json!({"clienteId": "not-a-valid-id"})), &clienti_fields())
                .unwrap();
        assert!(ops.set.is_empty());
        assert!(ops.unset.contains(&OpPath::data("clienteId")));
    }

    #[test]
    fn test_patch_ops_mention_only_delta_keys() {
        let ops = build_patch_ops(
            &delta(json!({"fatturato": "1200,50", "extra": {"any": "shape"}})),
            &clienti_fields(),
        )
        .unwrap();

        let mentioned: Vec<String> = ops.paths().map(ToString::to_string).collect();
        assert_eq!(mentioned, vec!["data.extra", "data.fatturato"]);
        assert_eq!(
            ops.set.get(&OpPath::data("extra")),
            Some(&CanonicalValue::Raw(json!({"any": "shape"})))
        );
    }

    #[test]
    fn test_patch_ops_empty_values_never_set() {
        let fields = clienti_fields();
        for empty in [Value::Null, json!(""), json!("   "), json!([])] {
            for key in ["ragioneSociale", "fatturato", "clienteId", "unregistered"] {
                let mut d = Delta::new();
                d.insert(key.to_string(), empty.clone());
                let ops = build_patch_ops(&d, &fields).unwrap();
                assert!(ops.set.is_empty(), "{key} {empty}");
                assert!(ops.unset.contains(&OpPath::data(key)));
            }
        }
    }

    #[test]
    fn test_patch_ops_empty_delta_is_none() {
        assert_eq!(build_patch_ops(&Delta::new(), &clienti_fields()), None);
    }

    #[test]
    fn test_create_object_is_sparse() {
        let object = build_create_object(
            &delta(json!({"ragioneSociale": "Acme", "notes": "", "clienteId": "bogus"})),
            &clienti_fields(),
        );
        assert_eq!(object.len(), 1);
        assert_eq!(
            object.get("ragioneSociale"),
            Some(&CanonicalValue::Text("Acme".into()))
        );
    }

    #[test]
    fn test_audit_create_stamps_everything() {
        let actor = ActorId::new();
        let ops = build_audit_ops(AuditMode::Create, actor);
        assert_eq!(ops.actor(&OpPath::Owner), Some(actor));
        assert_eq!(ops.actor(&OpPath::CreatedBy), Some(actor));
        assert_eq!(ops.actor(&OpPath::UpdatedBy), Some(actor));
        assert!(ops.unset.is_empty());
    }

    #[test]
    fn test_audit_update_stamps_editor_only() {
        let actor = ActorId::new();
        let ops = build_audit_ops(AuditMode::Update, actor);
        assert_eq!(ops.set.len(), 1);
        assert_eq!(ops.actor(&OpPath::UpdatedBy), Some(actor));
        assert_eq!(ops.actor(&OpPath::Owner), None);
        assert_eq!(ops.actor(&OpPath::CreatedBy), None);
    }

    #[test]
    fn test_visibility_ops() {
        assert_eq!(build_visibility_ops(None), None);

        let roles = vec![" sales ".to_string(), "admin".into(), "".into(), "sales".into()];
        let ops = build_visibility_ops(Some(roles.as_slice())).unwrap();
        assert_eq!(
            ops.visibility_roles(),
            Some(vec!["admin".to_string(), "sales".to_string()])
        );

        let cleared: Vec<String> = Vec::new();
        let ops = build_visibility_ops(Some(cleared.as_slice())).unwrap();
        assert_eq!(ops.visibility_roles(), Some(vec![]));
    }
}
