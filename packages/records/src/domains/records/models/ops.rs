//! Update instruction sets: "assign these paths, remove those paths".

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::common::ActorId;
use crate::domains::fields::CanonicalValue;

/// A storage path touched by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpPath {
    /// `data.<key>` inside the record's sparse data document
    Data(String),
    VisibilityRoles,
    Owner,
    CreatedBy,
    UpdatedBy,
}

impl OpPath {
    pub fn data(key: impl Into<String>) -> Self {
        OpPath::Data(key.into())
    }
}

impl fmt::Display for OpPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpPath::Data(key) => write!(f, "data.{}", key),
            OpPath::VisibilityRoles => f.write_str("visibilityRoles"),
            OpPath::Owner => f.write_str("owner"),
            OpPath::CreatedBy => f.write_str("createdBy"),
            OpPath::UpdatedBy => f.write_str("updatedBy"),
        }
    }
}

/// `{set, unset}` instructions for one atomic write.
///
/// Built fresh per mutation, merged from the builders, consumed once by a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOps {
    pub set: BTreeMap<OpPath, CanonicalValue>,
    pub unset: BTreeSet<OpPath>,
}

impl UpdateOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: OpPath, value: CanonicalValue) {
        self.set.insert(path, value);
    }

    pub fn unset(&mut self, path: OpPath) {
        self.unset.insert(path);
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Every path the instruction set mentions.
    pub fn paths(&self) -> impl Iterator<Item = &OpPath> {
        self.set.keys().chain(self.unset.iter())
    }

    /// Assigned `data.*` entries as the JSON object to merge into the document.
    pub fn data_set_json(&self) -> Map<String, Value> {
        self.set
            .iter()
            .filter_map(|(path, value)| match path {
                OpPath::Data(key) => Some((key.clone(), value.to_json())),
                _ => None,
            })
            .collect()
    }

    /// Keys removed from the data document.
    pub fn data_unset_keys(&self) -> Vec<String> {
        self.unset
            .iter()
            .filter_map(|path| match path {
                OpPath::Data(key) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    /// New visibility roles, if the instruction set touches them.
    ///
    /// Unsetting the roles clears them: the column is a set, never null.
    pub fn visibility_roles(&self) -> Option<Vec<String>> {
        if self.unset.contains(&OpPath::VisibilityRoles) {
            return Some(Vec::new());
        }
        self.set
            .get(&OpPath::VisibilityRoles)
            .and_then(CanonicalValue::as_text_list)
            .map(<[String]>::to_vec)
    }

    /// Actor stamped at an audit path (`owner`, `createdBy`, `updatedBy`).
    pub fn actor(&self, path: &OpPath) -> Option<ActorId> {
        self.set
            .get(path)
            .and_then(CanonicalValue::as_reference)
            .map(ActorId::from_uuid)
    }
}

/// Fold partial instruction sets into one.
///
/// Later parts overwrite earlier ones of the same kind. A path that ends up
/// unset is dropped from `set`, whichever part assigned it.
pub fn merge_ops<I>(parts: I) -> UpdateOps
where
    I: IntoIterator<Item = Option<UpdateOps>>,
{
    let mut merged = parts
        .into_iter()
        .flatten()
        .fold(UpdateOps::new(), |mut acc, part| {
            acc.set.extend(part.set);
            acc.unset.extend(part.unset);
            acc
        });

    let unset = &merged.unset;
    merged.set.retain(|path, _| !unset.contains(path));
    merged
}
