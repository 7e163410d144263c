use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::field_definition::{FieldDefinition, FieldMap};
use crate::kernel::BaseFieldRegistry;

/// In-memory field registry keyed by record type slug.
///
/// The JSON document form is `{ "<typeSlug>": [ {"key": .., "type": ..}, .. ] }`.
#[derive(Debug, Clone, Default)]
pub struct StaticFieldRegistry {
    types: HashMap<String, FieldMap>,
}

impl StaticFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the fields of one record type.
    pub fn with_type(
        mut self,
        type_slug: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> Self {
        let map = fields
            .into_iter()
            .map(|field| (field.key.clone(), field))
            .collect();
        self.types.insert(type_slug.into(), map);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: HashMap<String, Vec<FieldDefinition>> =
            serde_json::from_str(json).context("Invalid field registry document")?;

        Ok(document
            .into_iter()
            .fold(Self::new(), |registry, (slug, fields)| {
                registry.with_type(slug, fields)
            }))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read field registry {}", path.display()))?;
        let registry = Self::from_json(&json)?;
        debug!(
            "Loaded field registry with {} types from {}",
            registry.types.len(),
            path.display()
        );
        Ok(registry)
    }
}

#[async_trait]
impl BaseFieldRegistry for StaticFieldRegistry {
    async fn field_definitions(&self, type_slug: &str) -> Result<FieldMap> {
        // Unregistered types cast every field by raw pass-through
        Ok(self.types.get(type_slug).cloned().unwrap_or_default())
    }
}
