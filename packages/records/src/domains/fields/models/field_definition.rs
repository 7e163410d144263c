use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field definitions of one record type, keyed by field key.
pub type FieldMap = HashMap<String, FieldDefinition>;

/// Closed set of field shapes the caster understands.
///
/// Registry documents use the camelCase names (`"labelArray"`,
/// `"referenceMulti"`, ...). Names this build does not know deserialize to
/// `Unknown` and are stored as given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Select,
    Email,
    Tel,
    Textarea,
    Multiselect,
    LabelArray,
    Number,
    NumberArray,
    Boolean,
    Date,
    RangeNumber,
    RangeDate,
    GeoPoint,
    GeoPointArray,
    PairNumber,
    LabelValuePairs,
    KeyValueNumber,
    Address,
    Reference,
    ReferenceMulti,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Select => "select",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Textarea => "textarea",
            FieldType::Multiselect => "multiselect",
            FieldType::LabelArray => "labelArray",
            FieldType::Number => "number",
            FieldType::NumberArray => "numberArray",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::RangeNumber => "rangeNumber",
            FieldType::RangeDate => "rangeDate",
            FieldType::GeoPoint => "geoPoint",
            FieldType::GeoPointArray => "geoPointArray",
            FieldType::PairNumber => "pairNumber",
            FieldType::LabelValuePairs => "labelValuePairs",
            FieldType::KeyValueNumber => "keyValueNumber",
            FieldType::Address => "address",
            FieldType::Reference => "reference",
            FieldType::ReferenceMulti => "referenceMulti",
            FieldType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Target collection of a `reference` / `referenceMulti` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceTarget {
    pub collection: String,
}

/// One entry of a record type's field registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDefinition {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Only meaningful for reference types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceTarget>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
            reference: None,
        }
    }

    /// A single-pointer field targeting `collection`.
    pub fn reference(key: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type: FieldType::Reference,
            reference: Some(ReferenceTarget {
                collection: collection.into(),
            }),
        }
    }

    /// A multi-pointer field targeting `collection`.
    pub fn reference_multi(key: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type: FieldType::ReferenceMulti,
            reference: Some(ReferenceTarget {
                collection: collection.into(),
            }),
        }
    }
}
