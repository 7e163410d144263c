//! Test fixtures: field registries and identifiers.

use records_core::common::ActorId;
use records_core::domains::fields::{FieldDefinition, FieldType, StaticFieldRegistry};

/// Registry with a `clienti` (customers) and a `fatture` (invoices) type
pub fn test_registry() -> StaticFieldRegistry {
    StaticFieldRegistry::new()
        .with_type(
            "clienti",
            [
                FieldDefinition::new("ragioneSociale", FieldType::Text),
                FieldDefinition::new("telefono", FieldType::Tel),
                FieldDefinition::new("email", FieldType::Email),
                FieldDefinition::new("name", FieldType::Text),
                FieldDefinition::new("notes", FieldType::Textarea),
                FieldDefinition::new("tags", FieldType::LabelArray),
                FieldDefinition::new("attivo", FieldType::Boolean),
                FieldDefinition::new("sede", FieldType::Address),
                FieldDefinition::new("posizione", FieldType::GeoPoint),
            ],
        )
        .with_type(
            "fatture",
            [
                FieldDefinition::new("numero", FieldType::Number),
                FieldDefinition::new("data", FieldType::Date),
                FieldDefinition::new("righe", FieldType::KeyValueNumber),
                FieldDefinition::reference("clienteId", "clienti"),
                FieldDefinition::reference_multi("allegati", "documenti"),
            ],
        )
}

/// A fresh, well-formed actor id as caller input
pub fn actor() -> String {
    ActorId::new().to_string()
}
