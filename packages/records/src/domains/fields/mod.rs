pub mod casting;
pub mod models;

// Re-export commonly used types
pub use casting::{cast_field, is_empty};
pub use models::{
    Address, CanonicalValue, DateRange, FieldDefinition, FieldMap, FieldType, GeoPoint, KeyNumber,
    LabelValue, NumberPair, NumberRange, ReferenceTarget, StaticFieldRegistry,
};
