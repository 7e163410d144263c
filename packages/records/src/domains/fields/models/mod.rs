pub mod field_definition;
pub mod registry;
pub mod value;

pub use field_definition::{FieldDefinition, FieldMap, FieldType, ReferenceTarget};
pub use registry::StaticFieldRegistry;
pub use value::{
    Address, CanonicalValue, DateRange, GeoPoint, KeyNumber, LabelValue, NumberPair, NumberRange,
};
