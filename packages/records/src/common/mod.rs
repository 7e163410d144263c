// Common types and utilities shared across the engine

pub mod entity_ids;
pub mod errors;
pub mod id;

pub use entity_ids::*;
pub use errors::{RecordError, RecordResult};
pub use id::{parse_identifier, Id};
