//! Record actions - the create / update / delete pipelines
//!
//! Each action validates its input, runs the pure builders, and performs
//! exactly one call against the record store. Nothing is retried.

mod create_record;
mod delete_record;
mod get_record;
mod update_record;

pub use create_record::{create_record, CreatedRecord};
pub use delete_record::{delete_record, DeleteOutcome};
pub use get_record::get_record;
pub use update_record::update_record;
