//! Kernel module - infrastructure traits and their implementations.

pub mod deps;
pub mod pg_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::EngineDeps;
pub use pg_store::PgRecordStore;
pub use test_dependencies::{MemoryRecordStore, StoreCall};
pub use traits::*;
