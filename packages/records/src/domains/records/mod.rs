pub mod actions;
pub mod builders;
pub mod data;
pub mod input;
pub mod models;

// Re-export commonly used types
pub use actions::{create_record, delete_record, get_record, update_record, CreatedRecord, DeleteOutcome};
pub use builders::{
    build_audit_ops, build_create_object, build_patch_ops, build_visibility_ops, AuditMode, Delta,
};
pub use data::RecordData;
pub use models::{merge_ops, NewRecord, OpPath, Record, UpdateOps};
