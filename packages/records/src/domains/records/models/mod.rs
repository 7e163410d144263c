pub mod ops;
pub mod record;

pub use ops::{merge_ops, OpPath, UpdateOps};
pub use record::{NewRecord, Record};
