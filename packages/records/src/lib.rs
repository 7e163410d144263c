// Business Records - Mutation Engine
//
// This crate turns untyped, partial field deltas into type-correct storage
// operations against sparse per-type records. The field registry describes
// each record type; the store is reached only through the kernel traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
