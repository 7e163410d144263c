pub mod fields;
pub mod records;
