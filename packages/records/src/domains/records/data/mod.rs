pub mod record;

pub use record::RecordData;
