// Common test utilities

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;

/// Macro for building a delta from JSON object syntax
#[macro_export]
macro_rules! delta {
    ($($json:tt)+) => {{
        match serde_json::json!($($json)+) {
            serde_json::Value::Object(map) => map,
            other => panic!("delta must be a JSON object, got {}", other),
        }
    }};
}
