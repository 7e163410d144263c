//! Typed ID definitions for the entities the engine touches.
//!
//! ```rust
//! use records_core::common::{ActorId, RecordId};
//!
//! let record_id = RecordId::new();
//! let actor_id = ActorId::new();
//!
//! // This would be a compile error:
//! // let wrong: ActorId = record_id;
//! ```

use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for stored records (any collection).
pub struct Record;

/// Marker type for the principal performing a mutation.
pub struct Actor;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for records.
pub type RecordId = Id<Record>;

/// Typed ID for acting principals (owner, creator, last editor).
pub type ActorId = Id<Actor>;
