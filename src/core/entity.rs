//! Object identity and timestamps.
//!
//! Every card, token or spell in the game is a `GameObject` addressed by an
//! `ObjectId`. Identities are never reused: when an object changes zones the
//! kernel issues a fresh id, so a permanent on the battlefield is a distinct
//! object from the spell that became it.
//!
//! ## Usage
//!
//! ```
//! use mtg_kernel::core::{ObjectId, Timestamp};
//!
//! let bear = ObjectId::new(7);
//! assert_eq!(bear.raw(), 7);
//! assert_eq!(format!("{}", bear), "Object(7)");
//!
//! // Timestamps order continuous effects and objects entering zones.
//! assert!(Timestamp::new(3) < Timestamp::new(4));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a game object.
///
/// Ids are allocated monotonically by `GameState` and never recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Create an object id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ObjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// Monotonic game timestamp.
///
/// Assigned whenever an object enters a zone or a continuous effect is
/// created. Two things created by the same event may share a timestamp;
/// ties are broken in APNAP order by the layer engine.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}
