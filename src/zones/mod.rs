//! Zone system for object locations.
//!
//! ## Key Types
//!
//! - `Zone`: a concrete zone (a player's library, the battlefield, ...)
//! - `ZoneKind`: the zone category without its owner
//! - `ZoneSet`: location tracking and movement, one owner per object
//! - `ZonePosition`: insertion point within a zone

pub mod manager;

pub use manager::{Zone, ZoneKind, ZonePosition, ZoneSet};
