//! Zone set: which zone owns each object, and in what order.
//!
//! Every zone keeps its objects in a `Vec`, bottom first. Order matters for
//! libraries, graveyards and the stack; for the battlefield, hands and exile
//! it is entry order, which keeps iteration deterministic.
//!
//! An object is owned by exactly one zone. Inserting an object that some
//! zone already holds is a kernel defect and is reported as a
//! `RulesInvariantViolation` rather than silently fixed.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{InvariantViolation, ObjectId, PlayerId, Result, ViolationKind};
use crate::core::GameRng;

/// Position for inserting an object into a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of zone (e.g., top of library).
    Top,
    /// Add to bottom of zone.
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

/// Kind of zone, without the owning player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Stack,
    Exile,
}

/// A concrete zone. Libraries, hands and graveyards belong to a player;
/// the battlefield, stack and exile are shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library(PlayerId),
    Hand(PlayerId),
    Battlefield,
    Graveyard(PlayerId),
    Stack,
    Exile,
}

impl Zone {
    #[must_use]
    pub const fn kind(self) -> ZoneKind {
        match self {
            Zone::Library(_) => ZoneKind::Library,
            Zone::Hand(_) => ZoneKind::Hand,
            Zone::Battlefield => ZoneKind::Battlefield,
            Zone::Graveyard(_) => ZoneKind::Graveyard,
            Zone::Stack => ZoneKind::Stack,
            Zone::Exile => ZoneKind::Exile,
        }
    }

    /// The player a private zone belongs to.
    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        match self {
            Zone::Library(p) | Zone::Hand(p) | Zone::Graveyard(p) => Some(p),
            _ => None,
        }
    }

    /// Whether objects here are hidden from at least one player.
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Zone::Library(_) | Zone::Hand(_))
    }

    /// Every zone in a game with `player_count` seats.
    pub fn all(player_count: usize) -> impl Iterator<Item = Zone> {
        let shared = [Zone::Battlefield, Zone::Stack, Zone::Exile];
        PlayerId::all(player_count)
            .flat_map(|p| [Zone::Library(p), Zone::Hand(p), Zone::Graveyard(p)])
            .chain(shared)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Library(p) => write!(f, "library of {}", p),
            Zone::Hand(p) => write!(f, "hand of {}", p),
            Zone::Battlefield => write!(f, "battlefield"),
            Zone::Graveyard(p) => write!(f, "graveyard of {}", p),
            Zone::Stack => write!(f, "stack"),
            Zone::Exile => write!(f, "exile"),
        }
    }
}

/// Tracks object locations across all zones.
///
/// ```
/// use mtg_kernel::core::{ObjectId, PlayerId};
/// use mtg_kernel::zones::{Zone, ZonePosition, ZoneSet};
///
/// let mut zones = ZoneSet::new(2);
/// let library = Zone::Library(PlayerId(0));
///
/// zones.insert(ObjectId(10), library, ZonePosition::Top).unwrap();
/// zones.insert(ObjectId(11), library, ZonePosition::Bottom).unwrap();
///
/// assert_eq!(zones.objects_in(library), &[ObjectId(11), ObjectId(10)]);
/// assert_eq!(zones.top(library), Some(ObjectId(10)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneSet {
    /// object -> owning zone
    locations: FxHashMap<ObjectId, Zone>,

    /// zone -> objects, bottom first
    contents: FxHashMap<Zone, Vec<ObjectId>>,
}

impl ZoneSet {
    /// Create the zones for a game with `player_count` seats.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        let mut set = Self::default();
        for zone in Zone::all(player_count) {
            set.contents.insert(zone, Vec::new());
        }
        set
    }

    /// Put an object into a zone.
    ///
    /// Fails with `ZoneDoubleOwnership` if any zone already owns the object.
    pub fn insert(&mut self, object: ObjectId, zone: Zone, position: ZonePosition) -> Result<()> {
        if let Some(existing) = self.locations.get(&object) {
            let violation = InvariantViolation::new(ViolationKind::ZoneDoubleOwnership {
                existing: existing.kind(),
            })
            .with_objects([object]);
            error!(%object, %zone, existing = %existing, "object inserted into a second zone");
            return Err(violation.into());
        }

        self.locations.insert(object, zone);
        let order = self.contents.entry(zone).or_default();
        match position {
            ZonePosition::Top => order.push(object),
            ZonePosition::Bottom => order.insert(0, object),
            ZonePosition::Index(i) => {
                let idx = i.min(order.len());
                order.insert(idx, object);
            }
        }
        Ok(())
    }

    /// Remove an object from whichever zone holds it.
    pub fn remove(&mut self, object: ObjectId) -> Option<Zone> {
        let zone = self.locations.remove(&object)?;
        if let Some(order) = self.contents.get_mut(&zone) {
            order.retain(|&o| o != object);
        }
        Some(zone)
    }

    #[must_use]
    pub fn zone_of(&self, object: ObjectId) -> Option<Zone> {
        self.locations.get(&object).copied()
    }

    #[must_use]
    pub fn is_in(&self, object: ObjectId, zone: Zone) -> bool {
        self.locations.get(&object) == Some(&zone)
    }

    #[must_use]
    pub fn contains(&self, object: ObjectId) -> bool {
        self.locations.contains_key(&object)
    }

    /// Objects in a zone, bottom first.
    #[must_use]
    pub fn objects_in(&self, zone: Zone) -> &[ObjectId] {
        self.contents.get(&zone).map_or(&[], |v| v.as_slice())
    }

    /// Permanents in entry order.
    #[must_use]
    pub fn battlefield(&self) -> &[ObjectId] {
        self.objects_in(Zone::Battlefield)
    }

    #[must_use]
    pub fn len(&self, zone: Zone) -> usize {
        self.objects_in(zone).len()
    }

    #[must_use]
    pub fn is_empty(&self, zone: Zone) -> bool {
        self.objects_in(zone).is_empty()
    }

    #[must_use]
    pub fn top(&self, zone: Zone) -> Option<ObjectId> {
        self.objects_in(zone).last().copied()
    }

    /// Remove and return the top object of a zone.
    pub fn pop_top(&mut self, zone: Zone) -> Option<ObjectId> {
        let object = self.contents.get_mut(&zone)?.pop()?;
        self.locations.remove(&object);
        Some(object)
    }

    pub fn shuffle(&mut self, zone: Zone, rng: &mut GameRng) {
        if let Some(order) = self.contents.get_mut(&zone) {
            rng.shuffle(order);
        }
    }

    /// Total number of objects in all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.locations.len()
    }
}
