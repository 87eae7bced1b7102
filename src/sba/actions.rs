//! State-based action kinds and the policies that shape them.

use serde::{Deserialize, Serialize};

use crate::core::{ObjectId, PlayerId};

/// Why a player lost the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoseReason {
    /// Life total is 0 or less.
    ZeroLife,
    /// Ten or more poison counters.
    Poison,
    /// Attempted to draw from an empty library.
    DrewFromEmptyLibrary,
}

/// Why a creature is put into its owner's graveyard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathReason {
    /// Toughness 0 or less. Indestructible does not help.
    ZeroToughness,
    /// Marked damage at least equal to toughness.
    LethalDamage,
    /// Any damage from a source with deathtouch.
    Deathtouch,
}

/// Which permanent survives when a player controls two legends with the
/// same name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendRulePolicy {
    /// Keep the one that arrived last.
    #[default]
    KeepNewest,
    /// Keep the one that has been there longest.
    KeepOldest,
}

/// One state-based action found in a single check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateBasedAction {
    PlayerLoses {
        player: PlayerId,
        reason: LoseReason,
    },
    CreatureDies {
        object: ObjectId,
        reason: DeathReason,
    },
    /// Planeswalker with no loyalty counters.
    PlaneswalkerOutOfLoyalty { object: ObjectId },
    /// All but `kept` go to the graveyard.
    LegendRule {
        kept: ObjectId,
        removed: Vec<ObjectId>,
    },
    /// Remove `amount` each of +1/+1 and -1/-1 counters.
    CountersAnnihilate { object: ObjectId, amount: u32 },
    /// A token in a zone other than the battlefield.
    TokenCeasesToExist { object: ObjectId },
}

impl StateBasedAction {
    /// Objects this action touches.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectId> {
        match self {
            StateBasedAction::PlayerLoses { .. } => Vec::new(),
            StateBasedAction::CreatureDies { object, .. }
            | StateBasedAction::PlaneswalkerOutOfLoyalty { object }
            | StateBasedAction::CountersAnnihilate { object, .. }
            | StateBasedAction::TokenCeasesToExist { object } => vec![*object],
            StateBasedAction::LegendRule { kept, removed } => {
                std::iter::once(*kept).chain(removed.iter().copied()).collect()
            }
        }
    }

    /// Objects this action puts into a graveyard.
    #[must_use]
    pub fn graveyard_moves(&self) -> &[ObjectId] {
        match self {
            StateBasedAction::CreatureDies { object, .. }
            | StateBasedAction::PlaneswalkerOutOfLoyalty { object } => std::slice::from_ref(object),
            StateBasedAction::LegendRule { removed, .. } => removed,
            _ => &[],
        }
    }
}
