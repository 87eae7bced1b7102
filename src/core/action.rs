//! Player actions submitted by the driver.
//!
//! An action is a verb plus the objects it points at. The driver picks one
//! from `RulesEngine::legal_actions` (or builds one directly) and hands it to
//! `RulesEngine::apply_action`, which either accepts it whole or rejects it
//! without touching the state.
//!
//! ```
//! use mtg_kernel::core::{ObjectId, PlayerAction, PlayerId};
//! use mtg_kernel::effects::Target;
//!
//! let bolt = PlayerAction::cast_targeting(ObjectId(30), &[Target::Player(PlayerId(1))]);
//! assert!(bolt.uses_stack());
//! assert_eq!(bolt.targets().len(), 1);
//!
//! assert!(!PlayerAction::play_land(ObjectId(12)).uses_stack());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::ObjectId;
use super::player::PlayerId;
use crate::effects::Target;

/// Chosen targets for a spell or ability, in target-spec order.
pub type TargetList = SmallVec<[Target; 2]>;

/// Everything a player holding priority can do.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Pass priority.
    PassPriority,

    /// Play a land from hand (special action, keeps priority).
    PlayLand { card: ObjectId },

    /// Cast a spell from hand.
    CastSpell { card: ObjectId, targets: TargetList },

    /// Activate a non-mana activated ability of a permanent.
    ActivateAbility {
        source: ObjectId,
        index: usize,
        targets: TargetList,
    },

    /// Activate a permanent's mana ability. Does not use the stack.
    ActivateManaAbility { source: ObjectId },
}

impl PlayerAction {
    #[must_use]
    pub fn pass() -> Self {
        Self::PassPriority
    }

    #[must_use]
    pub fn play_land(card: ObjectId) -> Self {
        Self::PlayLand { card }
    }

    /// Cast a spell with no targets.
    #[must_use]
    pub fn cast(card: ObjectId) -> Self {
        Self::CastSpell {
            card,
            targets: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn cast_targeting(card: ObjectId, targets: &[Target]) -> Self {
        Self::CastSpell {
            card,
            targets: SmallVec::from_slice(targets),
        }
    }

    #[must_use]
    pub fn activate(source: ObjectId, index: usize, targets: &[Target]) -> Self {
        Self::ActivateAbility {
            source,
            index,
            targets: SmallVec::from_slice(targets),
        }
    }

    #[must_use]
    pub fn tap_for_mana(source: ObjectId) -> Self {
        Self::ActivateManaAbility { source }
    }

    /// Whether accepting this action puts something on the stack.
    #[must_use]
    pub fn uses_stack(&self) -> bool {
        matches!(self, Self::CastSpell { .. } | Self::ActivateAbility { .. })
    }

    /// Targets chosen for this action.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        match self {
            Self::CastSpell { targets, .. } | Self::ActivateAbility { targets, .. } => targets,
            _ => &[],
        }
    }
}

/// An accepted action with its position in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: PlayerAction,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number across the match.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: PlayerAction, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
