//! Error taxonomy for the rules kernel.
//!
//! - [`IllegalAction`]: the driver asked for something the rules forbid right
//!   now. Rejected before any state is touched.
//! - `IllegalTarget`: a chosen target is not legal. At cast time this rejects
//!   the action; at resolution it becomes a fizzle rather than an error.
//! - [`InvariantViolation`]: the kernel itself is wrong (SBAs that never
//!   converge, an object owned by two zones, a dependency sort that cannot
//!   finish). Carries the ids needed to debug it.
//! - [`StateQueryError`]: a query named something that does not exist.

use thiserror::Error;

use super::entity::ObjectId;
use super::player::PlayerId;
use crate::cards::{CardId, ManaCost};
use crate::effects::Target;
use crate::layers::EffectId;
use crate::stack::StackItemId;
use crate::zones::ZoneKind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RulesError>;

/// Top-level kernel error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Action violates timing, priority or cost rules.
    #[error("illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),

    /// A target is not legal for the spell or ability choosing it.
    #[error("illegal target {target}: {reason}")]
    IllegalTarget { target: Target, reason: &'static str },

    /// The engine reached a state the rules never allow.
    #[error("rules invariant violated: {0}")]
    RulesInvariantViolation(#[from] InvariantViolation),

    /// A query referenced something that does not exist.
    #[error("state query failed: {0}")]
    StateQuery(#[from] StateQueryError),
}

impl RulesError {
    /// Whether this error is an expected, player-facing rejection.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IllegalAction(_) | Self::IllegalTarget { .. })
    }
}

/// Reasons an action is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("the match is over")]
    GameOver,

    #[error("{player} does not hold priority (holder: {holder:?})")]
    NotPriorityHolder {
        player: PlayerId,
        holder: Option<PlayerId>,
    },

    #[error("{object} is not in the expected zone ({expected:?})")]
    WrongZone { object: ObjectId, expected: ZoneKind },

    #[error("{player} does not control {object}")]
    NotController { object: ObjectId, player: PlayerId },

    #[error("{object} cannot be used this way: {reason}")]
    WrongCardType {
        object: ObjectId,
        reason: &'static str,
    },

    #[error("wrong timing: {0}")]
    WrongTiming(&'static str),

    #[error("{player} has already played a land this turn")]
    LandAlreadyPlayed { player: PlayerId },

    #[error("cannot pay {cost}")]
    CannotPayCost { cost: ManaCost },

    #[error("{object} is already tapped")]
    AlreadyTapped { object: ObjectId },

    #[error("{object} has summoning sickness")]
    SummoningSick { object: ObjectId },

    #[error("{object} has no ability #{index}")]
    NoSuchAbility { object: ObjectId, index: usize },

    #[error("{object} has no mana ability")]
    NoManaAbility { object: ObjectId },

    #[error("expected {expected} targets, got {got}")]
    WrongTargetCount { expected: usize, got: usize },
}

/// What kind of kernel invariant broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("state-based actions did not converge after {iterations} iterations")]
    SbaNonConvergence { iterations: usize },

    #[error("dependency ordering could not place every effect")]
    DependencyCycleExhausted,

    #[error("object is already owned by {existing:?}")]
    ZoneDoubleOwnership { existing: ZoneKind },

    #[error("object tracked by a zone has no record")]
    MissingObject,

    #[error("stack item {item} does not match the stack zone")]
    StackDesync { item: StackItemId },
}

/// A kernel defect with diagnostic context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (objects: {objects:?}, effects: {effects:?})")]
pub struct InvariantViolation {
    pub kind: ViolationKind,
    pub objects: Vec<ObjectId>,
    pub effects: Vec<EffectId>,
}

impl InvariantViolation {
    /// Create a violation with no context attached.
    #[must_use]
    pub fn new(kind: ViolationKind) -> Self {
        Self {
            kind,
            objects: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Attach offending object ids.
    #[must_use]
    pub fn with_objects(mut self, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        self.objects.extend(objects);
        self
    }

    /// Attach the effect ids that were active.
    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = EffectId>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Failed lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateQueryError {
    #[error("{0} is not in any zone")]
    ObjectNotFound(ObjectId),

    #[error("no card definition for {0}")]
    UnknownCard(CardId),

    #[error("no card named {0:?}")]
    UnknownCardName(String),

    #[error("{0} is not seated in this game")]
    UnknownPlayer(PlayerId),
}
