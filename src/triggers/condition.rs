//! Trigger conditions.
//!
//! A triggered ability listens for event kinds; its condition then narrows
//! which events of those kinds fire it, relative to the ability's source
//! and controller.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::cards::CardType;
use crate::core::{GameState, ObjectId, PlayerId};
use crate::layers::{CharacteristicSet, LayerSnapshot};
use crate::turn::Step;
use crate::zones::{Zone, ZoneKind};

/// A filter on events, relative to the listening ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerCondition {
    Always,
    Never,

    // === Subject ===

    /// The event is about the source itself (before or after a zone change).
    SubjectIsSelf,
    SubjectIsOther,
    SubjectControlledByYou,
    SubjectHasType(CardType),

    // === Zone changes ===

    ToZone(ZoneKind),
    FromZone(ZoneKind),

    // === Players and turns ===

    /// The event's player is the ability's controller.
    ForYou,
    ForOpponent,
    StepIs(Step),
    YourTurn,

    // === Values ===

    AmountAtLeast(u32),

    // === Combinators ===

    All(Vec<TriggerCondition>),
    Any(Vec<TriggerCondition>),
    Not(Box<TriggerCondition>),
}

impl TriggerCondition {
    /// "When this enters the battlefield".
    #[must_use]
    pub fn self_enters() -> Self {
        Self::all([Self::SubjectIsSelf, Self::ToZone(ZoneKind::Battlefield)])
    }

    /// "When this dies".
    #[must_use]
    pub fn self_dies() -> Self {
        Self::all([
            Self::SubjectIsSelf,
            Self::FromZone(ZoneKind::Battlefield),
            Self::ToZone(ZoneKind::Graveyard),
        ])
    }

    /// "Whenever another creature dies".
    #[must_use]
    pub fn another_creature_dies() -> Self {
        Self::all([
            Self::SubjectIsOther,
            Self::SubjectHasType(CardType::Creature),
            Self::FromZone(ZoneKind::Battlefield),
            Self::ToZone(ZoneKind::Graveyard),
        ])
    }

    /// "At the beginning of your upkeep".
    #[must_use]
    pub fn your_upkeep() -> Self {
        Self::all([Self::StepIs(Step::Upkeep), Self::YourTurn])
    }

    pub fn all(conditions: impl IntoIterator<Item = TriggerCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = TriggerCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: TriggerCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }
}

/// Everything a condition is checked against.
pub struct ConditionContext<'a> {
    pub event: &'a GameEvent,
    pub source: ObjectId,
    pub controller: PlayerId,
    pub state: &'a GameState,
    pub snapshot: &'a LayerSnapshot,
}

impl<'a> ConditionContext<'a> {
    /// Characteristics of the event's subject: last-known for objects that
    /// left the battlefield, current otherwise.
    fn subject_characteristics(&self) -> Option<&'a CharacteristicSet> {
        match self.event {
            GameEvent::ZoneChange {
                last_known: Some(chars),
                ..
            } => Some(chars.as_ref()),
            GameEvent::ZoneChange { new_object, .. } => self.snapshot.get(*new_object),
            _ => self.event.subject().and_then(|id| self.snapshot.get(id)),
        }
    }

    fn subject_is_source(&self) -> bool {
        match self.event {
            GameEvent::ZoneChange {
                object, new_object, ..
            } => *object == self.source || *new_object == self.source,
            _ => self.event.subject() == Some(self.source),
        }
    }

    fn zone_change(&self) -> Option<(Zone, Zone)> {
        match self.event {
            GameEvent::ZoneChange { from, to, .. } => Some((*from, *to)),
            _ => None,
        }
    }
}

/// Evaluator for trigger conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    #[must_use]
    pub fn evaluate(condition: &TriggerCondition, ctx: &ConditionContext) -> bool {
        match condition {
            TriggerCondition::Always => true,
            TriggerCondition::Never => false,

            TriggerCondition::SubjectIsSelf => ctx.subject_is_source(),
            TriggerCondition::SubjectIsOther => {
                ctx.event.subject().is_some() && !ctx.subject_is_source()
            }
            TriggerCondition::SubjectControlledByYou => ctx
                .subject_characteristics()
                .is_some_and(|c| c.controller == ctx.controller),
            TriggerCondition::SubjectHasType(t) => ctx
                .subject_characteristics()
                .is_some_and(|c| c.has_type(*t)),

            TriggerCondition::ToZone(kind) => {
                ctx.zone_change().is_some_and(|(_, to)| to.kind() == *kind)
            }
            TriggerCondition::FromZone(kind) => ctx
                .zone_change()
                .is_some_and(|(from, _)| from.kind() == *kind),

            TriggerCondition::ForYou => ctx.event.player() == Some(ctx.controller),
            TriggerCondition::ForOpponent => ctx
                .event
                .player()
                .is_some_and(|p| p != ctx.controller),
            TriggerCondition::StepIs(step) => {
                matches!(ctx.event, GameEvent::StepBegan { step: s, .. } if s == step)
            }
            TriggerCondition::YourTurn => ctx.state.turn.active_player == ctx.controller,

            TriggerCondition::AmountAtLeast(min) => {
                ctx.event.amount().is_some_and(|a| a >= *min)
            }

            TriggerCondition::All(conditions) => {
                conditions.iter().all(|c| Self::evaluate(c, ctx))
            }
            TriggerCondition::Any(conditions) => {
                conditions.iter().any(|c| Self::evaluate(c, ctx))
            }
            TriggerCondition::Not(inner) => !Self::evaluate(inner, ctx),
        }
    }
}
