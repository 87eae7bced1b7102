//! Game events.
//!
//! Components emit events through `GameState::emit` as things happen. Each
//! event is matched right away against the triggered abilities listening
//! for its kind; the collector later puts the matches on the stack.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CounterType};
use crate::core::{ObjectId, PlayerId};
use crate::effects::Target;
use crate::layers::CharacteristicSet;
use crate::stack::StackItemId;
use crate::turn::Step;
use crate::zones::Zone;

/// Event kind, used to index listening abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ZoneChange,
    DamageDealt,
    LifeGained,
    LifeLost,
    CardDrawn,
    SpellCast,
    StepBegan,
    CountersAdded,
}

/// Something that happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An object changed zones and became `new_object`.
    ZoneChange {
        object: ObjectId,
        new_object: ObjectId,
        card: CardId,
        owner: PlayerId,
        from: Zone,
        to: Zone,
        /// Characteristics as the object last existed on the battlefield.
        last_known: Option<Box<CharacteristicSet>>,
    },
    DamageDealt {
        source: Option<ObjectId>,
        target: Target,
        amount: u32,
    },
    LifeGained {
        player: PlayerId,
        amount: u32,
    },
    LifeLost {
        player: PlayerId,
        amount: u32,
    },
    CardDrawn {
        player: PlayerId,
        object: ObjectId,
    },
    SpellCast {
        player: PlayerId,
        spell: ObjectId,
        item: StackItemId,
    },
    StepBegan {
        step: Step,
        active: PlayerId,
    },
    CountersAdded {
        object: ObjectId,
        counter: CounterType,
        amount: u32,
    },
}

impl GameEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ZoneChange { .. } => EventKind::ZoneChange,
            GameEvent::DamageDealt { .. } => EventKind::DamageDealt,
            GameEvent::LifeGained { .. } => EventKind::LifeGained,
            GameEvent::LifeLost { .. } => EventKind::LifeLost,
            GameEvent::CardDrawn { .. } => EventKind::CardDrawn,
            GameEvent::SpellCast { .. } => EventKind::SpellCast,
            GameEvent::StepBegan { .. } => EventKind::StepBegan,
            GameEvent::CountersAdded { .. } => EventKind::CountersAdded,
        }
    }

    /// The object the event is about, as it was when the event happened.
    #[must_use]
    pub fn subject(&self) -> Option<ObjectId> {
        match self {
            GameEvent::ZoneChange { object, .. } => Some(*object),
            GameEvent::DamageDealt {
                target: Target::Object(id),
                ..
            } => Some(*id),
            GameEvent::CardDrawn { object, .. } => Some(*object),
            GameEvent::SpellCast { spell, .. } => Some(*spell),
            GameEvent::CountersAdded { object, .. } => Some(*object),
            _ => None,
        }
    }

    /// The player the event is about.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::DamageDealt {
                target: Target::Player(p),
                ..
            } => Some(*p),
            GameEvent::LifeGained { player, .. }
            | GameEvent::LifeLost { player, .. }
            | GameEvent::CardDrawn { player, .. }
            | GameEvent::SpellCast { player, .. } => Some(*player),
            GameEvent::StepBegan { active, .. } => Some(*active),
            GameEvent::ZoneChange { owner, .. } => Some(*owner),
            GameEvent::CountersAdded { .. } | GameEvent::DamageDealt { .. } => None,
        }
    }

    /// Numeric payload: damage, life or counters.
    #[must_use]
    pub fn amount(&self) -> Option<u32> {
        match self {
            GameEvent::DamageDealt { amount, .. }
            | GameEvent::LifeGained { amount, .. }
            | GameEvent::LifeLost { amount, .. }
            | GameEvent::CountersAdded { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}
