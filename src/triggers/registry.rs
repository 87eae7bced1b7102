//! Trigger registry and ordering policy.
//!
//! Triggered abilities are printed on cards, so the registry is built once
//! from the card database and indexed by the event kinds each ability
//! listens for. Which objects currently carry those abilities is decided
//! per event by the collector.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::event::{EventKind, GameEvent};
use crate::cards::{CardId, CardRegistry};
use crate::effects::{Target, TargetSpec};

/// What a triggered ability targets, taken from its triggering event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTarget {
    /// The permanent the event is about. For zone changes this is the
    /// object as it now exists.
    EventObject,
    /// The player the event is about.
    EventPlayer,
}

impl TriggerTarget {
    /// The candidate target for this event, if it has one.
    #[must_use]
    pub fn from_event(self, event: &GameEvent) -> Option<Target> {
        match self {
            TriggerTarget::EventObject => match event {
                GameEvent::ZoneChange { new_object, .. } => Some(Target::Object(*new_object)),
                _ => event.subject().map(Target::Object),
            },
            TriggerTarget::EventPlayer => event.player().map(Target::Player),
        }
    }

    #[must_use]
    pub fn spec(self) -> TargetSpec {
        match self {
            TriggerTarget::EventObject => TargetSpec::permanent(),
            TriggerTarget::EventPlayer => TargetSpec::player(),
        }
    }
}

/// Order of one player's simultaneous triggers on the stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithinPlayerOrder {
    /// Earlier sources are pushed first, so later sources resolve first.
    #[default]
    Timestamp,
    /// Later sources are pushed first.
    ReverseTimestamp,
}

/// How simultaneous triggers are put on the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPolicy {
    pub within_player: WithinPlayerOrder,
    /// Whether leaves-the-battlefield abilities see the object that left.
    pub look_back_on_leave: bool,
    /// Whether a trigger is dropped at collection when its source left the
    /// battlefield after triggering. Look-back triggers are never dropped.
    pub drop_if_source_left: bool,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            within_player: WithinPlayerOrder::Timestamp,
            look_back_on_leave: true,
            drop_if_source_left: false,
        }
    }
}

/// Index from event kind to the printed abilities listening for it.
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    by_event: FxHashMap<EventKind, Vec<(CardId, usize)>>,
    count: usize,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every triggered ability in the card database.
    pub fn from_cards(cards: &CardRegistry) -> Self {
        let mut registry = Self::new();
        for def in cards.iter() {
            for (index, ability) in def.triggered.iter().enumerate() {
                registry.register(def.id, index, &ability.events);
            }
        }
        registry
    }

    /// Record that ability `index` of `card` listens for `events`.
    pub fn register(&mut self, card: CardId, index: usize, events: &[EventKind]) {
        for kind in events {
            let listeners = self.by_event.entry(*kind).or_default();
            if !listeners.contains(&(card, index)) {
                listeners.push((card, index));
            }
        }
        self.count += 1;
    }

    /// Abilities listening for `kind`, as (card, ability index).
    #[must_use]
    pub fn listeners(&self, kind: EventKind) -> &[(CardId, usize)] {
        self.by_event.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Whether any ability of `card` listens for `kind`.
    #[must_use]
    pub fn card_listens(&self, card: CardId, kind: EventKind) -> bool {
        self.listeners(kind).iter().any(|(c, _)| *c == card)
    }

    /// Number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardType, TriggeredAbility};
    use crate::core::{ObjectId, PlayerId};
    use crate::effects::Effect;
    use crate::zones::Zone;

    fn watcher(id: CardId) -> CardDefinition {
        CardDefinition::new(id, "Watcher")
            .with_type(CardType::Creature)
            .with_pt(1, 1)
            .with_triggered(
                TriggeredAbility::new("on damage", EventKind::DamageDealt)
                    .also_on(EventKind::LifeLost)
                    .with_effect(Effect::gain_life(1)),
            )
    }

    #[test]
    fn test_from_cards_indexes_by_event() {
        let mut cards = CardRegistry::new();
        let id = cards.register_with(watcher);
        let registry = TriggerRegistry::from_cards(&cards);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.listeners(EventKind::DamageDealt), &[(id, 0)]);
        assert_eq!(registry.listeners(EventKind::LifeLost), &[(id, 0)]);
        assert!(registry.listeners(EventKind::ZoneChange).is_empty());
        assert!(registry.card_listens(id, EventKind::LifeLost));
    }

    #[test]
    fn test_trigger_target_from_event() {
        let event = GameEvent::ZoneChange {
            object: ObjectId(3),
            new_object: ObjectId(11),
            card: CardId(0),
            owner: PlayerId(1),
            from: Zone::Stack,
            to: Zone::Battlefield,
            last_known: None,
        };
        assert_eq!(
            TriggerTarget::EventObject.from_event(&event),
            Some(Target::Object(ObjectId(11)))
        );
        assert_eq!(
            TriggerTarget::EventPlayer.from_event(&event),
            Some(Target::Player(PlayerId(1)))
        );

        let step = GameEvent::LifeGained {
            player: PlayerId(0),
            amount: 2,
        };
        assert_eq!(TriggerTarget::EventObject.from_event(&step), None);
    }

    #[test]
    fn test_default_policy() {
        let policy = TriggerPolicy::default();
        assert_eq!(policy.within_player, WithinPlayerOrder::Timestamp);
        assert!(policy.look_back_on_leave);
        assert!(!policy.drop_if_source_left);
    }
}
