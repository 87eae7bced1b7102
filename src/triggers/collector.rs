//! Matching triggered abilities and putting them on the stack.
//!
//! Every event is matched against the listening abilities the moment it is
//! emitted, against the game as it is right then. The matches wait in
//! `GameState::pending_triggers` while actions, resolutions and
//! state-based actions run. Before a player receives priority the
//! collector pushes them in APNAP order: the active player's triggers go on
//! the stack first and so resolve last.

use std::sync::Arc;

use tracing::{debug, info};

use super::condition::{ConditionContext, ConditionEvaluator};
use super::event::GameEvent;
use super::registry::WithinPlayerOrder;
use crate::cards::{CardId, TriggeredAbility};
use crate::core::{apnap_rank, GameState, ObjectId, PlayerId, Result, RulesError, Timestamp};
use crate::effects::Target;
use crate::layers::{compute_all, CharacteristicSet, LayerSnapshot, SelectionContext};
use crate::stack::{self, StackItem, StackItemKind};
use crate::zones::Zone;

/// A triggered ability waiting to be put on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTrigger {
    pub source: ObjectId,
    pub controller: PlayerId,
    pub card: CardId,
    pub index: usize,
    /// Position of the triggering event since the last collection.
    pub event_index: usize,
    pub timestamp: Timestamp,
    pub target: Option<Target>,
    /// Triggered from last-known information of an object that left.
    pub looked_back: bool,
}

impl PendingTrigger {
    fn within_player_key(&self) -> (usize, Timestamp, usize) {
        (self.event_index, self.timestamp, self.index)
    }
}

/// An object leaving the battlefield, as it last existed there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Departed {
    pub object: ObjectId,
    pub chars: CharacteristicSet,
    pub timestamp: Timestamp,
}

/// An object whose abilities may have triggered on one event.
struct Candidate<'a> {
    source: ObjectId,
    chars: &'a CharacteristicSet,
    timestamp: Timestamp,
    looked_back: bool,
}

/// Put every pending triggered ability on the stack.
///
/// Returns how many items were pushed. A trigger whose target became
/// illegal since it triggered is removed instead.
pub fn collect_triggers(state: &mut GameState) -> Result<usize> {
    state.events.clear();
    let mut pending = std::mem::take(&mut state.pending_triggers);
    if state.config.triggers.drop_if_source_left {
        pending.retain(|t| t.looked_back || state.zones.is_in(t.source, Zone::Battlefield));
    }
    if pending.is_empty() {
        return Ok(0);
    }
    order_pending(state, &mut pending);

    let cards = Arc::clone(&state.cards);
    let mut count = 0;
    for trigger in pending {
        let ability = &cards.definition(trigger.card)?.triggered[trigger.index];
        let mut item = StackItem::new(
            StackItemKind::Triggered {
                index: trigger.index,
            },
            trigger.source,
            trigger.controller,
        )
        .with_effects(ability.effects.clone());
        if let (Some(spec), Some(target)) = (ability.target, trigger.target) {
            item = item.with_targets(vec![spec.spec()], vec![target]);
        }
        match stack::push(state, item) {
            Ok(id) => {
                count += 1;
                debug!(item = %id, source = %trigger.source, ability = %ability.name, "trigger put on stack");
            }
            Err(RulesError::IllegalTarget { target, reason }) => {
                debug!(source = %trigger.source, ?target, reason, "trigger removed, target gone");
            }
            Err(err) => return Err(err),
        }
    }
    info!(count, "triggered abilities put on stack");
    Ok(count)
}

/// Every ability that triggers on `event`, checked against the game as it
/// is now.
///
/// `departed` lists the objects leaving the battlefield together with the
/// event's subject; leaves-the-battlefield abilities of all of them look
/// back when the policy allows.
pub fn match_event(
    state: &GameState,
    event: &GameEvent,
    event_index: usize,
    departed: &[Departed],
) -> Result<Vec<PendingTrigger>> {
    let listeners = state.triggers.listeners(event.kind());
    if listeners.is_empty() {
        return Ok(Vec::new());
    }
    let snapshot = compute_all(state)?;
    let looks_back = state.config.triggers.look_back_on_leave
        && matches!(
            event,
            GameEvent::ZoneChange {
                from: Zone::Battlefield,
                ..
            }
        );
    let leaving = |id: ObjectId| looks_back && departed.iter().any(|d| d.object == id);

    let mut candidates: Vec<Candidate> = state
        .zones
        .battlefield()
        .iter()
        .filter(|&&id| !leaving(id))
        .filter_map(|&id| {
            let object = state.object(id)?;
            let chars = snapshot.get(id)?;
            Some(Candidate {
                source: id,
                chars,
                timestamp: object.timestamp,
                looked_back: false,
            })
        })
        .collect();
    if looks_back {
        candidates.extend(departed.iter().map(|d| Candidate {
            source: d.object,
            chars: &d.chars,
            timestamp: d.timestamp,
            looked_back: true,
        }));
    }

    let mut pending = Vec::new();
    for candidate in &candidates {
        if !candidate.chars.abilities_intact {
            continue;
        }
        for &(card, index) in listeners {
            if card != candidate.chars.ability_source {
                continue;
            }
            let ability = &state.definition(card)?.triggered[index];
            if let Some(trigger) =
                check_ability(state, &snapshot, event, event_index, candidate, card, index, ability)
            {
                pending.push(trigger);
            }
        }
    }
    Ok(pending)
}

#[allow(clippy::too_many_arguments)]
fn check_ability(
    state: &GameState,
    snapshot: &LayerSnapshot,
    event: &GameEvent,
    event_index: usize,
    candidate: &Candidate,
    card: CardId,
    index: usize,
    ability: &TriggeredAbility,
) -> Option<PendingTrigger> {
    let controller = candidate.chars.controller;
    let ctx = ConditionContext {
        event,
        source: candidate.source,
        controller,
        state,
        snapshot,
    };
    if !ConditionEvaluator::evaluate(&ability.condition, &ctx) {
        return None;
    }

    let target = match ability.target {
        None => None,
        Some(kind) => {
            let selection = SelectionContext::new(Some(candidate.source), controller);
            match kind.from_event(event) {
                Some(target) if kind.spec().is_legal(target, state, snapshot, &selection) => {
                    Some(target)
                }
                _ => {
                    debug!(source = %candidate.source, ability = %ability.name, "trigger has no legal target");
                    return None;
                }
            }
        }
    };

    Some(PendingTrigger {
        source: candidate.source,
        controller,
        card,
        index,
        event_index,
        timestamp: candidate.timestamp,
        target,
        looked_back: candidate.looked_back,
    })
}

/// Sort into push order: APNAP across players, policy order within one.
fn order_pending(state: &GameState, pending: &mut [PendingTrigger]) {
    let active = state.turn.active_player;
    let players = state.player_count();
    let within = state.config.triggers.within_player;
    pending.sort_by(|a, b| {
        let rank = apnap_rank(a.controller, active, players)
            .cmp(&apnap_rank(b.controller, active, players));
        rank.then_with(|| {
            let order = a.within_player_key().cmp(&b.within_player_key());
            match within {
                WithinPlayerOrder::Timestamp => order,
                WithinPlayerOrder::ReverseTimestamp => order.reverse(),
            }
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry, CardType};
    use crate::core::GameConfig;
    use crate::effects::Effect;
    use crate::triggers::{EventKind, TriggerCondition, TriggerPolicy};

    fn gain_on_upkeep(id: CardId) -> CardDefinition {
        CardDefinition::new(id, "Upkeep Healer")
            .with_type(CardType::Creature)
            .with_pt(1, 1)
            .with_triggered(
                TriggeredAbility::new("upkeep gain", EventKind::StepBegan)
                    .with_condition(TriggerCondition::your_upkeep())
                    .with_effect(Effect::gain_life(1)),
            )
    }

    fn death_watcher(id: CardId) -> CardDefinition {
        CardDefinition::new(id, "Death Watcher")
            .with_type(CardType::Creature)
            .with_pt(1, 1)
            .with_triggered(
                TriggeredAbility::new("dies", EventKind::ZoneChange)
                    .with_condition(TriggerCondition::self_dies())
                    .with_effect(Effect::draw(1)),
            )
    }

    fn setup(config: GameConfig) -> (GameState, CardId, CardId) {
        let mut cards = CardRegistry::new();
        let healer = cards.register_with(gain_on_upkeep);
        let watcher = cards.register_with(death_watcher);
        (GameState::new(config, Arc::new(cards)), healer, watcher)
    }

    #[test]
    fn test_no_events_pushes_nothing() {
        let (mut state, _, _) = setup(GameConfig::two_player());
        assert_eq!(collect_triggers(&mut state).unwrap(), 0);
        assert!(state.stack.is_empty());
    }

    #[test]
    fn test_condition_filters_controller() {
        let (mut state, healer, _) = setup(GameConfig::two_player());
        state.create_object(healer, PlayerId(0), Zone::Battlefield).unwrap();
        state.create_object(healer, PlayerId(1), Zone::Battlefield).unwrap();
        state
            .emit(GameEvent::StepBegan {
                step: crate::turn::Step::Upkeep,
                active: PlayerId(0),
            })
            .unwrap();
        assert_eq!(state.pending_triggers.len(), 1);

        assert_eq!(collect_triggers(&mut state).unwrap(), 1);
        assert_eq!(state.stack.peek_top().unwrap().controller, PlayerId(0));
        assert!(state.events.is_empty());
        assert!(state.pending_triggers.is_empty());
    }

    #[test]
    fn test_late_arrival_does_not_trigger_on_earlier_event() {
        let (mut state, healer, _) = setup(GameConfig::two_player());
        state
            .emit(GameEvent::StepBegan {
                step: crate::turn::Step::Upkeep,
                active: PlayerId(0),
            })
            .unwrap();
        state.create_object(healer, PlayerId(0), Zone::Battlefield).unwrap();

        assert_eq!(collect_triggers(&mut state).unwrap(), 0);
        assert!(state.stack.is_empty());
    }

    #[test]
    fn test_dies_trigger_looks_back() {
        let (mut state, _, watcher) = setup(GameConfig::two_player());
        let creature = state.create_object(watcher, PlayerId(1), Zone::Battlefield).unwrap();
        state.put_into_graveyard(creature).unwrap();

        assert_eq!(collect_triggers(&mut state).unwrap(), 1);
        let item = state.stack.peek_top().unwrap();
        assert_eq!(item.source, creature);
        assert_eq!(item.controller, PlayerId(1));
    }

    #[test]
    fn test_dies_trigger_without_look_back() {
        let config = GameConfig::two_player().with_trigger_policy(TriggerPolicy {
            look_back_on_leave: false,
            ..TriggerPolicy::default()
        });
        let (mut state, _, watcher) = setup(config);
        let creature = state.create_object(watcher, PlayerId(1), Zone::Battlefield).unwrap();
        state.put_into_graveyard(creature).unwrap();

        assert_eq!(collect_triggers(&mut state).unwrap(), 0);
    }

    #[test]
    fn test_within_player_order() {
        let (mut state, healer, _) = setup(GameConfig::two_player());
        let first = state.create_object(healer, PlayerId(0), Zone::Battlefield).unwrap();
        let second = state.create_object(healer, PlayerId(0), Zone::Battlefield).unwrap();
        let upkeep = GameEvent::StepBegan {
            step: crate::turn::Step::Upkeep,
            active: PlayerId(0),
        };

        state.emit(upkeep.clone()).unwrap();
        collect_triggers(&mut state).unwrap();
        state.config.triggers.within_player = WithinPlayerOrder::ReverseTimestamp;
        state.emit(upkeep).unwrap();
        collect_triggers(&mut state).unwrap();

        let sources: Vec<_> = state.stack.iter().map(|item| item.source).collect();
        assert_eq!(sources, vec![first, second, second, first]);
    }
}
