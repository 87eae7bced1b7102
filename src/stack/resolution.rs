//! Pushing, resolving and countering stack items.
//!
//! Targets are checked twice: when the item is pushed, against the
//! characteristics of that moment, and again when it resolves. An item
//! whose targets are all illegal at resolution fizzles. If only some are
//! illegal, its effects run with those targets skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::item::{StackItem, StackItemId, StackItemKind};
use crate::core::{
    GameState, IllegalAction, InvariantViolation, ObjectId, PlayerId, Result, RulesError,
    ViolationKind,
};
use crate::effects::{EffectContext, EffectResolver, Target, TargetSpec};
use crate::layers::{compute_all, SelectionContext};
use crate::zones::Zone;

/// How a stack item left the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// All targets legal; every effect applied.
    Resolved,
    /// Some targets became illegal; effects applied to the rest.
    PartiallyResolved { illegal: Vec<Target> },
    /// Every target became illegal; nothing happened.
    Fizzled,
    /// Removed by a counter effect before resolving.
    Countered,
}

/// Log entry for one item leaving the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub item: StackItemId,
    pub kind: StackItemKind,
    pub source: ObjectId,
    pub controller: PlayerId,
    pub outcome: ResolutionOutcome,
    pub turn: u32,
}

impl ResolutionRecord {
    fn new(item: &StackItem, outcome: ResolutionOutcome, turn: u32) -> Self {
        Self {
            item: item.id,
            kind: item.kind,
            source: item.source,
            controller: item.controller,
            outcome,
            turn,
        }
    }
}

/// Check chosen targets against their specs using current characteristics.
pub fn validate_targets(
    state: &GameState,
    specs: &[TargetSpec],
    targets: &[Target],
    source: Option<ObjectId>,
    controller: PlayerId,
) -> Result<()> {
    if specs.len() != targets.len() {
        return Err(IllegalAction::WrongTargetCount {
            expected: specs.len(),
            got: targets.len(),
        }
        .into());
    }
    if specs.is_empty() {
        return Ok(());
    }
    let snapshot = compute_all(state)?;
    let ctx = SelectionContext::new(source, controller);
    for (spec, target) in specs.iter().zip(targets) {
        spec.check(*target, state, &snapshot, &ctx)
            .map_err(|reason| RulesError::IllegalTarget {
                target: *target,
                reason,
            })?;
    }
    Ok(())
}

/// Validate an item's targets and put it on top of the stack.
pub fn push(state: &mut GameState, item: StackItem) -> Result<StackItemId> {
    validate_targets(
        state,
        &item.target_specs,
        &item.targets,
        Some(item.source),
        item.controller,
    )?;
    let kind = item.kind;
    let id = state.stack.push(item);
    debug!(item = %id, ?kind, depth = state.stack.len(), "pushed onto stack");
    Ok(id)
}

/// Resolve the top item of the stack.
///
/// The item is removed whatever the outcome. A resolving permanent spell
/// enters the battlefield under its controller; other spells go to their
/// owner's graveyard, as does a spell that fizzles.
pub fn resolve_top(state: &mut GameState) -> Result<ResolutionRecord> {
    let Some(top) = state.stack.peek_top() else {
        return Err(IllegalAction::WrongTiming("nothing on the stack to resolve").into());
    };
    if top.is_spell() && !state.zones.is_in(top.source, Zone::Stack) {
        return Err(InvariantViolation::new(ViolationKind::StackDesync { item: top.id })
            .with_objects([top.source])
            .into());
    }

    let checked: Vec<Option<Target>> = if top.target_specs.is_empty() {
        Vec::new()
    } else {
        let snapshot = compute_all(state)?;
        let ctx = SelectionContext::new(Some(top.source), top.controller);
        top.target_specs
            .iter()
            .zip(&top.targets)
            .map(|(spec, target)| spec.is_legal(*target, state, &snapshot, &ctx).then_some(*target))
            .collect()
    };

    let Some(item) = state.stack.pop() else {
        return Err(IllegalAction::WrongTiming("nothing on the stack to resolve").into());
    };
    let illegal: Vec<Target> = item
        .targets
        .iter()
        .zip(&checked)
        .filter(|(_, legal)| legal.is_none())
        .map(|(t, _)| *t)
        .collect();
    let outcome = if !item.targets.is_empty() && illegal.len() == item.targets.len() {
        ResolutionOutcome::Fizzled
    } else if !illegal.is_empty() {
        ResolutionOutcome::PartiallyResolved { illegal }
    } else {
        ResolutionOutcome::Resolved
    };

    if outcome != ResolutionOutcome::Fizzled {
        let ctx = EffectContext::new(Some(item.source), item.controller).with_targets(checked);
        EffectResolver::apply_all(state, &item.effects, &ctx)?;
    }

    if let StackItemKind::Spell { card } = item.kind {
        if state.zones.is_in(item.source, Zone::Stack) {
            let permanent = state.definition(card)?.is_permanent_card();
            if permanent && outcome != ResolutionOutcome::Fizzled {
                state.put_onto_battlefield(item.source, item.controller)?;
            } else {
                state.put_into_graveyard(item.source)?;
            }
        }
    }

    let record = ResolutionRecord::new(&item, outcome, state.turn.turn_number);
    info!(item = %record.item, source = %record.source, outcome = ?record.outcome, "stack item left the stack");
    state.resolution_log.push_back(record.clone());
    Ok(record)
}

/// Counter a spell or ability on the stack.
pub fn counter_item(state: &mut GameState, id: StackItemId) -> Result<ResolutionRecord> {
    let Some(item) = state.stack.remove(id) else {
        return Err(InvariantViolation::new(ViolationKind::StackDesync { item: id }).into());
    };
    if item.is_spell() && state.zones.is_in(item.source, Zone::Stack) {
        state.put_into_graveyard(item.source)?;
    }
    let record = ResolutionRecord::new(&item, ResolutionOutcome::Countered, state.turn.turn_number);
    info!(item = %id, source = %item.source, "countered");
    state.resolution_log.push_back(record.clone());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{catalog, CardId, CardRegistry};
    use crate::core::GameConfig;
    use crate::effects::Effect;

    fn state() -> (GameState, CardId) {
        let mut cards = CardRegistry::new();
        let bears = cards.register_with(catalog::grizzly_bears);
        (GameState::new(GameConfig::two_player(), Arc::new(cards)), bears)
    }

    fn bolt_at(source: ObjectId, target: Target) -> StackItem {
        StackItem::new(StackItemKind::Activated { index: 0 }, source, PlayerId(0))
            .with_targets(vec![TargetSpec::any_target()], vec![target])
            .with_effects(vec![Effect::damage_target(2)])
    }

    #[test]
    fn test_push_rejects_illegal_target() {
        let (mut state, bears) = state();
        let hand_bear = state.create_object(bears, PlayerId(1), Zone::Hand(PlayerId(1))).unwrap();
        let source = state.create_object(bears, PlayerId(0), Zone::Battlefield).unwrap();

        let err = push(&mut state, bolt_at(source, Target::Object(hand_bear))).unwrap_err();
        assert!(matches!(err, RulesError::IllegalTarget { .. }));
        assert!(state.stack.is_empty());
    }

    #[test]
    fn test_push_rejects_wrong_target_count() {
        let (mut state, bears) = state();
        let source = state.create_object(bears, PlayerId(0), Zone::Battlefield).unwrap();
        let item = bolt_at(source, Target::Player(PlayerId(1)))
            .with_targets(vec![], vec![Target::Player(PlayerId(1))]);

        assert!(matches!(
            push(&mut state, item),
            Err(RulesError::IllegalAction(IllegalAction::WrongTargetCount { expected: 0, got: 1 }))
        ));
    }

    #[test]
    fn test_resolve_applies_effects() {
        let (mut state, bears) = state();
        let source = state.create_object(bears, PlayerId(0), Zone::Battlefield).unwrap();
        push(&mut state, bolt_at(source, Target::Player(PlayerId(1)))).unwrap();

        let record = resolve_top(&mut state).unwrap();
        assert_eq!(record.outcome, ResolutionOutcome::Resolved);
        assert_eq!(state.players[PlayerId(1)].life, 18);
        assert!(state.stack.is_empty());
        assert_eq!(state.resolution_log.len(), 1);
    }

    #[test]
    fn test_fizzle_when_target_gone() {
        let (mut state, bears) = state();
        let source = state.create_object(bears, PlayerId(0), Zone::Battlefield).unwrap();
        let victim = state.create_object(bears, PlayerId(1), Zone::Battlefield).unwrap();
        push(&mut state, bolt_at(source, Target::Object(victim))).unwrap();
        state.put_into_graveyard(victim).unwrap();
        state.events.clear();

        let record = resolve_top(&mut state).unwrap();
        assert_eq!(record.outcome, ResolutionOutcome::Fizzled);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_resolve_empty_stack_is_illegal() {
        let (mut state, _) = state();
        assert!(matches!(
            resolve_top(&mut state),
            Err(RulesError::IllegalAction(IllegalAction::WrongTiming(_)))
        ));
    }

    #[test]
    fn test_spell_without_stack_object_is_desync() {
        let (mut state, bears) = state();
        let card = state.create_object(bears, PlayerId(0), Zone::Hand(PlayerId(0))).unwrap();
        state.stack.push(StackItem::new(
            StackItemKind::Spell { card: bears },
            card,
            PlayerId(0),
        ));

        match resolve_top(&mut state) {
            Err(RulesError::RulesInvariantViolation(v)) => {
                assert!(matches!(v.kind, ViolationKind::StackDesync { .. }));
                assert_eq!(v.objects, vec![card]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_counter_sends_spell_to_graveyard() {
        let (mut state, bears) = state();
        let spell = state.create_object(bears, PlayerId(0), Zone::Stack).unwrap();
        let id = state
            .stack
            .push(StackItem::new(StackItemKind::Spell { card: bears }, spell, PlayerId(0)));

        let record = counter_item(&mut state, id).unwrap();
        assert_eq!(record.outcome, ResolutionOutcome::Countered);
        assert!(state.stack.is_empty());
        assert_eq!(state.zones.len(Zone::Graveyard(PlayerId(0))), 1);
    }
}
