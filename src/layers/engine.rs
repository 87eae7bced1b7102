//! Staged characteristic evaluation.
//!
//! All objects are computed together, slot by slot. The running
//! `LayerSnapshot` is the accumulator: each slot reads the values left by
//! the slots before it, so selectors and amounts in later layers see type,
//! control and ability changes without calling back into
//! [`characteristics_of`].
//!
//! There is no cache. Every query recomputes from the game state, which
//! keeps results a pure function of that state.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::characteristics::CharacteristicSet;
use super::dependency::order_effects;
use super::effect::{ContinuousEffect, LayerSlot, PtSublayer};
use crate::core::{GameState, ObjectId, Result, StateQueryError};

/// Characteristics of every object at some point of evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerSnapshot {
    chars: FxHashMap<ObjectId, CharacteristicSet>,
}

impl LayerSnapshot {
    /// Printed characteristics of every object in a zone.
    pub fn base(state: &GameState) -> Result<Self> {
        let mut chars = FxHashMap::default();
        for object in state.objects.values() {
            let definition = state.cards.definition(object.card)?;
            chars.insert(
                object.id,
                CharacteristicSet::printed(definition, object.controller),
            );
        }
        Ok(Self { chars })
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&CharacteristicSet> {
        self.chars.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CharacteristicSet> {
        self.chars.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &CharacteristicSet)> {
        self.chars.iter().map(|(id, c)| (*id, c))
    }

    #[must_use]
    pub fn into_inner(self) -> FxHashMap<ObjectId, CharacteristicSet> {
        self.chars
    }

    /// +1/+1 and -1/-1 counters on permanents.
    fn apply_counters(&mut self, state: &GameState) {
        for &id in state.zones.battlefield() {
            let Some(object) = state.object(id) else {
                continue;
            };
            let delta = object.counter_pt_delta();
            if delta == 0 {
                continue;
            }
            if let Some(chars) = self.chars.get_mut(&id) {
                if let Some(p) = chars.power.as_mut() {
                    *p = p.saturating_add(delta);
                }
                if let Some(t) = chars.toughness.as_mut() {
                    *t = t.saturating_add(delta);
                }
            }
        }
    }
}

/// Apply one effect to the snapshot, selecting against its current values.
pub fn apply_effect(effect: &ContinuousEffect, snapshot: &mut LayerSnapshot, state: &GameState) {
    if !effect.exists_in(snapshot) {
        trace!(effect = %effect.id, "skipped, source no longer has the ability");
        return;
    }
    let ctx = effect.selection_context();
    let affected = effect.selector.resolve(snapshot, state, &ctx);
    let evaluation = effect.modification.evaluate(snapshot, state, &ctx);
    for id in affected {
        if let Some(chars) = snapshot.get_mut(id) {
            effect.modification.apply(chars, &evaluation);
        }
    }
}

/// Apply effects in exactly the given order.
pub fn apply_in_order(
    effects: &[&ContinuousEffect],
    snapshot: &mut LayerSnapshot,
    state: &GameState,
) {
    for effect in effects {
        apply_effect(effect, snapshot, state);
    }
}

/// Compute characteristics of every object.
pub fn compute_all(state: &GameState) -> Result<LayerSnapshot> {
    let mut snapshot = LayerSnapshot::base(state)?;
    let active: Vec<&ContinuousEffect> = state
        .effects
        .iter()
        .filter(|e| e.is_current(state))
        .collect();

    for slot in state.config.pt_order.slots() {
        if slot == LayerSlot::Pt(PtSublayer::Modify) {
            snapshot.apply_counters(state);
        }

        let (cdas, others): (Vec<&ContinuousEffect>, Vec<&ContinuousEffect>) = active
            .iter()
            .copied()
            .filter(|e| e.slot() == slot)
            .partition(|e| e.is_cda);

        for group in [cdas, others] {
            if group.is_empty() {
                continue;
            }
            let ordered = order_effects(&group, &snapshot, state)?;
            trace!(?slot, effects = ?ordered.iter().map(|e| e.id).collect::<Vec<_>>(), "applying slot");
            apply_in_order(&ordered, &mut snapshot, state);
        }
    }

    debug!(objects = snapshot.len(), effects = active.len(), "characteristics computed");
    Ok(snapshot)
}

/// Current characteristics of one object.
///
/// Fails with `StateQueryError::ObjectNotFound` if no zone holds `id`.
///
/// ```
/// use std::sync::Arc;
/// use mtg_kernel::cards::{catalog, CardRegistry};
/// use mtg_kernel::core::{GameConfig, GameState, PlayerId};
/// use mtg_kernel::layers::characteristics_of;
/// use mtg_kernel::zones::Zone;
///
/// let mut cards = CardRegistry::new();
/// let bears = cards.register_with(catalog::grizzly_bears);
/// let mut state = GameState::new(GameConfig::two_player(), Arc::new(cards));
/// let id = state.create_object(bears, PlayerId(0), Zone::Battlefield).unwrap();
///
/// let chars = characteristics_of(&state, id).unwrap();
/// assert_eq!((chars.power, chars.toughness), (Some(2), Some(2)));
/// ```
pub fn characteristics_of(state: &GameState, id: ObjectId) -> Result<CharacteristicSet> {
    if !state.zones.contains(id) {
        return Err(StateQueryError::ObjectNotFound(id).into());
    }
    let mut all = compute_all(state)?.into_inner();
    all.remove(&id)
        .ok_or_else(|| StateQueryError::ObjectNotFound(id).into())
}
