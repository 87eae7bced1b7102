//! Dependency-then-timestamp ordering within one slot.
//!
//! Effect B depends on effect A when applying A changes what B does: whether
//! B exists, which objects B affects, or the values B evaluates to. The
//! graph is rebuilt from scratch on every evaluation over the effects that
//! are active right now.
//!
//! Independent effects apply by timestamp, then by APNAP order of their
//! controllers, then by effect id. If the graph has a cycle the whole slot
//! falls back to that order.

use rustc_hash::FxHashSet;
use tracing::warn;

use super::effect::{ContinuousEffect, EffectId, Evaluation};
use super::engine::{apply_effect, LayerSnapshot};
use crate::core::{
    apnap_rank, GameState, InvariantViolation, ObjectId, Result, Timestamp, ViolationKind,
};

/// Everything about an effect that another effect could change.
#[derive(Debug, PartialEq, Eq)]
struct Footprint {
    exists: bool,
    affected: Vec<ObjectId>,
    evaluation: Evaluation,
}

fn footprint(effect: &ContinuousEffect, snapshot: &LayerSnapshot, state: &GameState) -> Footprint {
    let ctx = effect.selection_context();
    Footprint {
        exists: effect.exists_in(snapshot),
        affected: effect.selector.resolve(snapshot, state, &ctx),
        evaluation: effect.modification.evaluate(snapshot, state, &ctx),
    }
}

/// Whether `dependent` depends on `dependency` at this point of evaluation.
#[must_use]
pub fn depends_on(
    dependent: &ContinuousEffect,
    dependency: &ContinuousEffect,
    snapshot: &LayerSnapshot,
    state: &GameState,
) -> bool {
    let mut trial = snapshot.clone();
    apply_effect(dependency, &mut trial, state);
    footprint(dependent, snapshot, state) != footprint(dependent, &trial, state)
}

fn tie_key(effect: &ContinuousEffect, state: &GameState) -> (Timestamp, usize, EffectId) {
    let rank = apnap_rank(
        effect.controller,
        state.turn.active_player,
        state.config.player_count,
    );
    (effect.timestamp, rank, effect.id)
}

/// Order the effects of one slot for application.
///
/// Fails only if the topological pass cannot place every effect after the
/// graph was found acyclic, which means the graph is corrupt.
pub fn order_effects<'a>(
    effects: &[&'a ContinuousEffect],
    snapshot: &LayerSnapshot,
    state: &GameState,
) -> Result<Vec<&'a ContinuousEffect>> {
    let mut by_tie = effects.to_vec();
    by_tie.sort_by_key(|e| tie_key(e, state));
    if by_tie.len() <= 1 {
        return Ok(by_tie);
    }

    // deps[i] holds the effects i depends on; they must come first.
    let n = by_tie.len();
    let trials: Vec<LayerSnapshot> = by_tie
        .iter()
        .map(|e| {
            let mut trial = snapshot.clone();
            apply_effect(e, &mut trial, state);
            trial
        })
        .collect();
    let mut deps: Vec<FxHashSet<usize>> = vec![FxHashSet::default(); n];
    let mut any = false;
    for (b, effect) in by_tie.iter().enumerate() {
        let base = footprint(effect, snapshot, state);
        for (a, trial) in trials.iter().enumerate() {
            if a != b && footprint(effect, trial, state) != base {
                deps[b].insert(a);
                any = true;
            }
        }
    }

    if !any {
        return Ok(by_tie);
    }

    if has_cycle(&deps) {
        warn!(
            effects = ?by_tie.iter().map(|e| e.id).collect::<Vec<_>>(),
            "dependency loop, applying in timestamp order"
        );
        return Ok(by_tie);
    }

    // `by_tie` is already in tie order, so the first ready index is the
    // one to place next.
    let mut placed = vec![false; n];
    let mut result = Vec::with_capacity(n);
    while result.len() < n {
        let next = (0..n).find(|&i| !placed[i] && deps[i].iter().all(|&d| placed[d]));
        let Some(i) = next else {
            let stuck: Vec<usize> = (0..n).filter(|&i| !placed[i]).collect();
            return Err(InvariantViolation::new(ViolationKind::DependencyCycleExhausted)
                .with_effects(stuck.iter().map(|&i| by_tie[i].id))
                .with_objects(stuck.iter().filter_map(|&i| by_tie[i].source))
                .into());
        };
        placed[i] = true;
        result.push(by_tie[i]);
    }
    Ok(result)
}

/// Depth-first search with a visited set and an on-path set.
fn has_cycle(deps: &[FxHashSet<usize>]) -> bool {
    fn visit(
        node: usize,
        deps: &[FxHashSet<usize>],
        visited: &mut [bool],
        on_path: &mut [bool],
    ) -> bool {
        visited[node] = true;
        on_path[node] = true;
        for &next in &deps[node] {
            if on_path[next] {
                return true;
            }
            if !visited[next] && visit(next, deps, visited, on_path) {
                return true;
            }
        }
        on_path[node] = false;
        false
    }

    let n = deps.len();
    let mut visited = vec![false; n];
    let mut on_path = vec![false; n];
    (0..n).any(|i| !visited[i] && visit(i, deps, &mut visited, &mut on_path))
}
