//! Checking and applying state-based actions.
//!
//! One check looks at a single snapshot of the game and reports every
//! action that applies. Applying performs them together: losses are
//! recorded, counters annihilate, and every object that has to go is moved
//! to its graveyard in one batch. The priority loop repeats this until a
//! check comes back empty.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use tracing::{debug, error, info};

use super::actions::{DeathReason, LegendRulePolicy, LoseReason, StateBasedAction};
use crate::cards::{CardType, CounterType, Keyword};
use crate::core::{GameState, InvariantViolation, ObjectId, PlayerId, Result, Timestamp, ViolationKind};
use crate::layers::compute_all;
use crate::rules::GameResult;
use crate::zones::Zone;

/// Poison counters at which a player loses.
pub const POISON_LIMIT: u32 = 10;

/// Every state-based action that applies right now.
pub fn check_state_based_actions(state: &GameState) -> Result<Vec<StateBasedAction>> {
    let mut actions = Vec::new();
    check_players(state, &mut actions);

    let snapshot = compute_all(state)?;
    let mut legends: BTreeMap<(PlayerId, String), Vec<(Timestamp, ObjectId)>> = BTreeMap::new();

    for &id in state.zones.battlefield() {
        let (Some(object), Some(chars)) = (state.object(id), snapshot.get(id)) else {
            continue;
        };

        if chars.is_creature() {
            let toughness = chars.toughness.unwrap_or(0);
            let indestructible = chars.has_keyword(Keyword::Indestructible);
            let reason = if toughness <= 0 {
                Some(DeathReason::ZeroToughness)
            } else if indestructible {
                None
            } else if object.damage >= toughness.unsigned_abs() {
                Some(DeathReason::LethalDamage)
            } else if object.damage > 0 && object.damaged_by_deathtouch {
                Some(DeathReason::Deathtouch)
            } else {
                None
            };
            if let Some(reason) = reason {
                actions.push(StateBasedAction::CreatureDies { object: id, reason });
            }
        }

        if chars.has_type(CardType::Planeswalker) && object.counter_count(CounterType::Loyalty) == 0 {
            actions.push(StateBasedAction::PlaneswalkerOutOfLoyalty { object: id });
        }

        let plus = object.counter_count(CounterType::PlusOnePlusOne);
        let minus = object.counter_count(CounterType::MinusOneMinusOne);
        if plus > 0 && minus > 0 {
            actions.push(StateBasedAction::CountersAnnihilate {
                object: id,
                amount: plus.min(minus),
            });
        }

        if chars.is_legendary() {
            legends
                .entry((chars.controller, chars.name.clone()))
                .or_default()
                .push((object.timestamp, id));
        }
    }

    check_legend_rule(state.config.legend_rule, legends, &mut actions);
    check_tokens(state, &mut actions);
    Ok(actions)
}

fn check_tokens(state: &GameState, actions: &mut Vec<StateBasedAction>) {
    let mut departed: Vec<ObjectId> = state
        .objects
        .values()
        .filter(|object| object.is_token && object.zone != Zone::Battlefield)
        .map(|object| object.id)
        .collect();
    departed.sort_unstable();
    actions.extend(
        departed
            .into_iter()
            .map(|object| StateBasedAction::TokenCeasesToExist { object }),
    );
}

fn check_players(state: &GameState, actions: &mut Vec<StateBasedAction>) {
    for player in state.living_players() {
        let ps = &state.players[player];
        let reason = if ps.life <= 0 {
            Some(LoseReason::ZeroLife)
        } else if ps.poison >= POISON_LIMIT {
            Some(LoseReason::Poison)
        } else if ps.drew_from_empty_library {
            Some(LoseReason::DrewFromEmptyLibrary)
        } else {
            None
        };
        if let Some(reason) = reason {
            actions.push(StateBasedAction::PlayerLoses { player, reason });
        }
    }
}

fn check_legend_rule(
    policy: LegendRulePolicy,
    legends: BTreeMap<(PlayerId, String), Vec<(Timestamp, ObjectId)>>,
    actions: &mut Vec<StateBasedAction>,
) {
    for (_, mut permanents) in legends {
        if permanents.len() < 2 {
            continue;
        }
        permanents.sort();
        let kept_at = match policy {
            LegendRulePolicy::KeepNewest => permanents.len() - 1,
            LegendRulePolicy::KeepOldest => 0,
        };
        let kept = permanents[kept_at].1;
        let removed = permanents
            .iter()
            .map(|(_, id)| *id)
            .filter(|id| *id != kept)
            .collect();
        actions.push(StateBasedAction::LegendRule { kept, removed });
    }
}

/// Perform one round of state-based actions. Returns whether anything
/// applied.
pub fn apply_sbas(state: &mut GameState) -> Result<bool> {
    let actions = check_state_based_actions(state)?;
    if actions.is_empty() {
        return Ok(false);
    }

    let mut seen = FxHashSet::default();
    let mut moves: Vec<(ObjectId, Zone)> = Vec::new();
    let mut vanished = Vec::new();
    let mut someone_lost = false;

    for action in &actions {
        debug!(?action, "state-based action");
        match action {
            StateBasedAction::PlayerLoses { player, reason } => {
                let ps = &mut state.players[*player];
                ps.has_lost = true;
                ps.loss_reason = Some(*reason);
                ps.drew_from_empty_library = false;
                someone_lost = true;
                info!(player = %player, ?reason, "player loses");
            }
            StateBasedAction::CountersAnnihilate { object, amount } => {
                if let Some(obj) = state.object_mut(*object) {
                    obj.remove_counters(CounterType::PlusOnePlusOne, *amount);
                    obj.remove_counters(CounterType::MinusOneMinusOne, *amount);
                }
            }
            StateBasedAction::TokenCeasesToExist { object } => vanished.push(*object),
            _ => {}
        }
        for &id in action.graveyard_moves() {
            if seen.insert(id) {
                if let Some(object) = state.object(id) {
                    moves.push((id, Zone::Graveyard(object.owner)));
                }
            }
        }
    }

    if !moves.is_empty() {
        state.move_simultaneously(&moves)?;
    }
    for id in vanished {
        state.cease_to_exist(id)?;
    }
    if someone_lost {
        settle_result(state);
    }
    Ok(true)
}

/// Record the match result once at most one player remains.
fn settle_result(state: &mut GameState) {
    if state.result.is_some() {
        return;
    }
    let living = state.living_players();
    let result = match living.as_slice() {
        [] => GameResult::Draw,
        [winner] => GameResult::Winner(*winner),
        _ => return,
    };
    info!(?result, "game over");
    state.result = Some(result);
}

/// Apply state-based actions until none apply.
///
/// Expired continuous effects are removed before every round. Returns the number of rounds that did something. Fails with
/// `SbaNonConvergence` when actions still apply after the configured cap.
pub fn run_sbas_to_fixed_point(state: &mut GameState) -> Result<usize> {
    let cap = state.config.sba_iteration_cap;
    for round in 0..cap {
        state.prune_effects();
        if !apply_sbas(state)? {
            return Ok(round);
        }
    }

    let remaining = check_state_based_actions(state)?;
    if remaining.is_empty() {
        return Ok(cap);
    }
    let violation = InvariantViolation::new(ViolationKind::SbaNonConvergence { iterations: cap })
        .with_objects(remaining.iter().flat_map(StateBasedAction::objects))
        .with_effects(state.effects.iter().map(|e| e.id));
    error!(%violation, "state-based actions did not converge");
    Err(violation.into())
}
