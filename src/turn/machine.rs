//! The turn and priority state machine.
//!
//! Steps advance only when the stack is empty and every player still in
//! the game has passed in succession. An all-pass with something on the
//! stack resolves exactly one item and reopens priority with the active
//! player. Before anyone receives priority the game is settled:
//! state-based actions run to a fixed point and pending triggers go on the
//! stack.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::phase::Step;
use super::priority::PriorityPolicy;
use crate::cards::{CardType, Keyword};
use crate::core::{GameState, IllegalAction, ObjectId, PlayerId, Result};
use crate::layers::compute_all;
use crate::sba::run_sbas_to_fixed_point;
use crate::stack::{resolve_top, ResolutionRecord};
use crate::triggers::{collect_triggers, GameEvent};
use crate::zones::{Zone, ZonePosition};

/// What a priority pass led to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassOutcome {
    /// The next player now holds priority.
    PriorityPassed { to: PlayerId },
    /// Everyone passed and the top of the stack resolved.
    Resolved(ResolutionRecord),
    /// Everyone passed on an empty stack; the game moved on within the turn.
    StepAdvanced { from: Step, to: Step },
    /// Everyone passed on an empty stack and a new turn began.
    TurnAdvanced { turn: u32, active: PlayerId },
    /// The match ended.
    GameOver,
}

/// Whether settling did anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settled {
    pub sba_rounds: usize,
    pub triggers: usize,
}

impl Settled {
    #[must_use]
    pub fn anything_happened(&self) -> bool {
        self.sba_rounds > 0 || self.triggers > 0
    }
}

/// Run state-based actions to a fixed point, then put pending triggers on
/// the stack.
pub fn settle(state: &mut GameState) -> Result<Settled> {
    let mut settled = Settled::default();
    loop {
        settled.sba_rounds += run_sbas_to_fixed_point(state)?;
        if state.is_game_over() {
            state.clear_events();
            return Ok(settled);
        }
        let pushed = collect_triggers(state)?;
        settled.triggers += pushed;
        if state.pending_triggers.is_empty() {
            return Ok(settled);
        }
    }
}

/// Shuffle libraries, draw opening hands and run the first turn up to the
/// first step with priority.
pub fn start_game(state: &mut GameState) -> Result<()> {
    let players: Vec<PlayerId> = PlayerId::all(state.player_count()).collect();
    for &player in &players {
        state.shuffle_library(player);
    }
    for &player in &players {
        for _ in 0..state.config.starting_hand_size {
            state.draw_card(player)?;
        }
    }
    // Opening hands are not draws for the purpose of abilities.
    state.clear_events();
    info!(players = players.len(), active = %state.turn.active_player, "game started");
    run_from(state, Step::Untap)
}

/// Leave the current step and run forward to the next point where a
/// player receives priority.
pub fn advance_step(state: &mut GameState) -> Result<()> {
    // Priority in cleanup means another cleanup step follows.
    let next = if state.turn.step == Step::Cleanup {
        Step::Cleanup
    } else {
        match state.turn.step.next_played() {
            Some(step) => step,
            None => {
                begin_next_turn(state);
                Step::Untap
            }
        }
    };
    run_from(state, next)
}

fn run_from(state: &mut GameState, first: Step) -> Result<()> {
    let mut step = first;
    loop {
        state.turn.enter(step);
        let happened = enter_step(state)?;
        if state.is_game_over() {
            state.turn.priority = None;
            return Ok(());
        }
        let grants = match step {
            Step::Cleanup => happened.anything_happened(),
            other => other.grants_priority(),
        };
        if grants {
            let active = state.turn.active_player;
            state.turn.open_round(active);
            debug!(step = %step, player = %active, "priority granted");
            return Ok(());
        }
        step = match step.next_played() {
            Some(next) => next,
            None => {
                begin_next_turn(state);
                Step::Untap
            }
        };
    }
}

fn begin_next_turn(state: &mut GameState) {
    let next = state.next_living_player(state.turn.active_player);
    state.turn.turn_number += 1;
    state.turn.active_player = next;
    for (_, player) in state.players.iter_mut() {
        player.lands_played_this_turn = 0;
    }
    info!(turn = state.turn.turn_number, active = %next, "turn began");
}

/// Turn-based actions for the step just entered, then settle.
fn enter_step(state: &mut GameState) -> Result<Settled> {
    let step = state.turn.step;
    let active = state.turn.active_player;
    for (_, player) in state.players.iter_mut() {
        player.mana_pool.empty();
    }
    state.emit(GameEvent::StepBegan { step, active })?;

    match step {
        Step::Untap => untap_permanents(state, active)?,
        Step::Draw => {
            let first_turn = state.turn.turn_number == 1;
            if !(first_turn && state.config.skip_first_draw) {
                state.draw_card(active)?;
            }
        }
        Step::Cleanup => cleanup(state, active)?,
        _ => {}
    }
    settle(state)
}

fn untap_permanents(state: &mut GameState, active: PlayerId) -> Result<()> {
    let snapshot = compute_all(state)?;
    let controlled: Vec<_> = state
        .zones
        .battlefield()
        .iter()
        .copied()
        .filter(|id| snapshot.get(*id).is_some_and(|c| c.controller == active))
        .collect();
    for id in controlled {
        if let Some(object) = state.object_mut(id) {
            object.tapped = false;
        }
    }
    Ok(())
}

fn cleanup(state: &mut GameState, active: PlayerId) -> Result<()> {
    let hand = Zone::Hand(active);
    let excess = state.zones.len(hand).saturating_sub(state.config.max_hand_size);
    if excess > 0 {
        let discards: Vec<_> = state
            .zones
            .objects_in(hand)
            .iter()
            .rev()
            .take(excess)
            .copied()
            .collect();
        for id in discards {
            state.move_object(id, Zone::Graveyard(active), ZonePosition::Top)?;
        }
        debug!(player = %active, count = excess, "discarded to hand size");
    }

    let permanents: Vec<_> = state.zones.battlefield().to_vec();
    for id in permanents {
        if let Some(object) = state.object_mut(id) {
            object.clear_damage();
        }
    }
    let ended = state.effects.expire_end_of_turn();
    if !ended.is_empty() {
        debug!(effects = ?ended, "end of turn effects ended");
    }
    Ok(())
}

/// `player` passes priority.
pub fn pass_priority(state: &mut GameState, player: PlayerId) -> Result<PassOutcome> {
    if state.is_game_over() {
        return Err(IllegalAction::GameOver.into());
    }
    if !state.turn.holds_priority(player) {
        return Err(IllegalAction::NotPriorityHolder {
            player,
            holder: state.turn.priority,
        }
        .into());
    }

    state.turn.passes += 1;
    if state.turn.passes < state.living_players().len() {
        let to = state.next_living_player(player);
        state.turn.priority = Some(to);
        debug!(from = %player, to = %to, "priority passed");
        return Ok(PassOutcome::PriorityPassed { to });
    }

    if !state.stack.is_empty() {
        let record = resolve_top(state)?;
        settle(state)?;
        if state.is_game_over() {
            state.turn.priority = None;
            return Ok(PassOutcome::GameOver);
        }
        let active = state.turn.active_player;
        state.turn.open_round(active);
        return Ok(PassOutcome::Resolved(record));
    }

    let (from, turn) = (state.turn.step, state.turn.turn_number);
    advance_step(state)?;
    if state.is_game_over() {
        return Ok(PassOutcome::GameOver);
    }
    if state.turn.turn_number != turn {
        Ok(PassOutcome::TurnAdvanced {
            turn: state.turn.turn_number,
            active: state.turn.active_player,
        })
    } else {
        Ok(PassOutcome::StepAdvanced {
            from,
            to: state.turn.step,
        })
    }
}

/// Settle after a player acted and hand priority to whoever gets it next.
///
/// Stack-using actions follow the configured priority policy. Special
/// actions and mana abilities leave priority with the actor.
pub fn after_action(state: &mut GameState, actor: PlayerId, used_stack: bool) -> Result<()> {
    settle(state)?;
    if state.is_game_over() {
        state.turn.priority = None;
        return Ok(());
    }
    let next = if used_stack {
        match state.config.priority_after_action {
            PriorityPolicy::PassToNext => state.next_living_player(actor),
            PriorityPolicy::RetainWithActor => actor,
        }
    } else {
        actor
    };
    state.turn.open_round(next);
    Ok(())
}

/// Whether `object` may attack or use {T} abilities this turn.
pub fn can_tap_for_ability(state: &GameState, object: ObjectId) -> Result<bool> {
    let chars = state.characteristics_of(object)?;
    let obj = state.try_object(object)?;
    if !chars.has_type(CardType::Creature) || chars.has_keyword(Keyword::Haste) {
        return Ok(true);
    }
    Ok(!obj.is_summoning_sick(state.turn.turn_number))
}
