//! Turn and priority state.

use serde::{Deserialize, Serialize};

use super::phase::{Phase, Step};
use crate::core::PlayerId;

/// Who receives priority after a player casts a spell or activates an
/// ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityPolicy {
    /// The next player in turn order.
    #[default]
    PassToNext,
    /// The player who acted.
    RetainWithActor,
}

/// Where the game is in the turn and who may act.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub turn_number: u32,
    pub active_player: PlayerId,
    pub step: Step,
    /// `None` while turn-based actions run and in steps without priority.
    pub priority: Option<PlayerId>,
    /// Consecutive passes since the last action or resolution.
    pub passes: usize,
}

impl TurnState {
    /// Turn 1, untap step, nobody holding priority.
    #[must_use]
    pub fn new(active_player: PlayerId) -> Self {
        Self {
            turn_number: 1,
            active_player,
            step: Step::Untap,
            priority: None,
            passes: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.step.phase()
    }

    /// Enter `step` with no priority holder.
    pub fn enter(&mut self, step: Step) {
        self.step = step;
        self.priority = None;
        self.passes = 0;
    }

    /// Open a fresh priority round starting with `player`.
    pub fn open_round(&mut self, player: PlayerId) {
        self.priority = Some(player);
        self.passes = 0;
    }

    #[must_use]
    pub fn holds_priority(&self, player: PlayerId) -> bool {
        self.priority == Some(player)
    }

    /// Whether `player` may do something only allowed at sorcery speed:
    /// their own main phase with nothing on the stack.
    #[must_use]
    pub fn sorcery_timing(&self, player: PlayerId, stack_empty: bool) -> bool {
        self.active_player == player && self.step.is_main() && stack_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_turn_state() {
        let turn = TurnState::new(PlayerId(1));
        assert_eq!(turn.turn_number, 1);
        assert_eq!(turn.step, Step::Untap);
        assert_eq!(turn.phase(), Phase::Beginning);
        assert_eq!(turn.priority, None);
    }

    #[test]
    fn test_rounds_reset_passes() {
        let mut turn = TurnState::new(PlayerId(0));
        turn.enter(Step::Upkeep);
        turn.open_round(PlayerId(0));
        turn.passes = 1;
        turn.open_round(PlayerId(0));
        assert_eq!(turn.passes, 0);
        assert!(turn.holds_priority(PlayerId(0)));
        assert!(!turn.holds_priority(PlayerId(1)));
    }

    #[test]
    fn test_sorcery_timing() {
        let mut turn = TurnState::new(PlayerId(0));
        turn.enter(Step::PrecombatMain);
        assert!(turn.sorcery_timing(PlayerId(0), true));
        assert!(!turn.sorcery_timing(PlayerId(0), false));
        assert!(!turn.sorcery_timing(PlayerId(1), true));
        turn.enter(Step::End);
        assert!(!turn.sorcery_timing(PlayerId(0), true));
    }
}
