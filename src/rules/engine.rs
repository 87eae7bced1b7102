//! The driver-facing rules engine trait.
//!
//! A driver (CLI, UI, AI, network layer) asks for legal actions, submits
//! one action at a time, and reads characteristics for display. The engine
//! never initiates I/O.

use serde::{Deserialize, Serialize};

use crate::cards::ManaType;
use crate::core::{GameState, ObjectId, PlayerAction, PlayerId, Result};
use crate::layers::{characteristics_of, CharacteristicSet};
use crate::stack::StackItemId;
use crate::turn::PassOutcome;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (team games, shared victory).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// What an accepted action did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionReport {
    Passed(PassOutcome),
    LandPlayed { permanent: ObjectId },
    SpellCast { item: StackItemId, spell: ObjectId },
    AbilityActivated { item: StackItemId },
    /// A mana ability resolved immediately.
    ManaProduced { source: ObjectId, mana: Vec<ManaType> },
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty unless `player` holds priority
/// - `apply_action`: validates completely before touching the state; a
///   rejected action leaves the state exactly as it was
/// - `is_terminal`: `None` while the match continues
pub trait RulesEngine {
    /// Every action `player` may take right now.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<PlayerAction>;

    /// Validate and perform one action.
    fn apply_action(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        action: &PlayerAction,
    ) -> Result<ActionReport>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.result.clone()
    }

    // === Convenience Methods ===

    /// Current characteristics of an object, for display.
    fn characteristics_of(&self, state: &GameState, object: ObjectId) -> Result<CharacteristicSet> {
        characteristics_of(state, object)
    }

    /// Legal actions for whoever holds priority.
    fn legal_actions_for_holder(&self, state: &GameState) -> Vec<PlayerAction> {
        state
            .turn
            .priority
            .map(|player| self.legal_actions(state, player))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));

        let team = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(team.is_winner(PlayerId::new(0)));
        assert!(!team.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_report_serialization() {
        let report = ActionReport::ManaProduced {
            source: ObjectId(4),
            mana: vec![ManaType::Green],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ActionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
