//! Turn structure and priority.
//!
//! ## Key Types
//!
//! - `Step` / `Phase`: the fixed sequence of a turn
//! - `TurnState`: active player, current step, priority holder, passes
//! - `PassOutcome`: what passing priority led to
//!
//! ```
//! use std::sync::Arc;
//!
//! use mtg_kernel::cards::{catalog, CardRegistry, SubType};
//! use mtg_kernel::core::{GameConfig, GameState, PlayerId};
//! use mtg_kernel::turn::{pass_priority, start_game, PassOutcome, Step};
//!
//! let mut cards = CardRegistry::new();
//! let forest = cards.register_with(|id| catalog::basic_land(id, SubType::Forest));
//! let mut state = GameState::new(GameConfig::two_player(), Arc::new(cards));
//! for player in [PlayerId(0), PlayerId(1)] {
//!     for _ in 0..10 {
//!         state.add_card_to_library(forest, player).unwrap();
//!     }
//! }
//!
//! start_game(&mut state).unwrap();
//! assert_eq!(state.turn.step, Step::Upkeep);
//!
//! pass_priority(&mut state, PlayerId(0)).unwrap();
//! let outcome = pass_priority(&mut state, PlayerId(1)).unwrap();
//! assert_eq!(outcome, PassOutcome::StepAdvanced { from: Step::Upkeep, to: Step::Draw });
//! ```

mod machine;
mod phase;
mod priority;

pub use machine::{
    advance_step, after_action, can_tap_for_ability, pass_priority, settle, start_game,
    PassOutcome, Settled,
};
pub use phase::{Phase, Step};
pub use priority::{PriorityPolicy, TurnState};
