//! State-based actions.
//!
//! Checked before any player receives priority and repeated until nothing
//! applies. A game whose state-based actions never settle is a kernel
//! defect and reported as `SbaNonConvergence`.
//!
//! ```
//! use std::sync::Arc;
//!
//! use mtg_kernel::cards::{catalog, CardRegistry};
//! use mtg_kernel::core::{GameConfig, GameState, PlayerId};
//! use mtg_kernel::sba::run_sbas_to_fixed_point;
//! use mtg_kernel::zones::Zone;
//!
//! let mut cards = CardRegistry::new();
//! let bears = cards.register_with(catalog::grizzly_bears);
//! let mut state = GameState::new(GameConfig::two_player(), Arc::new(cards));
//! let bear = state.create_object(bears, PlayerId(0), Zone::Battlefield).unwrap();
//! state.object_mut(bear).unwrap().damage = 2;
//!
//! assert_eq!(run_sbas_to_fixed_point(&mut state).unwrap(), 1);
//! assert!(state.zones.battlefield().is_empty());
//! ```

mod actions;
mod checker;

pub use actions::{DeathReason, LegendRulePolicy, LoseReason, StateBasedAction};
pub use checker::{apply_sbas, check_state_based_actions, run_sbas_to_fixed_point, POISON_LIMIT};
