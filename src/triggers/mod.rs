//! Events and triggered abilities.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: something that happened, queued on the game state
//! - [`TriggerCondition`]: narrows which events fire an ability
//! - [`TriggerRegistry`]: printed triggered abilities indexed by event kind
//! - [`match_event`]: matches one event against listening abilities as it happens
//! - [`collect_triggers`]: pushes matched triggers onto the stack in APNAP order
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use mtg_kernel::cards::{CardDefinition, CardRegistry, CardType, TriggeredAbility};
//! use mtg_kernel::core::{GameConfig, GameState, PlayerId};
//! use mtg_kernel::effects::Effect;
//! use mtg_kernel::triggers::{collect_triggers, EventKind, TriggerCondition};
//! use mtg_kernel::zones::Zone;
//!
//! let mut cards = CardRegistry::new();
//! let mourner = cards.register_with(|id| {
//!     CardDefinition::new(id, "Mourner")
//!         .with_type(CardType::Creature)
//!         .with_pt(1, 1)
//!         .with_triggered(
//!             TriggeredAbility::new("dies", EventKind::ZoneChange)
//!                 .with_condition(TriggerCondition::self_dies())
//!                 .with_effect(Effect::gain_life(2)),
//!         )
//! });
//!
//! let mut state = GameState::new(GameConfig::two_player(), Arc::new(cards));
//! let creature = state.create_object(mourner, PlayerId(0), Zone::Battlefield).unwrap();
//! state.put_into_graveyard(creature).unwrap();
//!
//! assert_eq!(collect_triggers(&mut state).unwrap(), 1);
//! assert_eq!(state.stack.len(), 1);
//! ```

mod collector;
mod condition;
mod event;
mod registry;

pub use collector::{collect_triggers, match_event, Departed, PendingTrigger};
pub use condition::{ConditionContext, ConditionEvaluator, TriggerCondition};
pub use event::{EventKind, GameEvent};
pub use registry::{TriggerPolicy, TriggerRegistry, TriggerTarget, WithinPlayerOrder};
