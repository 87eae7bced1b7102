//! # mtg-kernel
//!
//! A rules kernel for Magic: The Gathering.
//!
//! The kernel owns the parts of the comprehensive rules every card relies
//! on: zones, the layer system for continuous effects, state-based actions,
//! the stack, turn structure with priority, and triggered ability
//! collection. Cards are data (`CardDefinition`); the kernel never does I/O
//! and never chooses for a player.
//!
//! ## Design Principles
//!
//! 1. **Derived, never stored**: an object's characteristics are recomputed
//!    from printed values plus the active continuous effects on every query.
//!
//! 2. **Validate, then mutate**: a rejected action leaves the state exactly
//!    as it was.
//!
//! 3. **Deterministic**: the same seed and action sequence always produce
//!    the same game.
//!
//! ## Modules
//!
//! - `core`: ids, players, configuration, errors, actions, `GameState`
//! - `zones`: zone membership and ordering
//! - `cards`: card definitions, mana, in-game objects
//! - `layers`: continuous effects and characteristic computation
//! - `effects`: one-shot effects and targeting
//! - `stack`: pending spells and abilities, resolution outcomes
//! - `sba`: state-based actions
//! - `triggers`: game events and triggered ability collection
//! - `turn`: steps, phases and priority
//! - `rules`: the `RulesEngine` trait and `StandardRules`

pub mod cards;
pub mod core;
pub mod effects;
pub mod layers;
pub mod rules;
pub mod sba;
pub mod stack;
pub mod triggers;
pub mod turn;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    GameConfig, GameState, IllegalAction, ObjectId, PlayerAction, PlayerId, Result, RulesError,
};

pub use crate::cards::{CardDefinition, CardId, CardRegistry, ManaCost, ManaType};

pub use crate::zones::{Zone, ZoneKind};

pub use crate::layers::{characteristics_of, compute_all, CharacteristicSet, ContinuousEffectSpec};

pub use crate::effects::{Effect, Target, TargetSpec};

pub use crate::stack::{ResolutionOutcome, StackItemId};

pub use crate::triggers::{GameEvent, TriggerCondition};

pub use crate::turn::{start_game, PassOutcome, Step};

pub use crate::rules::{ActionReport, GameResult, RulesEngine, StandardRules};
