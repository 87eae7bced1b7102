//! The driver-facing rules engine.
//!
//! A driver asks `RulesEngine::legal_actions` what the priority holder may
//! do, submits one `PlayerAction` at a time through `apply_action`, and
//! checks `is_terminal` after each step. `StandardRules` is the engine the
//! kernel ships with.

pub mod engine;
pub mod standard;

pub use engine::{ActionReport, GameResult, RulesEngine};
pub use standard::StandardRules;
