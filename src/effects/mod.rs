//! One-shot effects and targeting.
//!
//! ## Key Types
//!
//! - `Effect`: what a resolving spell or ability does
//! - `Target` / `TargetSpec`: chosen targets and what may be chosen
//! - `EffectResolver`: applies effects to the game state

pub mod effect;
pub mod resolver;
pub mod targeting;

pub use effect::{CustomEffect, Effect, EffectContext, EffectTarget};
pub use resolver::EffectResolver;
pub use targeting::{Target, TargetKind, TargetSpec};
