//! Characteristic engine: continuous effects applied in layer order.
//!
//! ## Key Types
//!
//! - `ContinuousEffect`: an active modification with a selector and duration
//! - `EffectSet`: the active-effect set owned by the game state
//! - `CharacteristicSet`: an object's computed characteristics
//! - `LayerSnapshot`: characteristics of every object, mid or post evaluation
//!
//! Evaluation visits copy, control, text, type, color, ability and the
//! power/toughness sub-layers in that order. Within a slot, effects are
//! ordered by dependency, then timestamp, then APNAP.

pub mod characteristics;
pub mod dependency;
pub mod effect;
pub mod engine;
pub mod selector;

pub use characteristics::CharacteristicSet;
pub use dependency::{depends_on, order_effects};
pub use effect::{
    Amount, ContinuousEffect, ContinuousEffectSpec, Duration, EffectCondition, EffectId,
    EffectOrigin, EffectSet, Evaluation, Layer, LayerSlot, Modification, PtSublayer,
    PtSublayerOrder,
};
pub use engine::{apply_effect, apply_in_order, characteristics_of, compute_all, LayerSnapshot};
pub use selector::{ObjectPredicate, SelectionContext, Selector};
