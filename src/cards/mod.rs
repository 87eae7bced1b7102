//! Card system: vocabularies, mana, definitions, objects and registry.
//!
//! ## Key Types
//!
//! - `CardDefinition`: read-only printed card data and compiled abilities
//! - `CardRegistry`: the card database, keyed by `CardId` and name
//! - `GameObject`: a card or token instance in a zone
//! - `ManaCost` / `ManaPool`: costs and floating mana

pub mod catalog;
pub mod definition;
pub mod mana;
pub mod object;
pub mod registry;
pub mod types;

pub use definition::{
    AbilityCost, ActivatedAbility, CardDefinition, CardId, SpellAbility, StaticAbility,
    TriggeredAbility,
};
pub use mana::{ManaCost, ManaPool, ManaType};
pub use object::GameObject;
pub use registry::CardRegistry;
pub use types::{CardType, Color, CounterType, Keyword, SubType, SuperType};
