//! A starter catalogue: the five basic lands and Grizzly Bears.
//!
//! Enough to play a match out of the box and to exercise land drops, mana
//! abilities and creature spells in tests. Anything richer comes from the
//! card database collaborator.

use super::definition::{CardDefinition, CardId};
use super::mana::ManaCost;
use super::registry::CardRegistry;
use super::types::{CardType, SubType, SuperType};

/// Name printed on the basic land of a given type.
#[must_use]
pub fn basic_land_name(subtype: SubType) -> &'static str {
    match subtype {
        SubType::Plains => "Plains",
        SubType::Island => "Island",
        SubType::Swamp => "Swamp",
        SubType::Mountain => "Mountain",
        SubType::Forest => "Forest",
        _ => "Wastes",
    }
}

/// A basic land. Its mana ability is intrinsic to the land type.
#[must_use]
pub fn basic_land(id: CardId, subtype: SubType) -> CardDefinition {
    CardDefinition::new(id, basic_land_name(subtype))
        .with_type(CardType::Land)
        .with_supertype(SuperType::Basic)
        .with_subtype(subtype)
}

/// Grizzly Bears: {1}{G}, Creature (Bear), 2/2.
#[must_use]
pub fn grizzly_bears(id: CardId) -> CardDefinition {
    CardDefinition::new(id, "Grizzly Bears")
        .with_cost(ManaCost::generic(1).with(super::ManaType::Green, 1))
        .with_type(CardType::Creature)
        .with_subtype(SubType::Bear)
        .with_pt(2, 2)
}

/// Register the starter catalogue into `registry`.
pub fn register_starter_cards(registry: &mut CardRegistry) {
    for subtype in SubType::BASIC_LANDS {
        registry.register_with(|id| basic_land(id, subtype));
    }
    registry.register_with(grizzly_bears);
}
