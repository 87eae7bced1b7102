//! The characteristic set the layer engine computes for each object.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardId, CardType, Color, Keyword, ManaCost, SubType, SuperType};
use crate::core::PlayerId;

/// An object's current characteristics after all continuous effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicSet {
    pub name: String,
    pub mana_cost: Option<ManaCost>,
    pub colors: BTreeSet<Color>,
    pub card_types: BTreeSet<CardType>,
    pub subtypes: BTreeSet<SubType>,
    pub supertypes: BTreeSet<SuperType>,
    pub keywords: BTreeSet<Keyword>,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub controller: PlayerId,
    /// Card whose non-keyword abilities this object has. Changes under copy
    /// effects.
    pub ability_source: CardId,
    /// False once an effect has removed all abilities.
    pub abilities_intact: bool,
}

impl CharacteristicSet {
    /// Printed characteristics of a card under `controller`.
    #[must_use]
    pub fn printed(definition: &CardDefinition, controller: PlayerId) -> Self {
        Self {
            name: definition.name.clone(),
            mana_cost: definition.mana_cost,
            colors: definition.colors(),
            card_types: definition.card_types.clone(),
            subtypes: definition.subtypes.clone(),
            supertypes: definition.supertypes.clone(),
            keywords: definition.keywords.clone(),
            power: definition.power,
            toughness: definition.toughness,
            controller,
            ability_source: definition.id,
            abilities_intact: true,
        }
    }

    /// Take over another object's copiable values, keeping controller.
    pub fn copy_from(&mut self, original: &CharacteristicSet) {
        let controller = self.controller;
        *self = original.clone();
        self.controller = controller;
        self.abilities_intact = true;
    }

    #[must_use]
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.card_types.contains(&card_type)
    }

    #[must_use]
    pub fn has_subtype(&self, subtype: SubType) -> bool {
        self.subtypes.contains(&subtype)
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.has_type(CardType::Creature)
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.has_type(CardType::Land)
    }

    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.supertypes.contains(&SuperType::Legendary)
    }

    /// Colors of mana this object can tap for through its basic land types.
    #[must_use]
    pub fn intrinsic_mana(&self) -> Vec<Color> {
        if !self.is_land() {
            return Vec::new();
        }
        self.subtypes
            .iter()
            .filter_map(|s| s.basic_land_color())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog;

    #[test]
    fn test_printed_from_definition() {
        let bears = catalog::grizzly_bears(CardId(4));
        let chars = CharacteristicSet::printed(&bears, PlayerId(1));

        assert_eq!(chars.name, "Grizzly Bears");
        assert!(chars.is_creature());
        assert_eq!(chars.colors, BTreeSet::from([Color::Green]));
        assert_eq!(chars.controller, PlayerId(1));
        assert_eq!(chars.ability_source, CardId(4));
        assert!(chars.intrinsic_mana().is_empty());
    }

    #[test]
    fn test_copy_keeps_controller() {
        let forest = catalog::basic_land(CardId(1), SubType::Forest);
        let bears = catalog::grizzly_bears(CardId(2));
        let mut chars = CharacteristicSet::printed(&forest, PlayerId(0));
        chars.abilities_intact = false;

        chars.copy_from(&CharacteristicSet::printed(&bears, PlayerId(1)));

        assert_eq!(chars.name, "Grizzly Bears");
        assert_eq!(chars.controller, PlayerId(0));
        assert!(chars.abilities_intact);
    }

    #[test]
    fn test_intrinsic_mana_needs_land_type() {
        let forest = catalog::basic_land(CardId(1), SubType::Forest);
        let mut chars = CharacteristicSet::printed(&forest, PlayerId(0));
        assert_eq!(chars.intrinsic_mana(), vec![Color::Green]);

        chars.card_types.remove(&CardType::Land);
        assert!(chars.intrinsic_mana().is_empty());
    }
}
