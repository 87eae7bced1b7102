//! Printed-characteristic vocabularies: colors, types, counters, keywords.

use serde::{Deserialize, Serialize};

/// One of the five colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All colors in WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Mana symbol letter.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }
}

/// Card types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    Artifact,
    Battle,
    Creature,
    Enchantment,
    Instant,
    Kindred,
    Land,
    Planeswalker,
    Sorcery,
}

impl CardType {
    /// Whether an object of this type stays on the battlefield when it resolves.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        !matches!(self, CardType::Instant | CardType::Sorcery | CardType::Kindred)
    }
}

/// Subtypes the kernel knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubType {
    // Basic land types
    Plains,
    Island,
    Swamp,
    Mountain,
    Forest,
    // Creature types
    Bear,
    Cat,
    Elf,
    Goblin,
    Human,
    Soldier,
    Wizard,
    // Others
    Aura,
    Equipment,
}

impl SubType {
    /// Basic land types in WUBRG order.
    pub const BASIC_LANDS: [SubType; 5] = [
        SubType::Plains,
        SubType::Island,
        SubType::Swamp,
        SubType::Mountain,
        SubType::Forest,
    ];

    /// The color of mana a basic land type taps for.
    #[must_use]
    pub const fn basic_land_color(self) -> Option<Color> {
        match self {
            SubType::Plains => Some(Color::White),
            SubType::Island => Some(Color::Blue),
            SubType::Swamp => Some(Color::Black),
            SubType::Mountain => Some(Color::Red),
            SubType::Forest => Some(Color::Green),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_creature_type(self) -> bool {
        matches!(
            self,
            SubType::Bear
                | SubType::Cat
                | SubType::Elf
                | SubType::Goblin
                | SubType::Human
                | SubType::Soldier
                | SubType::Wizard
        )
    }
}

/// Supertypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuperType {
    Basic,
    Legendary,
    Snow,
    World,
}

/// Counters that can sit on permanents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CounterType {
    PlusOnePlusOne,
    MinusOneMinusOne,
    Loyalty,
    Charge,
}

/// Keyword abilities tracked as characteristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Deathtouch,
    Defender,
    Flying,
    Haste,
    Indestructible,
    Lifelink,
    Trample,
    Vigilance,
}
