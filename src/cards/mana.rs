//! Mana costs and mana pools.
//!
//! A `ManaCost` is a generic amount plus specific amounts per mana type.
//! A `ManaPool` holds floating mana until it is spent or the step ends.
//!
//! Paying a cost spends the specific requirements first, then covers the
//! generic part with colorless mana before touching colored mana (in WUBRG
//! order), which keeps colored mana around for later colored costs.
//!
//! ```
//! use mtg_kernel::cards::{ManaCost, ManaPool, ManaType};
//!
//! let bears = ManaCost::parse("{1}{G}").unwrap();
//! let mut pool = ManaPool::new();
//! pool.add(ManaType::Green, 1);
//! assert!(!pool.can_pay(&bears));
//!
//! pool.add(ManaType::Colorless, 1);
//! assert!(pool.pay(&bears));
//! assert_eq!(pool.total(), 0);
//! ```

use serde::{Deserialize, Serialize};

use super::types::Color;

/// A type of mana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManaType {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl ManaType {
    /// All mana types; index order matches `ManaType::index`.
    pub const ALL: [ManaType; 6] = [
        ManaType::White,
        ManaType::Blue,
        ManaType::Black,
        ManaType::Red,
        ManaType::Green,
        ManaType::Colorless,
    ];

    /// Order in which generic costs are paid.
    const GENERIC_PAYMENT_ORDER: [ManaType; 6] = [
        ManaType::Colorless,
        ManaType::White,
        ManaType::Blue,
        ManaType::Black,
        ManaType::Red,
        ManaType::Green,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_color(color: Color) -> Self {
        match color {
            Color::White => ManaType::White,
            Color::Blue => ManaType::Blue,
            Color::Black => ManaType::Black,
            Color::Red => ManaType::Red,
            Color::Green => ManaType::Green,
        }
    }

    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            ManaType::White => Some(Color::White),
            ManaType::Blue => Some(Color::Blue),
            ManaType::Black => Some(Color::Black),
            ManaType::Red => Some(Color::Red),
            ManaType::Green => Some(Color::Green),
            ManaType::Colorless => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            ManaType::White => 'W',
            ManaType::Blue => 'U',
            ManaType::Black => 'B',
            ManaType::Red => 'R',
            ManaType::Green => 'G',
            ManaType::Colorless => 'C',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        ManaType::ALL.into_iter().find(|t| t.symbol() == symbol)
    }
}

/// A mana cost: generic amount plus per-type requirements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaCost {
    pub generic: u32,
    specific: [u32; 6],
}

impl ManaCost {
    /// The empty cost {0}.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// A purely generic cost.
    #[must_use]
    pub fn generic(amount: u32) -> Self {
        Self {
            generic: amount,
            ..Self::default()
        }
    }

    /// Add a specific requirement (builder pattern).
    #[must_use]
    pub fn with(mut self, mana: ManaType, amount: u32) -> Self {
        self.specific[mana.index()] += amount;
        self
    }

    /// Parse costs written as `{2}{W}{W}` or `2WW`.
    ///
    /// Returns `None` on any symbol outside generic numbers and WUBRGC.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut cost = Self::zero();
        let mut digits = String::new();

        let flush = |digits: &mut String, cost: &mut Self| -> Option<()> {
            if !digits.is_empty() {
                cost.generic += digits.parse::<u32>().ok()?;
                digits.clear();
            }
            Some(())
        };

        for ch in text.chars() {
            match ch {
                '{' | '}' => flush(&mut digits, &mut cost)?,
                c if c.is_ascii_digit() => digits.push(c),
                c => {
                    flush(&mut digits, &mut cost)?;
                    let mana = ManaType::from_symbol(c)?;
                    cost.specific[mana.index()] += 1;
                }
            }
        }
        flush(&mut digits, &mut cost)?;
        Some(cost)
    }

    /// Amount of a specific mana type required.
    #[must_use]
    pub fn specific(&self, mana: ManaType) -> u32 {
        self.specific[mana.index()]
    }

    /// Total mana value.
    #[must_use]
    pub fn mana_value(&self) -> u32 {
        self.generic + self.specific.iter().sum::<u32>()
    }

    /// Colors that appear in the cost.
    #[must_use]
    pub fn colors(&self) -> Vec<Color> {
        Color::ALL
            .into_iter()
            .filter(|c| self.specific(ManaType::from_color(*c)) > 0)
            .collect()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mana_value() == 0
    }
}

impl std::fmt::Display for ManaCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.generic > 0 || self.is_zero() {
            write!(f, "{{{}}}", self.generic)?;
        }
        for mana in ManaType::ALL {
            for _ in 0..self.specific(mana) {
                write!(f, "{{{}}}", mana.symbol())?;
            }
        }
        Ok(())
    }
}

/// Floating mana owned by a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaPool {
    amounts: [u32; 6],
}

impl ManaPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mana: ManaType, amount: u32) {
        self.amounts[mana.index()] += amount;
    }

    #[must_use]
    pub fn amount(&self, mana: ManaType) -> u32 {
        self.amounts[mana.index()]
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.amounts.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Whether the pool covers `cost`.
    #[must_use]
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        self.after_payment(cost).is_some()
    }

    /// Spend mana for `cost`. Leaves the pool untouched and returns `false`
    /// when the cost cannot be covered.
    pub fn pay(&mut self, cost: &ManaCost) -> bool {
        match self.after_payment(cost) {
            Some(remaining) => {
                self.amounts = remaining;
                true
            }
            None => false,
        }
    }

    /// Empty the pool, returning how much mana was lost.
    pub fn empty(&mut self) -> u32 {
        let lost = self.total();
        self.amounts = [0; 6];
        lost
    }

    fn after_payment(&self, cost: &ManaCost) -> Option<[u32; 6]> {
        let mut remaining = self.amounts;

        for mana in ManaType::ALL {
            let needed = cost.specific(mana);
            let slot = &mut remaining[mana.index()];
            *slot = slot.checked_sub(needed)?;
        }

        let mut generic = cost.generic;
        for mana in ManaType::GENERIC_PAYMENT_ORDER {
            let slot = &mut remaining[mana.index()];
            let spent = generic.min(*slot);
            *slot -= spent;
            generic -= spent;
        }

        (generic == 0).then_some(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_braced_and_bare() {
        let braced = ManaCost::parse("{2}{W}{W}").unwrap();
        let bare = ManaCost::parse("2WW").unwrap();
        assert_eq!(braced, bare);
        assert_eq!(braced.generic, 2);
        assert_eq!(braced.specific(ManaType::White), 2);
        assert_eq!(braced.mana_value(), 4);
        assert_eq!(braced.colors(), vec![Color::White]);
    }

    #[test]
    fn test_parse_rejects_unknown_symbols() {
        assert!(ManaCost::parse("{X}").is_none());
        assert!(ManaCost::parse("1Q").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ManaCost::parse("1G").unwrap().to_string(), "{1}{G}");
        assert_eq!(ManaCost::zero().to_string(), "{0}");
        assert_eq!(ManaCost::zero().with(ManaType::Red, 1).to_string(), "{R}");
    }

    #[test]
    fn test_generic_prefers_colorless() {
        let mut pool = ManaPool::new();
        pool.add(ManaType::Colorless, 1);
        pool.add(ManaType::Blue, 1);

        assert!(pool.pay(&ManaCost::generic(1)));
        assert_eq!(pool.amount(ManaType::Colorless), 0);
        assert_eq!(pool.amount(ManaType::Blue), 1);
    }

    #[test]
    fn test_failed_payment_leaves_pool_unchanged() {
        let mut pool = ManaPool::new();
        pool.add(ManaType::Green, 1);
        let before = pool;

        assert!(!pool.pay(&ManaCost::parse("GG").unwrap()));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_specific_before_generic() {
        // {1}{R} with R + G available: R must go to the red pip.
        let mut pool = ManaPool::new();
        pool.add(ManaType::Green, 1);
        pool.add(ManaType::Red, 1);
        assert!(pool.pay(&ManaCost::parse("1R").unwrap()));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_empty_reports_lost_mana() {
        let mut pool = ManaPool::new();
        pool.add(ManaType::White, 2);
        assert_eq!(pool.empty(), 2);
        assert!(pool.is_empty());
    }
}
