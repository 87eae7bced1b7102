//! Game objects: a card (or token) at one moment in one zone.
//!
//! Status that belongs to the object rather than to its characteristics
//! lives here: tapped, marked damage, counters, and the turn it came under
//! its controller's control. None of it survives a zone change, because the
//! object that arrives in the new zone is a new object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use super::types::CounterType;
use crate::core::{ObjectId, PlayerId, Timestamp};
use crate::zones::Zone;

/// A card or token instance in a zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: ObjectId,
    pub card: CardId,
    pub owner: PlayerId,
    /// Controller before layer 2 effects are applied.
    pub controller: PlayerId,
    pub zone: Zone,
    /// When the object entered its zone.
    pub timestamp: Timestamp,
    pub tapped: bool,
    pub damage: u32,
    /// Whether any damage marked this turn came from a deathtouch source.
    pub damaged_by_deathtouch: bool,
    pub counters: BTreeMap<CounterType, u32>,
    /// Turn number when the current controller gained control.
    pub controlled_since_turn: u32,
    pub is_token: bool,
}

impl GameObject {
    /// Create an object fresh in `zone`.
    #[must_use]
    pub fn new(
        id: ObjectId,
        card: CardId,
        owner: PlayerId,
        zone: Zone,
        timestamp: Timestamp,
        turn: u32,
    ) -> Self {
        Self {
            id,
            card,
            owner,
            controller: owner,
            zone,
            timestamp,
            tapped: false,
            damage: 0,
            damaged_by_deathtouch: false,
            counters: BTreeMap::new(),
            controlled_since_turn: turn,
            is_token: false,
        }
    }

    #[must_use]
    pub fn counter_count(&self, counter: CounterType) -> u32 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    pub fn add_counters(&mut self, counter: CounterType, amount: u32) {
        if amount > 0 {
            *self.counters.entry(counter).or_insert(0) += amount;
        }
    }

    /// Remove up to `amount` counters, returning how many were removed.
    pub fn remove_counters(&mut self, counter: CounterType, amount: u32) -> u32 {
        let Some(current) = self.counters.get_mut(&counter) else {
            return 0;
        };
        let removed = amount.min(*current);
        *current -= removed;
        if *current == 0 {
            self.counters.remove(&counter);
        }
        removed
    }

    /// Net P/T adjustment from +1/+1 and -1/-1 counters.
    #[must_use]
    pub fn counter_pt_delta(&self) -> i32 {
        let count = |counter| i32::try_from(self.counter_count(counter)).unwrap_or(i32::MAX);
        count(CounterType::PlusOnePlusOne).saturating_sub(count(CounterType::MinusOneMinusOne))
    }

    /// Whether the object has been under its controller's control
    /// continuously since the start of `current_turn`.
    #[must_use]
    pub fn is_summoning_sick(&self, current_turn: u32) -> bool {
        self.controlled_since_turn >= current_turn
    }

    pub fn clear_damage(&mut self) {
        self.damage = 0;
        self.damaged_by_deathtouch = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bear() -> GameObject {
        GameObject::new(
            ObjectId(5),
            CardId(1),
            PlayerId(0),
            Zone::Battlefield,
            Timestamp(3),
            2,
        )
    }

    #[test]
    fn test_new_object_defaults() {
        let obj = bear();
        assert_eq!(obj.controller, obj.owner);
        assert!(!obj.tapped);
        assert_eq!(obj.damage, 0);
        assert!(obj.counters.is_empty());
    }

    #[test]
    fn test_counters_accumulate_and_drain() {
        let mut obj = bear();
        obj.add_counters(CounterType::PlusOnePlusOne, 2);
        obj.add_counters(CounterType::MinusOneMinusOne, 3);
        assert_eq!(obj.counter_pt_delta(), -1);

        assert_eq!(obj.remove_counters(CounterType::MinusOneMinusOne, 5), 3);
        assert_eq!(obj.counter_count(CounterType::MinusOneMinusOne), 0);
        assert!(!obj.counters.contains_key(&CounterType::MinusOneMinusOne));
        assert_eq!(obj.remove_counters(CounterType::Charge, 1), 0);
    }

    #[test]
    fn test_summoning_sickness_wears_off_next_turn() {
        let obj = bear();
        assert!(obj.is_summoning_sick(2));
        assert!(!obj.is_summoning_sick(3));
    }
}
