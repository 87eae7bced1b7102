//! Card registry: the card database collaborator.
//!
//! Stores every `CardDefinition` a match can reference, keyed by `CardId`
//! with a secondary index by name. The registry is shared read-only with
//! the game state once the match starts.

use rustc_hash::FxHashMap;
use tracing::warn;

use super::definition::{CardDefinition, CardId};
use crate::core::{Result, StateQueryError};

/// Registry of card definitions.
///
/// ```
/// use mtg_kernel::cards::{CardDefinition, CardRegistry, CardType};
///
/// let mut registry = CardRegistry::new();
/// let id = registry.register_with(|id| {
///     CardDefinition::new(id, "Memnite").with_type(CardType::Creature).with_pt(1, 1)
/// });
///
/// assert_eq!(registry.get(id).unwrap().name, "Memnite");
/// assert_eq!(registry.by_name("Memnite").unwrap().id, id);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    names: FxHashMap<String, CardId>,
    next_id: u32,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        if card.has_unchosen_target_reference() {
            warn!(card = %card.name, "an effect refers to a target its ability never chooses");
        }
        self.next_id = self.next_id.max(card.id.0 + 1);
        self.names.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
    }

    /// Register a card built from a freshly allocated ID.
    pub fn register_with(&mut self, build: impl FnOnce(CardId) -> CardDefinition) -> CardId {
        let id = CardId::new(self.next_id);
        let card = build(id);
        let id = card.id;
        self.register(card);
        id
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Look up a definition, reporting a missing one as a query error.
    pub fn definition(&self, id: CardId) -> Result<&CardDefinition> {
        self.cards
            .get(&id)
            .ok_or_else(|| StateQueryError::UnknownCard(id).into())
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.names.get(name).and_then(|id| self.cards.get(id))
    }

    /// Look up a card id by name, reporting a missing one as a query error.
    pub fn id_of(&self, name: &str) -> Result<CardId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| StateQueryError::UnknownCardName(name.to_string()).into())
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;
    use crate::core::RulesError;

    #[test]
    fn test_register_with_allocates_sequential_ids() {
        let mut registry = CardRegistry::new();

        let a = registry.register_with(|id| CardDefinition::new(id, "A"));
        let b = registry.register_with(|id| CardDefinition::new(id, "B"));

        assert_eq!(a, CardId::new(0));
        assert_eq!(b, CardId::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_explicit_ids_advance_allocator() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(10), "Ten"));

        let next = registry.register_with(|id| CardDefinition::new(id, "Next"));
        assert_eq!(next, CardId::new(11));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "Card A"));
        registry.register(CardDefinition::new(CardId::new(1), "Card B"));
    }

    #[test]
    fn test_missing_lookups_are_query_errors() {
        let registry = CardRegistry::new();

        assert!(matches!(
            registry.definition(CardId::new(4)),
            Err(RulesError::StateQuery(StateQueryError::UnknownCard(_)))
        ));
        assert!(matches!(
            registry.id_of("Nope"),
            Err(RulesError::StateQuery(StateQueryError::UnknownCardName(_)))
        ));
    }

    #[test]
    fn test_name_index() {
        let mut registry = CardRegistry::new();
        let id = registry
            .register_with(|id| CardDefinition::new(id, "Ornithopter").with_type(CardType::Artifact));

        assert_eq!(registry.id_of("Ornithopter").unwrap(), id);
        assert!(registry.contains(id));
        assert_eq!(registry.iter().count(), 1);
    }
}
