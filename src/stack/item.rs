//! Stack items and the stack itself.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{ObjectId, PlayerId};
use crate::effects::{Effect, Target, TargetSpec};

/// Unique identifier for a stack item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StackItemId(pub u32);

impl StackItemId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StackItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackItem({})", self.0)
    }
}

/// What put the item on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackItemKind {
    /// A spell; `source` is the card object in the stack zone.
    Spell { card: CardId },
    /// An activated ability of `source`, by index on its card.
    Activated { index: usize },
    /// A triggered ability of `source`, by index on its card.
    Triggered { index: usize },
}

/// A pending spell or ability.
#[derive(Clone, Debug)]
pub struct StackItem {
    pub id: StackItemId,
    pub kind: StackItemKind,
    pub source: ObjectId,
    pub controller: PlayerId,
    pub target_specs: Vec<TargetSpec>,
    /// Chosen targets, one per spec.
    pub targets: Vec<Target>,
    pub effects: Vec<Effect>,
}

impl StackItem {
    /// Create an item with no targets. The id is assigned when pushed.
    pub fn new(kind: StackItemKind, source: ObjectId, controller: PlayerId) -> Self {
        Self {
            id: StackItemId(0),
            kind,
            source,
            controller,
            target_specs: Vec::new(),
            targets: Vec::new(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_targets(mut self, specs: Vec<TargetSpec>, targets: Vec<Target>) -> Self {
        self.target_specs = specs;
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, StackItemKind::Spell { .. })
    }
}

/// LIFO stack of pending items. Index 0 is the bottom.
#[derive(Clone, Debug, Default)]
pub struct Stack {
    items: Vec<StackItem>,
    next_id: u32,
}

impl Stack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an item on top, assigning its id.
    pub fn push(&mut self, mut item: StackItem) -> StackItemId {
        let id = StackItemId(self.next_id);
        self.next_id += 1;
        item.id = id;
        self.items.push(item);
        id
    }

    #[must_use]
    pub fn peek_top(&self) -> Option<&StackItem> {
        self.items.last()
    }

    pub fn pop(&mut self) -> Option<StackItem> {
        self.items.pop()
    }

    /// Take an item out from anywhere in the stack.
    pub fn remove(&mut self, id: StackItemId) -> Option<StackItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: StackItemId) -> Option<&StackItem> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &StackItem> {
        self.items.iter()
    }
}
