//! The stack: pending spells and abilities, resolved last in, first out.
//!
//! ## Key Types
//!
//! - `Stack` / `StackItem`: the container and its entries
//! - `ResolutionOutcome`: resolved, partially resolved, fizzled or countered
//!
//! ```
//! use mtg_kernel::core::{ObjectId, PlayerId};
//! use mtg_kernel::stack::{Stack, StackItem, StackItemKind};
//!
//! let mut stack = Stack::new();
//! let kind = StackItemKind::Activated { index: 0 };
//! let x = stack.push(StackItem::new(kind, ObjectId(1), PlayerId(0)));
//! let y = stack.push(StackItem::new(kind, ObjectId(2), PlayerId(1)));
//!
//! assert_eq!(stack.pop().unwrap().id, y);
//! assert_eq!(stack.pop().unwrap().id, x);
//! ```

pub mod item;
pub mod resolution;

pub use item::{Stack, StackItem, StackItemId, StackItemKind};
pub use resolution::{
    counter_item, push, resolve_top, validate_targets, ResolutionOutcome, ResolutionRecord,
};
