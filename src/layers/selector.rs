//! Object selection against partially computed characteristics.
//!
//! Selectors decide which objects a continuous effect touches. They are
//! evaluated against the layer engine's running snapshot, so an effect in
//! layer 7 that says "creatures you control" sees types changed in layer 4
//! and control changed in layer 2.

use serde::{Deserialize, Serialize};

use super::characteristics::CharacteristicSet;
use super::engine::LayerSnapshot;
use crate::cards::{CardType, Color, GameObject, Keyword, SubType, SuperType};
use crate::core::{GameState, ObjectId, PlayerId};

/// Who is asking: the source of the effect or target spec and its controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionContext {
    pub source: Option<ObjectId>,
    pub controller: PlayerId,
}

impl SelectionContext {
    #[must_use]
    pub fn new(source: Option<ObjectId>, controller: PlayerId) -> Self {
        Self { source, controller }
    }
}

/// A test on one object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectPredicate {
    CardType(CardType),
    Subtype(SubType),
    Supertype(SuperType),
    Color(Color),
    Keyword(Keyword),
    ControlledBy(PlayerId),
    /// Controlled by the controller of the effect or spec.
    ControlledByYou,
    ControlledByOpponent,
    IsSource,
    NotSource,
    Tapped,
    Untapped,
    Not(Box<ObjectPredicate>),
}

impl ObjectPredicate {
    /// Check `object` whose current characteristics are `chars`.
    #[must_use]
    pub fn matches(
        &self,
        object: &GameObject,
        chars: &CharacteristicSet,
        ctx: &SelectionContext,
    ) -> bool {
        match self {
            Self::CardType(t) => chars.has_type(*t),
            Self::Subtype(s) => chars.has_subtype(*s),
            Self::Supertype(s) => chars.supertypes.contains(s),
            Self::Color(c) => chars.colors.contains(c),
            Self::Keyword(k) => chars.has_keyword(*k),
            Self::ControlledBy(p) => chars.controller == *p,
            Self::ControlledByYou => chars.controller == ctx.controller,
            Self::ControlledByOpponent => chars.controller != ctx.controller,
            Self::IsSource => ctx.source == Some(object.id),
            Self::NotSource => ctx.source != Some(object.id),
            Self::Tapped => object.tapped,
            Self::Untapped => !object.tapped,
            Self::Not(inner) => !inner.matches(object, chars, ctx),
        }
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Whether every predicate in `predicates` matches.
    #[must_use]
    pub fn all_match(
        predicates: &[ObjectPredicate],
        object: &GameObject,
        chars: &CharacteristicSet,
        ctx: &SelectionContext,
    ) -> bool {
        predicates.iter().all(|p| p.matches(object, chars, ctx))
    }
}

/// Which objects a continuous effect affects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// One specific object.
    Object(ObjectId),
    /// A fixed set of objects, locked in when the effect was created.
    Objects(Vec<ObjectId>),
    /// The effect's own source.
    Source,
    /// The legal targets of the spell or ability creating the effect.
    /// Replaced by `Objects` when the effect is created.
    Targets,
    /// Every permanent matching all predicates.
    Battlefield(Vec<ObjectPredicate>),
}

impl Selector {
    /// Every permanent matching `predicates`.
    #[must_use]
    pub fn permanents(predicates: impl IntoIterator<Item = ObjectPredicate>) -> Self {
        Self::Battlefield(predicates.into_iter().collect())
    }

    /// Creatures controlled by the effect's controller.
    #[must_use]
    pub fn creatures_you_control() -> Self {
        Self::permanents([
            ObjectPredicate::CardType(CardType::Creature),
            ObjectPredicate::ControlledByYou,
        ])
    }

    /// Whether the affected set can change as the game state changes.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Battlefield(_))
    }

    /// Objects selected in `snapshot`, in battlefield order for dynamic
    /// selectors.
    #[must_use]
    pub fn resolve(
        &self,
        snapshot: &LayerSnapshot,
        state: &GameState,
        ctx: &SelectionContext,
    ) -> Vec<ObjectId> {
        match self {
            Self::Object(id) => snapshot.get(*id).map(|_| *id).into_iter().collect(),
            Self::Objects(ids) => ids
                .iter()
                .copied()
                .filter(|id| snapshot.get(*id).is_some())
                .collect(),
            Self::Source => ctx
                .source
                .filter(|id| snapshot.get(*id).is_some())
                .into_iter()
                .collect(),
            Self::Targets => Vec::new(),
            Self::Battlefield(predicates) => state
                .zones
                .battlefield()
                .iter()
                .copied()
                .filter(|id| {
                    match (state.object(*id), snapshot.get(*id)) {
                        (Some(object), Some(chars)) => {
                            ObjectPredicate::all_match(predicates, object, chars, ctx)
                        }
                        _ => false,
                    }
                })
                .collect(),
        }
    }

    /// Count permanents matching `predicates` in `snapshot`.
    #[must_use]
    pub fn count(
        predicates: &[ObjectPredicate],
        snapshot: &LayerSnapshot,
        state: &GameState,
        ctx: &SelectionContext,
    ) -> usize {
        Self::Battlefield(predicates.to_vec())
            .resolve(snapshot, state, ctx)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{catalog, CardId};
    use crate::core::Timestamp;
    use crate::zones::Zone;

    fn bear_object(tapped: bool) -> (GameObject, CharacteristicSet) {
        let def = catalog::grizzly_bears(CardId(1));
        let mut obj = GameObject::new(ObjectId(9), CardId(1), PlayerId(0), Zone::Battlefield, Timestamp(1), 1);
        obj.tapped = tapped;
        (obj, CharacteristicSet::printed(&def, PlayerId(0)))
    }

    #[test]
    fn test_type_and_control_predicates() {
        let (obj, chars) = bear_object(false);
        let mine = SelectionContext::new(None, PlayerId(0));
        let theirs = SelectionContext::new(None, PlayerId(1));

        assert!(ObjectPredicate::CardType(CardType::Creature).matches(&obj, &chars, &mine));
        assert!(ObjectPredicate::Subtype(SubType::Bear).matches(&obj, &chars, &mine));
        assert!(ObjectPredicate::ControlledByYou.matches(&obj, &chars, &mine));
        assert!(!ObjectPredicate::ControlledByYou.matches(&obj, &chars, &theirs));
        assert!(ObjectPredicate::ControlledByOpponent.matches(&obj, &chars, &theirs));
    }

    #[test]
    fn test_source_and_status_predicates() {
        let (obj, chars) = bear_object(true);
        let ctx = SelectionContext::new(Some(ObjectId(9)), PlayerId(0));

        assert!(ObjectPredicate::IsSource.matches(&obj, &chars, &ctx));
        assert!(!ObjectPredicate::NotSource.matches(&obj, &chars, &ctx));
        assert!(ObjectPredicate::Tapped.matches(&obj, &chars, &ctx));
        assert!(ObjectPredicate::Untapped.negate().matches(&obj, &chars, &ctx));
    }

    #[test]
    fn test_dynamic_selectors() {
        assert!(Selector::creatures_you_control().is_dynamic());
        assert!(!Selector::Object(ObjectId(1)).is_dynamic());
        assert!(!Selector::Targets.is_dynamic());
    }
}
