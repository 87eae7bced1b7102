//! Continuous effects and the layer they apply in.
//!
//! A `ContinuousEffect` is one modification applied to a selected set of
//! objects for some duration. Static abilities create them when their
//! source enters the battlefield; resolving spells and abilities create them
//! through `Effect::CreateContinuous`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::characteristics::CharacteristicSet;
use super::engine::LayerSnapshot;
use super::selector::{ObjectPredicate, SelectionContext, Selector};
use crate::cards::{CardId, CardType, Color, Keyword, SubType};
use crate::core::{GameState, ObjectId, PlayerId, Timestamp};
use crate::zones::Zone;

/// Unique identifier for an active continuous effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// The seven layers, in application order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Copy,
    Control,
    Text,
    Type,
    Color,
    Ability,
    PowerToughness,
}

/// Sub-layers of the power/toughness layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PtSublayer {
    /// Characteristic-defining abilities.
    Cda,
    /// Effects that set power and/or toughness to a value.
    Set,
    /// Effects and counters that add to or subtract from P/T.
    Modify,
    /// Effects that switch power and toughness.
    Switch,
}

/// One slot in the evaluation schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerSlot {
    Layer(Layer),
    Pt(PtSublayer),
}

impl LayerSlot {
    #[must_use]
    pub fn layer(self) -> Layer {
        match self {
            LayerSlot::Layer(layer) => layer,
            LayerSlot::Pt(_) => Layer::PowerToughness,
        }
    }
}

/// Order of the set and modify sub-layers.
///
/// `SetOverridesModify` applies modifications before setting effects, so a
/// later "power becomes 0" wins over an earlier "+2/+0". `ComprehensiveRules`
/// is the printed rules order (set, then modify).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PtSublayerOrder {
    #[default]
    SetOverridesModify,
    ComprehensiveRules,
}

impl PtSublayerOrder {
    /// Every slot the engine visits, in order.
    #[must_use]
    pub fn slots(self) -> [LayerSlot; 10] {
        let (first, second) = match self {
            PtSublayerOrder::SetOverridesModify => (PtSublayer::Modify, PtSublayer::Set),
            PtSublayerOrder::ComprehensiveRules => (PtSublayer::Set, PtSublayer::Modify),
        };
        [
            LayerSlot::Layer(Layer::Copy),
            LayerSlot::Layer(Layer::Control),
            LayerSlot::Layer(Layer::Text),
            LayerSlot::Layer(Layer::Type),
            LayerSlot::Layer(Layer::Color),
            LayerSlot::Layer(Layer::Ability),
            LayerSlot::Pt(PtSublayer::Cda),
            LayerSlot::Pt(first),
            LayerSlot::Pt(second),
            LayerSlot::Pt(PtSublayer::Switch),
        ]
    }
}

/// A number that may depend on the game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    Fixed(i32),
    /// `per` for each permanent matching all predicates.
    CountOf {
        predicates: Vec<ObjectPredicate>,
        per: i32,
    },
}

impl Amount {
    #[must_use]
    pub fn count_of(predicates: impl IntoIterator<Item = ObjectPredicate>) -> Self {
        Amount::CountOf {
            predicates: predicates.into_iter().collect(),
            per: 1,
        }
    }

    /// Evaluate against a partially computed snapshot.
    #[must_use]
    pub fn evaluate(
        &self,
        snapshot: &LayerSnapshot,
        state: &GameState,
        ctx: &SelectionContext,
    ) -> i32 {
        match self {
            Amount::Fixed(n) => *n,
            Amount::CountOf { predicates, per } => {
                let count = Selector::count(predicates, snapshot, state, ctx);
                i32::try_from(count).unwrap_or(i32::MAX).saturating_mul(*per)
            }
        }
    }
}

impl From<i32> for Amount {
    fn from(n: i32) -> Self {
        Amount::Fixed(n)
    }
}

/// What a continuous effect does to each affected object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modification {
    /// Become a copy of another object.
    CopyOf(ObjectId),
    SetController(PlayerId),
    /// Text-changing: replace one subtype word with another.
    ReplaceSubtype { from: SubType, to: SubType },
    AddCardType(CardType),
    RemoveCardType(CardType),
    AddSubtype(SubType),
    /// Replace all subtypes.
    SetSubtypes(Vec<SubType>),
    AddColor(Color),
    SetColors(Vec<Color>),
    AddKeyword(Keyword),
    RemoveKeyword(Keyword),
    RemoveAllAbilities,
    SetPt {
        power: Option<Amount>,
        toughness: Option<Amount>,
    },
    ModifyPt { power: Amount, toughness: Amount },
    SwitchPt,
}

impl Modification {
    /// Fixed "+N/+M".
    #[must_use]
    pub fn pump(power: i32, toughness: i32) -> Self {
        Modification::ModifyPt {
            power: Amount::Fixed(power),
            toughness: Amount::Fixed(toughness),
        }
    }

    /// Fixed "has base power P and toughness T".
    #[must_use]
    pub fn set_pt(power: i32, toughness: i32) -> Self {
        Modification::SetPt {
            power: Some(Amount::Fixed(power)),
            toughness: Some(Amount::Fixed(toughness)),
        }
    }

    #[must_use]
    pub fn set_power(power: i32) -> Self {
        Modification::SetPt {
            power: Some(Amount::Fixed(power)),
            toughness: None,
        }
    }

    /// Slot this modification applies in.
    #[must_use]
    pub fn slot(&self, is_cda: bool) -> LayerSlot {
        match self {
            Modification::CopyOf(_) => LayerSlot::Layer(Layer::Copy),
            Modification::SetController(_) => LayerSlot::Layer(Layer::Control),
            Modification::ReplaceSubtype { .. } => LayerSlot::Layer(Layer::Text),
            Modification::AddCardType(_)
            | Modification::RemoveCardType(_)
            | Modification::AddSubtype(_)
            | Modification::SetSubtypes(_) => LayerSlot::Layer(Layer::Type),
            Modification::AddColor(_) | Modification::SetColors(_) => {
                LayerSlot::Layer(Layer::Color)
            }
            Modification::AddKeyword(_)
            | Modification::RemoveKeyword(_)
            | Modification::RemoveAllAbilities => LayerSlot::Layer(Layer::Ability),
            Modification::SetPt { .. } if is_cda => LayerSlot::Pt(PtSublayer::Cda),
            Modification::SetPt { .. } => LayerSlot::Pt(PtSublayer::Set),
            Modification::ModifyPt { .. } => LayerSlot::Pt(PtSublayer::Modify),
            Modification::SwitchPt => LayerSlot::Pt(PtSublayer::Switch),
        }
    }

    /// Resolve every state-dependent input against `snapshot`.
    #[must_use]
    pub fn evaluate(
        &self,
        snapshot: &LayerSnapshot,
        state: &GameState,
        ctx: &SelectionContext,
    ) -> Evaluation {
        let mut eval = Evaluation::default();
        match self {
            Modification::CopyOf(original) => {
                eval.copied = snapshot.get(*original).cloned().map(Box::new);
            }
            Modification::SetPt { power, toughness } => {
                for amount in [power, toughness] {
                    if let Some(amount) = amount {
                        eval.amounts.push(Some(amount.evaluate(snapshot, state, ctx)));
                    } else {
                        eval.amounts.push(None);
                    }
                }
            }
            Modification::ModifyPt { power, toughness } => {
                eval.amounts.push(Some(power.evaluate(snapshot, state, ctx)));
                eval.amounts.push(Some(toughness.evaluate(snapshot, state, ctx)));
            }
            _ => {}
        }
        eval
    }

    /// Apply to one object's running characteristics.
    pub fn apply(&self, chars: &mut CharacteristicSet, eval: &Evaluation) {
        match self {
            Modification::CopyOf(_) => {
                if let Some(copied) = &eval.copied {
                    chars.copy_from(copied);
                }
            }
            Modification::SetController(player) => chars.controller = *player,
            Modification::ReplaceSubtype { from, to } => {
                if chars.subtypes.remove(from) {
                    chars.subtypes.insert(*to);
                }
            }
            Modification::AddCardType(t) => {
                chars.card_types.insert(*t);
            }
            Modification::RemoveCardType(t) => {
                chars.card_types.remove(t);
            }
            Modification::AddSubtype(s) => {
                chars.subtypes.insert(*s);
            }
            Modification::SetSubtypes(subtypes) => {
                chars.subtypes = subtypes.iter().copied().collect();
            }
            Modification::AddColor(c) => {
                chars.colors.insert(*c);
            }
            Modification::SetColors(colors) => {
                chars.colors = colors.iter().copied().collect();
            }
            Modification::AddKeyword(k) => {
                chars.keywords.insert(*k);
            }
            Modification::RemoveKeyword(k) => {
                chars.keywords.remove(k);
            }
            Modification::RemoveAllAbilities => {
                chars.keywords.clear();
                chars.abilities_intact = false;
            }
            Modification::SetPt { .. } => {
                if let Some(Some(power)) = eval.amounts.first() {
                    chars.power = Some(*power);
                }
                if let Some(Some(toughness)) = eval.amounts.get(1) {
                    chars.toughness = Some(*toughness);
                }
            }
            Modification::ModifyPt { .. } => {
                let delta = |i: usize| eval.amounts.get(i).copied().flatten().unwrap_or(0);
                if let Some(power) = chars.power.as_mut() {
                    *power = power.saturating_add(delta(0));
                }
                if let Some(toughness) = chars.toughness.as_mut() {
                    *toughness = toughness.saturating_add(delta(1));
                }
            }
            Modification::SwitchPt => {
                if let (Some(p), Some(t)) = (chars.power, chars.toughness) {
                    chars.power = Some(t);
                    chars.toughness = Some(p);
                }
            }
        }
    }
}

/// State-dependent inputs of a modification, evaluated once per application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub amounts: SmallVec<[Option<i32>; 2]>,
    pub copied: Option<Box<CharacteristicSet>>,
}

/// A condition on the game state that keeps a `While` effect alive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCondition {
    SourceOnBattlefield,
    SourceUntapped,
    ControllerLifeAtMost(i32),
    ControllerIsActive,
}

impl EffectCondition {
    /// Checked without characteristics, so it never recurses into layers.
    #[must_use]
    pub fn holds(&self, effect: &ContinuousEffect, state: &GameState) -> bool {
        match self {
            EffectCondition::SourceOnBattlefield => effect.source_on_battlefield(state),
            EffectCondition::SourceUntapped => {
                effect.source_on_battlefield(state)
                    && effect
                        .source
                        .and_then(|id| state.object(id))
                        .is_some_and(|o| !o.tapped)
            }
            EffectCondition::ControllerLifeAtMost(n) => state
                .players
                .try_get(effect.controller)
                .is_some_and(|p| p.life <= *n),
            EffectCondition::ControllerIsActive => state.turn.active_player == effect.controller,
        }
    }
}

/// How long an effect lasts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    /// Ends in the cleanup step. Outlives its source.
    UntilEndOfTurn,
    /// Static abilities: ends when the source leaves the battlefield.
    WhileSourceOnBattlefield,
    /// An effect from a resolved spell or ability ends the first time the
    /// condition is found false. A static ability's effect is only inactive
    /// while it is false.
    While(EffectCondition),
    /// Never ends on its own. Outlives its source.
    #[default]
    Indefinite,
}

/// Where an effect came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOrigin {
    /// A static ability printed on `card`, at `index` in its statics.
    Static { card: CardId, index: usize },
    /// A resolving spell or ability.
    Resolution,
}

/// A continuous effect as written on a card, before it exists in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousEffectSpec {
    pub selector: Selector,
    pub modification: Modification,
    pub is_cda: bool,
    pub duration: Duration,
}

impl ContinuousEffectSpec {
    #[must_use]
    pub fn new(selector: Selector, modification: Modification) -> Self {
        Self {
            selector,
            modification,
            is_cda: false,
            duration: Duration::Indefinite,
        }
    }

    #[must_use]
    pub fn until_end_of_turn(mut self) -> Self {
        self.duration = Duration::UntilEndOfTurn;
        self
    }

    #[must_use]
    pub fn while_source_on_battlefield(mut self) -> Self {
        self.duration = Duration::WhileSourceOnBattlefield;
        self
    }

    #[must_use]
    pub fn while_condition(mut self, condition: EffectCondition) -> Self {
        self.duration = Duration::While(condition);
        self
    }

    /// Mark as a characteristic-defining ability.
    #[must_use]
    pub fn as_cda(mut self) -> Self {
        self.is_cda = true;
        self
    }
}

/// An effect active in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousEffect {
    pub id: EffectId,
    /// Weak reference; the source may be gone.
    pub source: Option<ObjectId>,
    pub controller: PlayerId,
    pub selector: Selector,
    pub modification: Modification,
    pub is_cda: bool,
    pub duration: Duration,
    pub timestamp: Timestamp,
    pub origin: EffectOrigin,
}

impl ContinuousEffect {
    #[must_use]
    pub fn slot(&self) -> LayerSlot {
        self.modification.slot(self.is_cda)
    }

    #[must_use]
    pub fn selection_context(&self) -> SelectionContext {
        SelectionContext::new(self.source, self.controller)
    }

    #[must_use]
    pub fn source_on_battlefield(&self, state: &GameState) -> bool {
        self.source
            .is_some_and(|id| state.zones.is_in(id, Zone::Battlefield))
    }

    /// Whether the duration still holds in `state`.
    #[must_use]
    pub fn is_current(&self, state: &GameState) -> bool {
        match &self.duration {
            Duration::UntilEndOfTurn | Duration::Indefinite => true,
            Duration::WhileSourceOnBattlefield => self.source_on_battlefield(state),
            Duration::While(condition) => condition.holds(self, state),
        }
    }

    /// Whether the effect has ended for good and can be removed.
    #[must_use]
    pub fn has_expired(&self, state: &GameState) -> bool {
        match (&self.duration, self.origin) {
            (Duration::While(_), EffectOrigin::Static { .. }) => false,
            _ => !self.is_current(state),
        }
    }

    /// Whether the effect exists at this point of layer evaluation.
    ///
    /// A static ability's effect stops existing once its source loses the
    /// ability, either by losing all abilities or by becoming a copy of a
    /// different card.
    #[must_use]
    pub fn exists_in(&self, snapshot: &LayerSnapshot) -> bool {
        match self.origin {
            EffectOrigin::Resolution => true,
            EffectOrigin::Static { card, .. } => self
                .source
                .and_then(|id| snapshot.get(id))
                .is_some_and(|chars| chars.abilities_intact && chars.ability_source == card),
        }
    }
}

/// The active-effect set owned by the game state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectSet {
    effects: Vec<ContinuousEffect>,
    next_id: u32,
}

impl EffectSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect from `spec`.
    pub fn add(
        &mut self,
        spec: ContinuousEffectSpec,
        source: Option<ObjectId>,
        controller: PlayerId,
        timestamp: Timestamp,
        origin: EffectOrigin,
    ) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects.push(ContinuousEffect {
            id,
            source,
            controller,
            selector: spec.selector,
            modification: spec.modification,
            is_cda: spec.is_cda,
            duration: spec.duration,
            timestamp,
            origin,
        });
        id
    }

    pub fn remove(&mut self, id: EffectId) -> Option<ContinuousEffect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&ContinuousEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Effects in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ContinuousEffect> {
        self.effects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Remove every effect matching `predicate`, returning their ids.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&ContinuousEffect) -> bool) -> Vec<EffectId> {
        let mut removed = Vec::new();
        self.effects.retain(|e| {
            if predicate(e) {
                removed.push(e.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Cleanup step: end "until end of turn" effects.
    pub fn expire_end_of_turn(&mut self) -> Vec<EffectId> {
        self.remove_where(|e| e.duration == Duration::UntilEndOfTurn)
    }

    /// Static-ability effects generated by `source`.
    pub fn remove_statics_of(&mut self, source: ObjectId) -> Vec<EffectId> {
        self.remove_where(|e| {
            e.source == Some(source) && matches!(e.origin, EffectOrigin::Static { .. })
        })
    }
}
