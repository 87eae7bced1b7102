//! Card definitions: the read-only card database entries.
//!
//! A `CardDefinition` holds printed characteristics plus the card's abilities
//! already compiled into structured form (effects, target specs, trigger
//! conditions, continuous-effect specs). The kernel never parses rules text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::mana::ManaCost;
use super::types::{CardType, Color, Keyword, SubType, SuperType};
use crate::effects::{Effect, TargetSpec};
use crate::layers::ContinuousEffectSpec;
use crate::triggers::{EventKind, TriggerCondition, TriggerTarget};

/// Identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// What an instant or sorcery does when it resolves.
#[derive(Clone, Debug, Default)]
pub struct SpellAbility {
    pub targets: Vec<TargetSpec>,
    pub effects: Vec<Effect>,
}

/// Costs for activating an ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCost {
    /// {T}: the permanent must be untapped and becomes tapped.
    pub tap: bool,
    pub mana: ManaCost,
}

impl AbilityCost {
    /// A bare {T} cost.
    #[must_use]
    pub fn tap() -> Self {
        Self {
            tap: true,
            mana: ManaCost::zero(),
        }
    }

    #[must_use]
    pub fn mana(mana: ManaCost) -> Self {
        Self { tap: false, mana }
    }
}

/// An activated ability printed on a permanent.
#[derive(Clone, Debug)]
pub struct ActivatedAbility {
    pub name: String,
    pub cost: AbilityCost,
    pub targets: Vec<TargetSpec>,
    pub effects: Vec<Effect>,
    /// Mana abilities resolve immediately and never use the stack.
    pub is_mana_ability: bool,
}

impl ActivatedAbility {
    pub fn new(name: impl Into<String>, cost: AbilityCost) -> Self {
        Self {
            name: name.into(),
            cost,
            targets: Vec::new(),
            effects: Vec::new(),
            is_mana_ability: false,
        }
    }

    #[must_use]
    pub fn with_target(mut self, spec: TargetSpec) -> Self {
        self.targets.push(spec);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn as_mana_ability(mut self) -> Self {
        self.is_mana_ability = true;
        self
    }
}

/// A triggered ability: "When/Whenever/At ..., do ...".
#[derive(Clone, Debug)]
pub struct TriggeredAbility {
    pub name: String,
    /// Event kinds this ability listens for.
    pub events: Vec<EventKind>,
    pub condition: TriggerCondition,
    pub target: Option<TriggerTarget>,
    pub effects: Vec<Effect>,
}

impl TriggeredAbility {
    pub fn new(name: impl Into<String>, event: EventKind) -> Self {
        Self {
            name: name.into(),
            events: vec![event],
            condition: TriggerCondition::Always,
            target: None,
            effects: Vec::new(),
        }
    }

    /// Listen for another event kind too.
    #[must_use]
    pub fn also_on(mut self, event: EventKind) -> Self {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: TriggerCondition) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn targeting(mut self, target: TriggerTarget) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// A static ability generating a continuous effect while its source is on
/// the battlefield.
#[derive(Clone, Debug)]
pub struct StaticAbility {
    pub name: String,
    pub effect: ContinuousEffectSpec,
}

impl StaticAbility {
    pub fn new(name: impl Into<String>, effect: ContinuousEffectSpec) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }
}

/// A card database entry.
#[derive(Clone, Debug)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub mana_cost: Option<ManaCost>,
    /// Color indicator; when empty, colors come from the mana cost.
    pub color_indicator: BTreeSet<Color>,
    pub card_types: BTreeSet<CardType>,
    pub subtypes: BTreeSet<SubType>,
    pub supertypes: BTreeSet<SuperType>,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub keywords: BTreeSet<Keyword>,
    pub spell: SpellAbility,
    pub activated: Vec<ActivatedAbility>,
    pub triggered: Vec<TriggeredAbility>,
    pub statics: Vec<StaticAbility>,
}

impl CardDefinition {
    /// Create a definition with a name and nothing else.
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mana_cost: None,
            color_indicator: BTreeSet::new(),
            card_types: BTreeSet::new(),
            subtypes: BTreeSet::new(),
            supertypes: BTreeSet::new(),
            power: None,
            toughness: None,
            keywords: BTreeSet::new(),
            spell: SpellAbility::default(),
            activated: Vec::new(),
            triggered: Vec::new(),
            statics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = Some(cost);
        self
    }

    #[must_use]
    pub fn with_type(mut self, card_type: CardType) -> Self {
        self.card_types.insert(card_type);
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: SubType) -> Self {
        self.subtypes.insert(subtype);
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: SuperType) -> Self {
        self.supertypes.insert(supertype);
        self
    }

    #[must_use]
    pub fn with_color_indicator(mut self, color: Color) -> Self {
        self.color_indicator.insert(color);
        self
    }

    /// Printed power and toughness.
    #[must_use]
    pub fn with_pt(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_spell_target(mut self, spec: TargetSpec) -> Self {
        self.spell.targets.push(spec);
        self
    }

    #[must_use]
    pub fn with_spell_effect(mut self, effect: Effect) -> Self {
        self.spell.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_activated(mut self, ability: ActivatedAbility) -> Self {
        self.activated.push(ability);
        self
    }

    #[must_use]
    pub fn with_triggered(mut self, ability: TriggeredAbility) -> Self {
        self.triggered.push(ability);
        self
    }

    #[must_use]
    pub fn with_static(mut self, ability: StaticAbility) -> Self {
        self.statics.push(ability);
        self
    }

    #[must_use]
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.card_types.contains(&card_type)
    }

    /// Printed colors: the color indicator if present, else the cost's colors.
    #[must_use]
    pub fn colors(&self) -> BTreeSet<Color> {
        if !self.color_indicator.is_empty() {
            return self.color_indicator.clone();
        }
        self.mana_cost
            .map(|cost| cost.colors().into_iter().collect())
            .unwrap_or_default()
    }

    /// Instants may be cast whenever their controller holds priority.
    #[must_use]
    pub fn has_instant_timing(&self) -> bool {
        self.has_type(CardType::Instant)
    }

    /// Whether this card becomes a permanent when it resolves.
    #[must_use]
    pub fn is_permanent_card(&self) -> bool {
        !self.card_types.is_empty() && self.card_types.iter().all(|t| t.is_permanent())
    }

    /// Whether some ability has an effect reading a target it never chooses.
    #[must_use]
    pub fn has_unchosen_target_reference(&self) -> bool {
        let spell = (self.spell.targets.len(), &self.spell.effects);
        let activated = self.activated.iter().map(|a| (a.targets.len(), &a.effects));
        let triggered = self
            .triggered
            .iter()
            .map(|t| (usize::from(t.target.is_some()), &t.effects));
        std::iter::once(spell)
            .chain(activated)
            .chain(triggered)
            .any(|(chosen, effects)| {
                effects
                    .iter()
                    .flat_map(Effect::target_indices)
                    .any(|index| index >= chosen)
            })
    }
}
