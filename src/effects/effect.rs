//! One-shot effects produced by resolving spells and abilities.
//!
//! Effects form a closed set of tagged variants plus `Custom`, which
//! carries an opaque generator for anything the closed set does not cover.
//! Each effect names who or what it acts on through an `EffectTarget`,
//! usually one of the chosen targets by index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::targeting::Target;
use crate::cards::{CardId, CounterType, ManaType};
use crate::core::{GameState, ObjectId, PlayerId, Result};
use crate::layers::ContinuousEffectSpec;

/// Who or what an effect acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    /// The chosen target at this index.
    Target(usize),
    /// The controller of the resolving spell or ability.
    You,
    /// The source object.
    Source,
    EachPlayer,
    EachOpponent,
}

/// Context of a resolving spell or ability.
///
/// `targets` is in target-spec order. A target that became illegal before
/// resolution is `None`, and effects that refer to it do nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub source: Option<ObjectId>,
    pub controller: PlayerId,
    pub targets: Vec<Option<Target>>,
}

impl EffectContext {
    #[must_use]
    pub fn new(source: Option<ObjectId>, controller: PlayerId) -> Self {
        Self {
            source,
            controller,
            targets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Option<Target>>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    /// Legal targets still standing.
    pub fn legal_targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.targets.iter().flatten().copied()
    }
}

/// Opaque effect generator.
pub type CustomFn = dyn Fn(&mut GameState, &EffectContext) -> Result<()> + Send + Sync;

/// A named custom effect.
#[derive(Clone)]
pub struct CustomEffect {
    pub name: String,
    pub apply: Arc<CustomFn>,
}

impl CustomEffect {
    pub fn new(
        name: impl Into<String>,
        apply: impl Fn(&mut GameState, &EffectContext) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            apply: Arc::new(apply),
        }
    }
}

impl std::fmt::Debug for CustomEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomEffect")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An atomic one-shot effect.
#[derive(Clone, Debug)]
pub enum Effect {
    DealDamage { amount: u32, to: EffectTarget },
    GainLife { amount: u32, who: EffectTarget },
    LoseLife { amount: u32, who: EffectTarget },
    DrawCards { count: u32, who: EffectTarget },
    /// Indestructible permanents survive.
    Destroy(EffectTarget),
    Exile(EffectTarget),
    ReturnToHand(EffectTarget),
    AddCounters {
        counter: CounterType,
        amount: u32,
        to: EffectTarget,
    },
    Tap(EffectTarget),
    Untap(EffectTarget),
    /// Add mana to the controller's pool.
    AddMana { mana: ManaType, amount: u32 },
    /// Create `amount` tokens of `card` under the controller.
    CreateTokens { card: CardId, amount: u32 },
    /// Create a continuous effect. `Targets` and battlefield selectors are
    /// locked to the objects they match at resolution.
    CreateContinuous(ContinuousEffectSpec),
    /// Counter the target spell or ability.
    CounterTarget(usize),
    Custom(CustomEffect),
}

impl Effect {
    /// "Deal N damage to the first target."
    #[must_use]
    pub fn damage_target(amount: u32) -> Self {
        Effect::DealDamage {
            amount,
            to: EffectTarget::Target(0),
        }
    }

    #[must_use]
    pub fn draw(count: u32) -> Self {
        Effect::DrawCards {
            count,
            who: EffectTarget::You,
        }
    }

    #[must_use]
    pub fn gain_life(amount: u32) -> Self {
        Effect::GainLife {
            amount,
            who: EffectTarget::You,
        }
    }

    #[must_use]
    pub fn destroy_target() -> Self {
        Effect::Destroy(EffectTarget::Target(0))
    }

    #[must_use]
    pub fn create_token(card: CardId) -> Self {
        Effect::CreateTokens { card, amount: 1 }
    }

    #[must_use]
    pub fn add_mana(mana: ManaType) -> Self {
        Effect::AddMana { mana, amount: 1 }
    }

    pub fn custom(
        name: impl Into<String>,
        apply: impl Fn(&mut GameState, &EffectContext) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Effect::Custom(CustomEffect::new(name, apply))
    }

    /// Indices of chosen targets this effect reads.
    #[must_use]
    pub fn target_indices(&self) -> Vec<usize> {
        let recipient = match self {
            Effect::DealDamage { to, .. } | Effect::AddCounters { to, .. } => Some(*to),
            Effect::GainLife { who, .. }
            | Effect::LoseLife { who, .. }
            | Effect::DrawCards { who, .. } => Some(*who),
            Effect::Destroy(t)
            | Effect::Exile(t)
            | Effect::ReturnToHand(t)
            | Effect::Tap(t)
            | Effect::Untap(t) => Some(*t),
            Effect::CounterTarget(i) => return vec![*i],
            _ => None,
        };
        match recipient {
            Some(EffectTarget::Target(i)) => vec![i],
            _ => Vec::new(),
        }
    }
}
