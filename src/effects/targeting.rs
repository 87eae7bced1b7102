//! Targets and target legality.
//!
//! Legality is always checked against a `LayerSnapshot`, so a target that
//! was a creature when chosen but is no longer one at resolution fails the
//! check.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, ObjectId, PlayerId};
use crate::layers::{LayerSnapshot, ObjectPredicate, SelectionContext};
use crate::stack::{StackItemId, StackItemKind};
use crate::cards::CardType;
use crate::zones::Zone;

/// A chosen target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Object(ObjectId),
    Player(PlayerId),
    StackItem(StackItemId),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Object(id) => write!(f, "{}", id),
            Target::Player(p) => write!(f, "{}", p),
            Target::StackItem(item) => write!(f, "{}", item),
        }
    }
}

/// What kind of thing a target spec accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Creature,
    Permanent,
    Player,
    Opponent,
    /// A creature, planeswalker or player.
    AnyTarget,
    Spell,
}

/// "Target creature you control" and the like.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub kind: TargetKind,
    /// Extra object predicates; ignored for player targets.
    pub filters: Vec<ObjectPredicate>,
}

impl TargetSpec {
    #[must_use]
    pub fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn creature() -> Self {
        Self::new(TargetKind::Creature)
    }

    #[must_use]
    pub fn permanent() -> Self {
        Self::new(TargetKind::Permanent)
    }

    #[must_use]
    pub fn player() -> Self {
        Self::new(TargetKind::Player)
    }

    #[must_use]
    pub fn opponent() -> Self {
        Self::new(TargetKind::Opponent)
    }

    #[must_use]
    pub fn any_target() -> Self {
        Self::new(TargetKind::AnyTarget)
    }

    #[must_use]
    pub fn spell() -> Self {
        Self::new(TargetKind::Spell)
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ObjectPredicate) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check `target`, returning why it is illegal.
    pub fn check(
        &self,
        target: Target,
        state: &GameState,
        snapshot: &LayerSnapshot,
        ctx: &SelectionContext,
    ) -> Result<(), &'static str> {
        match (self.kind, target) {
            (TargetKind::Player | TargetKind::AnyTarget, Target::Player(p)) => {
                if state.is_alive(p) {
                    Ok(())
                } else {
                    Err("player is no longer in the game")
                }
            }
            (TargetKind::Opponent, Target::Player(p)) => {
                if !state.is_alive(p) {
                    Err("player is no longer in the game")
                } else if p == ctx.controller {
                    Err("not an opponent")
                } else {
                    Ok(())
                }
            }
            (
                TargetKind::Creature | TargetKind::Permanent | TargetKind::AnyTarget,
                Target::Object(id),
            ) => {
                if !state.zones.is_in(id, Zone::Battlefield) {
                    return Err("not on the battlefield");
                }
                let (Some(object), Some(chars)) = (state.object(id), snapshot.get(id)) else {
                    return Err("object no longer exists");
                };
                let kind_ok = match self.kind {
                    TargetKind::Creature => chars.is_creature(),
                    TargetKind::AnyTarget => {
                        chars.is_creature() || chars.has_type(CardType::Planeswalker)
                    }
                    _ => true,
                };
                if !kind_ok {
                    return Err("wrong card type");
                }
                if ObjectPredicate::all_match(&self.filters, object, chars, ctx) {
                    Ok(())
                } else {
                    Err("does not match target restrictions")
                }
            }
            (TargetKind::Spell, Target::StackItem(item_id)) => {
                let Some(item) = state.stack.get(item_id) else {
                    return Err("not on the stack");
                };
                let StackItemKind::Spell { .. } = item.kind else {
                    return Err("not a spell");
                };
                match (state.object(item.source), snapshot.get(item.source)) {
                    (Some(object), Some(chars))
                        if ObjectPredicate::all_match(&self.filters, object, chars, ctx) =>
                    {
                        Ok(())
                    }
                    (Some(_), Some(_)) => Err("does not match target restrictions"),
                    _ => Err("spell object missing"),
                }
            }
            _ => Err("wrong kind of target"),
        }
    }

    #[must_use]
    pub fn is_legal(
        &self,
        target: Target,
        state: &GameState,
        snapshot: &LayerSnapshot,
        ctx: &SelectionContext,
    ) -> bool {
        self.check(target, state, snapshot, ctx).is_ok()
    }

    /// Every legal choice for this spec.
    #[must_use]
    pub fn legal_targets(
        &self,
        state: &GameState,
        snapshot: &LayerSnapshot,
        ctx: &SelectionContext,
    ) -> Vec<Target> {
        let players = state.living_players().into_iter().map(Target::Player);
        let permanents = state.zones.battlefield().iter().copied().map(Target::Object);
        let spells = state.stack.iter().map(|item| Target::StackItem(item.id));

        let candidates: Vec<Target> = match self.kind {
            TargetKind::Player | TargetKind::Opponent => players.collect(),
            TargetKind::Creature | TargetKind::Permanent => permanents.collect(),
            TargetKind::AnyTarget => permanents.chain(players).collect(),
            TargetKind::Spell => spells.collect(),
        };
        candidates
            .into_iter()
            .filter(|t| self.is_legal(*t, state, snapshot, ctx))
            .collect()
    }
}
