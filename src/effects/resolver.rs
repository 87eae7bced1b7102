//! Effect resolution: applying one-shot effects to the game state.

use tracing::{debug, trace};

use super::effect::{Effect, EffectContext, EffectTarget};
use super::targeting::Target;
use crate::cards::Keyword;
use crate::core::{GameState, ObjectId, PlayerId, Result};
use crate::layers::{compute_all, ContinuousEffectSpec, Selector};
use crate::triggers::GameEvent;
use crate::zones::{Zone, ZonePosition};

fn gain_life(life: &mut i32, amount: u32) {
    *life = life.saturating_add(i32::try_from(amount).unwrap_or(i32::MAX));
}

fn lose_life(life: &mut i32, amount: u32) {
    *life = life.saturating_sub(i32::try_from(amount).unwrap_or(i32::MAX));
}

/// Applies effects in order.
pub struct EffectResolver;

impl EffectResolver {
    /// Apply every effect of a resolving spell or ability.
    pub fn apply_all(state: &mut GameState, effects: &[Effect], ctx: &EffectContext) -> Result<()> {
        for effect in effects {
            if state.is_game_over() {
                break;
            }
            Self::apply(state, effect, ctx)?;
        }
        Ok(())
    }

    /// Apply a single effect.
    pub fn apply(state: &mut GameState, effect: &Effect, ctx: &EffectContext) -> Result<()> {
        trace!(?effect, "applying effect");
        match effect {
            Effect::DealDamage { amount, to } => {
                for target in Self::recipients(state, *to, ctx) {
                    Self::deal_damage(state, ctx.source, target, *amount)?;
                }
            }
            Effect::GainLife { amount, who } => {
                for player in Self::players(state, *who, ctx) {
                    gain_life(&mut state.players[player].life, *amount);
                    state.emit(GameEvent::LifeGained {
                        player,
                        amount: *amount,
                    })?;
                }
            }
            Effect::LoseLife { amount, who } => {
                for player in Self::players(state, *who, ctx) {
                    lose_life(&mut state.players[player].life, *amount);
                    state.emit(GameEvent::LifeLost {
                        player,
                        amount: *amount,
                    })?;
                }
            }
            Effect::DrawCards { count, who } => {
                for player in Self::players(state, *who, ctx) {
                    for _ in 0..*count {
                        state.draw_card(player)?;
                    }
                }
            }
            Effect::Destroy(who) => {
                for id in Self::permanents(state, *who, ctx) {
                    if state.characteristics_of(id)?.has_keyword(Keyword::Indestructible) {
                        debug!(object = %id, "indestructible, not destroyed");
                        continue;
                    }
                    state.put_into_graveyard(id)?;
                }
            }
            Effect::Exile(who) => {
                for id in Self::permanents(state, *who, ctx) {
                    state.move_object(id, Zone::Exile, ZonePosition::Top)?;
                }
            }
            Effect::ReturnToHand(who) => {
                for id in Self::permanents(state, *who, ctx) {
                    let owner = state.try_object(id)?.owner;
                    state.move_object(id, Zone::Hand(owner), ZonePosition::Top)?;
                }
            }
            Effect::AddCounters {
                counter,
                amount,
                to,
            } => {
                for id in Self::permanents(state, *to, ctx) {
                    if let Some(object) = state.object_mut(id) {
                        object.add_counters(*counter, *amount);
                    }
                    state.emit(GameEvent::CountersAdded {
                        object: id,
                        counter: *counter,
                        amount: *amount,
                    })?;
                }
            }
            Effect::Tap(who) => {
                for id in Self::permanents(state, *who, ctx) {
                    if let Some(object) = state.object_mut(id) {
                        object.tapped = true;
                    }
                }
            }
            Effect::Untap(who) => {
                for id in Self::permanents(state, *who, ctx) {
                    if let Some(object) = state.object_mut(id) {
                        object.tapped = false;
                    }
                }
            }
            Effect::AddMana { mana, amount } => {
                state.players[ctx.controller].mana_pool.add(*mana, *amount);
            }
            Effect::CreateTokens { card, amount } => {
                for _ in 0..*amount {
                    state.create_token(*card, ctx.controller)?;
                }
            }
            Effect::CreateContinuous(spec) => {
                let locked = Self::lock_selector(state, spec, ctx)?;
                state.add_continuous_effect(locked, ctx.source, ctx.controller);
            }
            Effect::CounterTarget(index) => {
                if let Some(Some(Target::StackItem(item))) = ctx.targets.get(*index) {
                    crate::stack::counter_item(state, *item)?;
                }
            }
            Effect::Custom(custom) => {
                debug!(name = %custom.name, "custom effect");
                (custom.apply)(state, ctx)?;
            }
        }
        Ok(())
    }

    fn deal_damage(
        state: &mut GameState,
        source: Option<ObjectId>,
        target: Target,
        amount: u32,
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let source_chars = match source {
            Some(id) if state.zones.contains(id) => Some(state.characteristics_of(id)?),
            _ => None,
        };
        let deathtouch = source_chars
            .as_ref()
            .is_some_and(|c| c.has_keyword(Keyword::Deathtouch));

        match target {
            Target::Player(player) => {
                lose_life(&mut state.players[player].life, amount);
                state.emit(GameEvent::DamageDealt {
                    source,
                    target,
                    amount,
                })?;
                state.emit(GameEvent::LifeLost { player, amount })?;
            }
            Target::Object(id) => {
                let Some(object) = state.object_mut(id) else {
                    return Ok(());
                };
                object.damage = object.damage.saturating_add(amount);
                object.damaged_by_deathtouch |= deathtouch;
                state.emit(GameEvent::DamageDealt {
                    source,
                    target,
                    amount,
                })?;
            }
            Target::StackItem(_) => return Ok(()),
        }

        if let Some(chars) = source_chars {
            if chars.has_keyword(Keyword::Lifelink) {
                gain_life(&mut state.players[chars.controller].life, amount);
                state.emit(GameEvent::LifeGained {
                    player: chars.controller,
                    amount,
                })?;
            }
        }
        Ok(())
    }

    /// Spell-created effects affect a fixed set of objects.
    fn lock_selector(
        state: &GameState,
        spec: &ContinuousEffectSpec,
        ctx: &EffectContext,
    ) -> Result<ContinuousEffectSpec> {
        let mut locked = spec.clone();
        locked.selector = match &spec.selector {
            Selector::Targets => Selector::Objects(
                ctx.legal_targets()
                    .filter_map(|t| match t {
                        Target::Object(id) => Some(id),
                        _ => None,
                    })
                    .collect(),
            ),
            selector @ Selector::Battlefield(_) => {
                let snapshot = compute_all(state)?;
                let selection = crate::layers::SelectionContext::new(ctx.source, ctx.controller);
                Selector::Objects(selector.resolve(&snapshot, state, &selection))
            }
            other => other.clone(),
        };
        Ok(locked)
    }

    fn recipients(state: &GameState, who: EffectTarget, ctx: &EffectContext) -> Vec<Target> {
        match who {
            EffectTarget::Target(i) => ctx.targets.get(i).copied().flatten().into_iter().collect(),
            EffectTarget::Source => ctx.source.map(Target::Object).into_iter().collect(),
            other => Self::players(state, other, ctx)
                .into_iter()
                .map(Target::Player)
                .collect(),
        }
    }

    fn players(state: &GameState, who: EffectTarget, ctx: &EffectContext) -> Vec<PlayerId> {
        match who {
            EffectTarget::You => vec![ctx.controller],
            EffectTarget::EachPlayer => state.living_players(),
            EffectTarget::EachOpponent => state
                .living_players()
                .into_iter()
                .filter(|&p| p != ctx.controller)
                .collect(),
            EffectTarget::Target(_) => Self::recipients(state, who, ctx)
                .into_iter()
                .filter_map(|t| match t {
                    Target::Player(p) => Some(p),
                    _ => None,
                })
                .collect(),
            EffectTarget::Source => Vec::new(),
        }
    }

    /// Permanents on the battlefield the effect acts on.
    fn permanents(state: &GameState, who: EffectTarget, ctx: &EffectContext) -> Vec<ObjectId> {
        Self::recipients(state, who, ctx)
            .into_iter()
            .filter_map(|t| match t {
                Target::Object(id) if state.zones.is_in(id, Zone::Battlefield) => Some(id),
                _ => None,
            })
            .collect()
    }
}
