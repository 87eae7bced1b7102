//! The standard rules engine.
//!
//! Every action is turned into a `Plan` first. Building the plan checks
//! priority, zone, timing, costs and targets against the current state
//! without changing it; only an accepted plan is carried out. Legal action
//! enumeration reuses the same check on every candidate.

use tracing::{error, info, warn};

use super::engine::{ActionReport, RulesEngine};
use crate::cards::{CardId, ManaCost, ManaType};
use crate::core::{
    ActionRecord, GameState, IllegalAction, ObjectId, PlayerAction, PlayerId, Result,
};
use crate::effects::{Effect, EffectContext, EffectResolver, Target, TargetSpec};
use crate::layers::{compute_all, LayerSnapshot, SelectionContext};
use crate::stack::{validate_targets, StackItem, StackItemKind};
use crate::triggers::GameEvent;
use crate::turn::{after_action, can_tap_for_ability, pass_priority};
use crate::zones::{Zone, ZoneKind, ZonePosition};

/// A validated action, ready to perform.
#[derive(Clone, Debug)]
enum Plan {
    Pass,
    PlayLand {
        card: ObjectId,
    },
    Cast {
        card: ObjectId,
        definition: CardId,
        cost: ManaCost,
        specs: Vec<TargetSpec>,
        targets: Vec<Target>,
        effects: Vec<Effect>,
    },
    Activate {
        source: ObjectId,
        index: usize,
        tap: bool,
        cost: ManaCost,
        specs: Vec<TargetSpec>,
        targets: Vec<Target>,
        effects: Vec<Effect>,
        mana_ability: bool,
    },
    IntrinsicMana {
        source: ObjectId,
        mana: ManaType,
    },
}

/// The kernel's rules engine for ordinary two-or-more player matches.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl StandardRules {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn plan(&self, state: &GameState, player: PlayerId, action: &PlayerAction) -> Result<Plan> {
        if state.is_game_over() {
            return Err(IllegalAction::GameOver.into());
        }
        if !state.turn.holds_priority(player) {
            return Err(IllegalAction::NotPriorityHolder {
                player,
                holder: state.turn.priority,
            }
            .into());
        }

        match action {
            PlayerAction::PassPriority => Ok(Plan::Pass),
            PlayerAction::PlayLand { card } => self.plan_land(state, player, *card),
            PlayerAction::CastSpell { card, targets } => {
                self.plan_cast(state, player, *card, targets)
            }
            PlayerAction::ActivateAbility {
                source,
                index,
                targets,
            } => self.plan_activate(state, player, *source, *index, targets),
            PlayerAction::ActivateManaAbility { source } => {
                self.plan_mana(state, player, *source)
            }
        }
    }

    fn plan_land(&self, state: &GameState, player: PlayerId, card: ObjectId) -> Result<Plan> {
        require_zone(state, card, Zone::Hand(player), ZoneKind::Hand)?;
        if !state.characteristics_of(card)?.is_land() {
            return Err(IllegalAction::WrongCardType {
                object: card,
                reason: "not a land",
            }
            .into());
        }
        if !state.turn.sorcery_timing(player, state.stack.is_empty()) {
            return Err(IllegalAction::WrongTiming(
                "lands are played in your main phase with an empty stack",
            )
            .into());
        }
        if state.players[player].lands_played_this_turn >= 1 {
            return Err(IllegalAction::LandAlreadyPlayed { player }.into());
        }
        Ok(Plan::PlayLand { card })
    }

    fn plan_cast(
        &self,
        state: &GameState,
        player: PlayerId,
        card: ObjectId,
        targets: &[Target],
    ) -> Result<Plan> {
        require_zone(state, card, Zone::Hand(player), ZoneKind::Hand)?;
        let chars = state.characteristics_of(card)?;
        if chars.is_land() {
            return Err(IllegalAction::WrongCardType {
                object: card,
                reason: "lands are played, not cast",
            }
            .into());
        }
        let definition = state.definition(state.try_object(card)?.card)?;
        let instant = definition.has_instant_timing();
        if !instant && !state.turn.sorcery_timing(player, state.stack.is_empty()) {
            return Err(IllegalAction::WrongTiming(
                "only instants may be cast outside your main phase or onto a non-empty stack",
            )
            .into());
        }
        let cost = chars.mana_cost.unwrap_or_else(ManaCost::zero);
        if !state.players[player].mana_pool.can_pay(&cost) {
            return Err(IllegalAction::CannotPayCost { cost }.into());
        }
        validate_targets(state, &definition.spell.targets, targets, Some(card), player)?;

        Ok(Plan::Cast {
            card,
            definition: definition.id,
            cost,
            specs: definition.spell.targets.clone(),
            targets: targets.to_vec(),
            effects: definition.spell.effects.clone(),
        })
    }

    fn plan_activate(
        &self,
        state: &GameState,
        player: PlayerId,
        source: ObjectId,
        index: usize,
        targets: &[Target],
    ) -> Result<Plan> {
        require_controlled_permanent(state, player, source)?;
        let chars = state.characteristics_of(source)?;
        let no_ability = || IllegalAction::NoSuchAbility {
            object: source,
            index,
        };
        if !chars.abilities_intact {
            return Err(no_ability().into());
        }
        let definition = state.definition(chars.ability_source)?;
        let Some(ability) = definition.activated.get(index) else {
            return Err(no_ability().into());
        };

        if ability.cost.tap {
            require_untapped(state, source)?;
        }
        if !state.players[player].mana_pool.can_pay(&ability.cost.mana) {
            return Err(IllegalAction::CannotPayCost {
                cost: ability.cost.mana,
            }
            .into());
        }
        validate_targets(state, &ability.targets, targets, Some(source), player)?;

        Ok(Plan::Activate {
            source,
            index,
            tap: ability.cost.tap,
            cost: ability.cost.mana,
            specs: ability.targets.clone(),
            targets: targets.to_vec(),
            effects: ability.effects.clone(),
            mana_ability: ability.is_mana_ability,
        })
    }

    fn plan_mana(&self, state: &GameState, player: PlayerId, source: ObjectId) -> Result<Plan> {
        require_controlled_permanent(state, player, source)?;
        let chars = state.characteristics_of(source)?;

        if let Some(color) = chars.intrinsic_mana().first() {
            require_untapped(state, source)?;
            return Ok(Plan::IntrinsicMana {
                source,
                mana: ManaType::from_color(*color),
            });
        }

        if chars.abilities_intact {
            let definition = state.definition(chars.ability_source)?;
            if let Some(index) = definition.activated.iter().position(|a| a.is_mana_ability) {
                return self.plan_activate(state, player, source, index, &[]);
            }
        }
        Err(IllegalAction::NoManaAbility { object: source }.into())
    }

    fn perform(&self, state: &mut GameState, player: PlayerId, plan: Plan) -> Result<ActionReport> {
        match plan {
            Plan::Pass => Ok(ActionReport::Passed(pass_priority(state, player)?)),

            Plan::PlayLand { card } => {
                let permanent = state.put_onto_battlefield(card, player)?;
                state.players[player].lands_played_this_turn += 1;
                info!(player = %player, object = %permanent, "land played");
                after_action(state, player, false)?;
                Ok(ActionReport::LandPlayed { permanent })
            }

            Plan::Cast {
                card,
                definition,
                cost,
                specs,
                targets,
                effects,
            } => {
                state.players[player].mana_pool.pay(&cost);
                let spell = state.move_object(card, Zone::Stack, ZonePosition::Top)?;
                let item = StackItem::new(StackItemKind::Spell { card: definition }, spell, player)
                    .with_targets(specs, targets)
                    .with_effects(effects);
                let item = state.stack.push(item);
                state.emit(GameEvent::SpellCast {
                    player,
                    spell,
                    item,
                })?;
                info!(player = %player, object = %spell, item = %item, "spell cast");
                after_action(state, player, true)?;
                Ok(ActionReport::SpellCast { item, spell })
            }

            Plan::Activate {
                source,
                index,
                tap,
                cost,
                specs,
                targets,
                effects,
                mana_ability,
            } => {
                if tap {
                    if let Some(object) = state.object_mut(source) {
                        object.tapped = true;
                    }
                }
                state.players[player].mana_pool.pay(&cost);

                if mana_ability {
                    let ctx = EffectContext::new(Some(source), player)
                        .with_targets(targets.iter().copied().map(Some));
                    EffectResolver::apply_all(state, &effects, &ctx)?;
                    after_action(state, player, false)?;
                    return Ok(ActionReport::ManaProduced {
                        source,
                        mana: produced_mana(&effects),
                    });
                }

                let item = StackItem::new(StackItemKind::Activated { index }, source, player)
                    .with_targets(specs, targets)
                    .with_effects(effects);
                let item = state.stack.push(item);
                info!(player = %player, object = %source, item = %item, "ability activated");
                after_action(state, player, true)?;
                Ok(ActionReport::AbilityActivated { item })
            }

            Plan::IntrinsicMana { source, mana } => {
                if let Some(object) = state.object_mut(source) {
                    object.tapped = true;
                }
                state.players[player].mana_pool.add(mana, 1);
                after_action(state, player, false)?;
                Ok(ActionReport::ManaProduced {
                    source,
                    mana: vec![mana],
                })
            }
        }
    }

    /// Candidate actions before legality checks.
    fn candidates(
        &self,
        state: &GameState,
        player: PlayerId,
        snapshot: &LayerSnapshot,
    ) -> Vec<PlayerAction> {
        let mut candidates = vec![PlayerAction::pass()];

        for &card in state.zones.objects_in(Zone::Hand(player)) {
            candidates.push(PlayerAction::play_land(card));
            let Some(definition) = state
                .object(card)
                .and_then(|o| state.cards.get(o.card))
            else {
                continue;
            };
            let ctx = SelectionContext::new(Some(card), player);
            for targets in target_choices(&definition.spell.targets, state, snapshot, &ctx) {
                candidates.push(PlayerAction::cast_targeting(card, &targets));
            }
        }

        for &permanent in state.zones.battlefield() {
            let Some(chars) = snapshot.get(permanent) else {
                continue;
            };
            if chars.controller != player {
                continue;
            }
            candidates.push(PlayerAction::tap_for_mana(permanent));
            if !chars.abilities_intact {
                continue;
            }
            let Some(definition) = state.cards.get(chars.ability_source) else {
                continue;
            };
            let ctx = SelectionContext::new(Some(permanent), player);
            for (index, ability) in definition.activated.iter().enumerate() {
                if ability.is_mana_ability {
                    continue;
                }
                for targets in target_choices(&ability.targets, state, snapshot, &ctx) {
                    candidates.push(PlayerAction::activate(permanent, index, &targets));
                }
            }
        }
        candidates
    }
}

impl RulesEngine for StandardRules {
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<PlayerAction> {
        if state.is_game_over() || !state.turn.holds_priority(player) {
            return Vec::new();
        }
        let snapshot = match compute_all(state) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "could not compute characteristics for legal actions");
                return vec![PlayerAction::pass()];
            }
        };
        self.candidates(state, player, &snapshot)
            .into_iter()
            .filter(|action| self.plan(state, player, action).is_ok())
            .collect()
    }

    fn apply_action(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        action: &PlayerAction,
    ) -> Result<ActionReport> {
        let plan = match self.plan(state, player, action) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(player = %player, ?action, error = %e, "action rejected");
                return Err(e);
            }
        };

        let sequence = state.action_history.len() as u32;
        let turn = state.turn.turn_number;
        let report = self.perform(state, player, plan).inspect_err(|e| {
            error!(player = %player, ?action, error = %e, "action failed after validation");
        })?;
        state
            .action_history
            .push_back(ActionRecord::new(player, action.clone(), turn, sequence));
        Ok(report)
    }
}

fn require_zone(state: &GameState, object: ObjectId, zone: Zone, expected: ZoneKind) -> Result<()> {
    if state.zones.is_in(object, zone) {
        Ok(())
    } else {
        Err(IllegalAction::WrongZone { object, expected }.into())
    }
}

fn require_controlled_permanent(state: &GameState, player: PlayerId, object: ObjectId) -> Result<()> {
    require_zone(state, object, Zone::Battlefield, ZoneKind::Battlefield)?;
    if state.characteristics_of(object)?.controller != player {
        return Err(IllegalAction::NotController { object, player }.into());
    }
    Ok(())
}

fn require_untapped(state: &GameState, object: ObjectId) -> Result<()> {
    if state.try_object(object)?.tapped {
        return Err(IllegalAction::AlreadyTapped { object }.into());
    }
    if !can_tap_for_ability(state, object)? {
        return Err(IllegalAction::SummoningSick { object }.into());
    }
    Ok(())
}

/// Target combinations offered by legal action enumeration. Only
/// untargeted and single-target abilities are enumerated.
fn target_choices(
    specs: &[TargetSpec],
    state: &GameState,
    snapshot: &LayerSnapshot,
    ctx: &SelectionContext,
) -> Vec<Vec<Target>> {
    match specs {
        [] => vec![Vec::new()],
        [spec] => spec
            .legal_targets(state, snapshot, ctx)
            .into_iter()
            .map(|t| vec![t])
            .collect(),
        _ => Vec::new(),
    }
}

fn produced_mana(effects: &[Effect]) -> Vec<ManaType> {
    effects
        .iter()
        .flat_map(|effect| match effect {
            Effect::AddMana { mana, amount } => vec![*mana; *amount as usize],
            _ => Vec::new(),
        })
        .collect()
}
