//! Game state: the single value every component operates on.
//!
//! `GameState` is created at match start, mutated only through the rules
//! engine's action entry point (and the turn machine it drives), and
//! dropped at match end. It owns:
//!
//! - the zone set and the objects the zones hold
//! - the active continuous-effect set
//! - the stack and the turn/priority state
//! - per-player state (life, poison, mana pool, land drops)
//! - recent events and the triggered abilities they caused
//!
//! Card definitions are shared read-only through an `Arc`.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::action::ActionRecord;
use super::config::GameConfig;
use super::entity::{ObjectId, Timestamp};
use super::error::{InvariantViolation, Result, StateQueryError, ViolationKind};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardDefinition, CardId, CardRegistry, GameObject, ManaPool};
use crate::layers::{
    characteristics_of, compute_all, CharacteristicSet, ContinuousEffectSpec, Duration, EffectId,
    EffectOrigin, EffectSet,
};
use crate::rules::GameResult;
use crate::sba::LoseReason;
use crate::stack::{ResolutionRecord, Stack};
use crate::triggers::{match_event, Departed, GameEvent, PendingTrigger, TriggerRegistry};
use crate::turn::TurnState;
use crate::zones::{Zone, ZonePosition, ZoneSet};

/// Per-player state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub life: i32,
    pub poison: u32,
    pub mana_pool: ManaPool,
    pub lands_played_this_turn: u32,
    /// Set when a draw found an empty library; checked as a state-based action.
    pub drew_from_empty_library: bool,
    pub has_lost: bool,
    pub loss_reason: Option<LoseReason>,
}

impl PlayerState {
    #[must_use]
    pub fn new(life: i32) -> Self {
        Self {
            life,
            poison: 0,
            mana_pool: ManaPool::new(),
            lands_played_this_turn: 0,
            drew_from_empty_library: false,
            has_lost: false,
            loss_reason: None,
        }
    }
}

/// Complete state of one match.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub cards: Arc<CardRegistry>,
    pub players: PlayerMap<PlayerState>,

    /// Objects currently in some zone.
    pub objects: FxHashMap<ObjectId, GameObject>,
    pub zones: ZoneSet,
    pub effects: EffectSet,
    pub stack: Stack,
    pub turn: TurnState,
    pub triggers: TriggerRegistry,

    /// Events since the last trigger collection.
    pub events: Vec<GameEvent>,
    /// Abilities that triggered on those events, matched as they happened.
    pub pending_triggers: Vec<PendingTrigger>,

    pub resolution_log: Vector<ResolutionRecord>,
    pub action_history: Vector<ActionRecord>,
    pub result: Option<GameResult>,

    pub rng: GameRng,
    next_object_id: u32,
    next_timestamp: u64,
}

impl GameState {
    /// Create an empty match: players at starting life, all zones empty,
    /// turn 1 untap step with no priority holder.
    #[must_use]
    pub fn new(config: GameConfig, cards: Arc<CardRegistry>) -> Self {
        let player_count = config.player_count;
        let life = config.starting_life;
        Self {
            players: PlayerMap::new(player_count, |_| PlayerState::new(life)),
            objects: FxHashMap::default(),
            zones: ZoneSet::new(player_count),
            effects: EffectSet::new(),
            stack: Stack::new(),
            turn: TurnState::new(PlayerId(0)),
            triggers: TriggerRegistry::from_cards(&cards),
            events: Vec::new(),
            pending_triggers: Vec::new(),
            resolution_log: Vector::new(),
            action_history: Vector::new(),
            result: None,
            rng: GameRng::new(config.seed),
            next_object_id: 0,
            next_timestamp: 0,
            cards,
            config,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    /// Issue the next timestamp.
    pub fn next_timestamp(&mut self) -> Timestamp {
        self.next_timestamp += 1;
        Timestamp(self.next_timestamp)
    }

    fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    // === Queries ===

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(&id)
    }

    /// Like [`GameState::object`] but as a query error.
    pub fn try_object(&self, id: ObjectId) -> Result<&GameObject> {
        self.objects
            .get(&id)
            .ok_or_else(|| StateQueryError::ObjectNotFound(id).into())
    }

    pub fn definition(&self, card: CardId) -> Result<&CardDefinition> {
        self.cards.definition(card)
    }

    pub fn player(&self, player: PlayerId) -> Result<&PlayerState> {
        self.players
            .try_get(player)
            .ok_or_else(|| StateQueryError::UnknownPlayer(player).into())
    }

    /// Current characteristics of an object.
    pub fn characteristics_of(&self, id: ObjectId) -> Result<CharacteristicSet> {
        characteristics_of(self, id)
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.players.try_get(player).is_some_and(|p| !p.has_lost)
    }

    /// Players still in the match, in seat order.
    #[must_use]
    pub fn living_players(&self) -> Vec<PlayerId> {
        PlayerId::all(self.player_count())
            .filter(|&p| self.is_alive(p))
            .collect()
    }

    /// The next living player after `player` in turn order.
    #[must_use]
    pub fn next_living_player(&self, player: PlayerId) -> PlayerId {
        let count = self.player_count();
        let mut next = player.next(count);
        for _ in 0..count {
            if self.is_alive(next) {
                return next;
            }
            next = next.next(count);
        }
        player
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Record an event and match it against listening abilities now.
    pub fn emit(&mut self, event: GameEvent) -> Result<()> {
        self.emit_departing(event, &[])
    }

    fn emit_departing(&mut self, event: GameEvent, departed: &[Departed]) -> Result<()> {
        trace!(?event, "event");
        let matched = match_event(self, &event, self.events.len(), departed)?;
        self.pending_triggers.extend(matched);
        self.events.push(event);
        Ok(())
    }

    /// Forget events and the triggers they caused.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.pending_triggers.clear();
    }

    // === Objects and zones ===

    /// Create a new object for `card` directly in `zone`.
    ///
    /// Used for match setup. No zone-change event is emitted.
    pub fn create_object(&mut self, card: CardId, owner: PlayerId, zone: Zone) -> Result<ObjectId> {
        self.definition(card)?;
        self.player(owner)?;
        let id = self.next_object_id();
        let timestamp = self.next_timestamp();
        let object = GameObject::new(id, card, owner, zone, timestamp, self.turn.turn_number);
        self.zones.insert(id, zone, ZonePosition::Top)?;
        self.objects.insert(id, object);
        if zone == Zone::Battlefield {
            self.register_statics(id)?;
        }
        Ok(id)
    }

    /// Create a token of `card` on the battlefield under `controller`.
    ///
    /// Tokens come from outside the game, so no zone-change event is
    /// emitted.
    pub fn create_token(&mut self, card: CardId, controller: PlayerId) -> Result<ObjectId> {
        let id = self.create_object(card, controller, Zone::Battlefield)?;
        if let Some(object) = self.object_mut(id) {
            object.is_token = true;
        }
        debug!(object = %id, ?card, %controller, "token created");
        Ok(id)
    }

    /// Remove a token that has left the battlefield from the game.
    pub fn cease_to_exist(&mut self, id: ObjectId) -> Result<()> {
        if self.objects.remove(&id).is_none() {
            return Err(StateQueryError::ObjectNotFound(id).into());
        }
        self.zones.remove(id);
        debug!(object = %id, "token ceased to exist");
        Ok(())
    }

    /// Put a card on top of its owner's library.
    pub fn add_card_to_library(&mut self, card: CardId, owner: PlayerId) -> Result<ObjectId> {
        self.create_object(card, owner, Zone::Library(owner))
    }

    /// Move an object to another zone.
    ///
    /// The object arriving is a new object: new id, new timestamp, no
    /// counters, damage or tapped status. Static effects of a departing
    /// permanent end; effects that outlive their source stay. Returns the
    /// new id.
    pub fn move_object(&mut self, id: ObjectId, to: Zone, position: ZonePosition) -> Result<ObjectId> {
        self.relocate(id, to, position, None, &[])
    }

    /// Put an object onto the battlefield under `controller`.
    pub fn put_onto_battlefield(&mut self, id: ObjectId, controller: PlayerId) -> Result<ObjectId> {
        self.relocate(id, Zone::Battlefield, ZonePosition::Top, Some(controller), &[])
    }

    /// Move several objects at once. Last-known characteristics of each are
    /// taken before any of them leaves, so an anthem dying alongside the
    /// creatures it pumps still shows in their last-known values, and each
    /// departing permanent looks back at every other one.
    pub fn move_simultaneously(&mut self, moves: &[(ObjectId, Zone)]) -> Result<Vec<ObjectId>> {
        let snapshot = compute_all(self)?;
        let departed: Vec<Departed> = moves
            .iter()
            .filter(|(id, _)| self.zones.is_in(*id, Zone::Battlefield))
            .filter_map(|&(id, _)| {
                Some(Departed {
                    object: id,
                    chars: snapshot.get(id)?.clone(),
                    timestamp: self.object(id)?.timestamp,
                })
            })
            .collect();
        let mut moved = Vec::with_capacity(moves.len());
        for &(id, to) in moves {
            moved.push(self.relocate(id, to, ZonePosition::Top, None, &departed)?);
        }
        Ok(moved)
    }

    fn relocate(
        &mut self,
        id: ObjectId,
        to: Zone,
        position: ZonePosition,
        controller: Option<PlayerId>,
        departed: &[Departed],
    ) -> Result<ObjectId> {
        let Some(from) = self.zones.zone_of(id) else {
            return Err(StateQueryError::ObjectNotFound(id).into());
        };
        let known = departed.iter().find(|d| d.object == id);
        let last_known = match (from, known) {
            (Zone::Battlefield, Some(d)) => Some(Box::new(d.chars.clone())),
            (Zone::Battlefield, None) => Some(Box::new(characteristics_of(self, id)?)),
            _ => None,
        };
        let old = self.objects.remove(&id).ok_or_else(|| {
            InvariantViolation::new(ViolationKind::MissingObject).with_objects([id])
        })?;
        self.zones.remove(id);

        let new_id = self.next_object_id();
        let timestamp = self.next_timestamp();
        let mut object = GameObject::new(new_id, old.card, old.owner, to, timestamp, self.turn.turn_number);
        object.controller = controller.unwrap_or(old.owner);
        object.is_token = old.is_token;
        self.zones.insert(new_id, to, position)?;
        self.objects.insert(new_id, object);

        if from == Zone::Battlefield {
            let ended = self.effects.remove_statics_of(id);
            if !ended.is_empty() {
                debug!(object = %id, effects = ?ended, "static effects ended");
            }
        }
        if to == Zone::Battlefield {
            self.register_statics(new_id)?;
        }

        let alone;
        let departed = match (&last_known, known) {
            (Some(chars), None) => {
                alone = [Departed {
                    object: id,
                    chars: (**chars).clone(),
                    timestamp: old.timestamp,
                }];
                &alone[..]
            }
            _ => departed,
        };

        debug!(from = %from, to = %to, old = %id, new = %new_id, "zone change");
        let event = GameEvent::ZoneChange {
            object: id,
            new_object: new_id,
            card: old.card,
            owner: old.owner,
            from,
            to,
            last_known,
        };
        self.emit_departing(event, departed)?;
        self.prune_effects();
        Ok(new_id)
    }

    /// Move to the owner's graveyard.
    pub fn put_into_graveyard(&mut self, id: ObjectId) -> Result<ObjectId> {
        let owner = self.try_object(id)?.owner;
        self.move_object(id, Zone::Graveyard(owner), ZonePosition::Top)
    }

    /// Draw the top card of `player`'s library.
    ///
    /// With an empty library nothing moves and the player is flagged for
    /// the state-based loss check.
    pub fn draw_card(&mut self, player: PlayerId) -> Result<Option<ObjectId>> {
        let library = Zone::Library(player);
        let Some(top) = self.zones.top(library) else {
            debug!(%player, "draw from empty library");
            self.players[player].drew_from_empty_library = true;
            return Ok(None);
        };
        let drawn = self.move_object(top, Zone::Hand(player), ZonePosition::Top)?;
        self.emit(GameEvent::CardDrawn {
            player,
            object: drawn,
        })?;
        Ok(Some(drawn))
    }

    pub fn shuffle_library(&mut self, player: PlayerId) {
        self.zones.shuffle(Zone::Library(player), &mut self.rng);
    }

    // === Continuous effects ===

    /// Create a continuous effect with a fresh timestamp.
    pub fn add_continuous_effect(
        &mut self,
        spec: ContinuousEffectSpec,
        source: Option<ObjectId>,
        controller: PlayerId,
    ) -> EffectId {
        let timestamp = self.next_timestamp();
        let id = self
            .effects
            .add(spec, source, controller, timestamp, EffectOrigin::Resolution);
        debug!(effect = %id, %timestamp, "continuous effect created");
        id
    }

    /// Create the effects of a new permanent's static abilities. They share
    /// the permanent's timestamp.
    fn register_statics(&mut self, id: ObjectId) -> Result<()> {
        let object = self.try_object(id)?;
        let (card, controller, timestamp) = (object.card, object.controller, object.timestamp);
        let statics: Vec<ContinuousEffectSpec> = self
            .definition(card)?
            .statics
            .iter()
            .map(|s| s.effect.clone())
            .collect();
        for (index, mut spec) in statics.into_iter().enumerate() {
            if spec.duration == Duration::Indefinite {
                spec.duration = Duration::WhileSourceOnBattlefield;
            }
            self.effects.add(
                spec,
                Some(id),
                controller,
                timestamp,
                EffectOrigin::Static { card, index },
            );
        }
        Ok(())
    }

    /// Drop effects whose duration no longer holds.
    pub fn prune_effects(&mut self) -> Vec<EffectId> {
        let ended: Vec<EffectId> = self
            .effects
            .iter()
            .filter(|e| e.has_expired(self))
            .map(|e| e.id)
            .collect();
        for id in &ended {
            self.effects.remove(*id);
        }
        if !ended.is_empty() {
            debug!(effects = ?ended, "effects expired");
        }
        ended
    }
}
