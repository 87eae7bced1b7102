//! Core kernel types: ids, players, state, actions, errors, RNG, configuration.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionRecord, PlayerAction, TargetList};
pub use config::{GameConfig, DEFAULT_SBA_ITERATION_CAP};
pub use entity::{ObjectId, Timestamp};
pub use error::{
    IllegalAction, InvariantViolation, Result, RulesError, StateQueryError, ViolationKind,
};
pub use player::{apnap_order, apnap_rank, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{GameState, PlayerState};
