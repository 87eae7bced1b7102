//! State-based action integration tests.

mod common;

use common::{empty_game, standard_cards};
use mtg_kernel::cards::{CardDefinition, CardType, CounterType, StaticAbility};
use mtg_kernel::core::{GameConfig, GameState, ObjectId, PlayerId};
use mtg_kernel::layers::{ContinuousEffectSpec, Modification, ObjectPredicate, Selector};
use mtg_kernel::rules::{GameResult, RulesEngine, StandardRules};
use mtg_kernel::sba::{apply_sbas, check_state_based_actions, run_sbas_to_fixed_point};
use mtg_kernel::zones::Zone;
use proptest::prelude::*;

fn battlefield(state: &GameState) -> Vec<ObjectId> {
    state.zones.battlefield().to_vec()
}

// =============================================================================
// Stable states
// =============================================================================

/// Two vanilla 1/1s with nothing around them never die.
#[test]
fn test_healthy_creatures_survive() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let a = state
        .create_object(cards.squire, PlayerId(0), Zone::Battlefield)
        .unwrap();
    let b = state
        .create_object(cards.squire, PlayerId(1), Zone::Battlefield)
        .unwrap();

    assert!(check_state_based_actions(&state).unwrap().is_empty());
    assert_eq!(run_sbas_to_fixed_point(&mut state).unwrap(), 0);
    assert_eq!(battlefield(&state), vec![a, b]);
}

/// Applying SBAs to a stable state is a no-op, however often it is done.
#[test]
fn test_fixed_point_is_idempotent() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let doomed = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();
    state
        .create_object(cards.bears, PlayerId(1), Zone::Battlefield)
        .unwrap();
    state.object_mut(doomed).unwrap().damage = 2;

    assert!(apply_sbas(&mut state).unwrap());
    let stable = battlefield(&state);
    for _ in 0..3 {
        assert!(!apply_sbas(&mut state).unwrap());
        assert_eq!(battlefield(&state), stable);
    }
    assert_eq!(state.zones.len(Zone::Graveyard(PlayerId(0))), 1);
}

// =============================================================================
// Cascading actions
// =============================================================================

/// A lord leaving makes a creature it was keeping alive die on the next
/// pass; the fixed point needs two rounds.
#[test]
fn test_lord_death_cascades() {
    let (mut registry, cards) = standard_cards();
    let anthem = registry.register_with(|id| {
        CardDefinition::new(id, "Frail Banner")
            .with_type(CardType::Creature)
            .with_pt(0, 1)
            .with_static(StaticAbility::new(
                "Other creatures get +0/+1",
                ContinuousEffectSpec::new(
                    Selector::permanents([
                        ObjectPredicate::CardType(CardType::Creature),
                        ObjectPredicate::NotSource,
                    ]),
                    Modification::pump(0, 1),
                ),
            ))
    });
    let mut state = empty_game(registry, GameConfig::two_player());
    let banner = state
        .create_object(anthem, PlayerId(0), Zone::Battlefield)
        .unwrap();
    let squire = state
        .create_object(cards.squire, PlayerId(0), Zone::Battlefield)
        .unwrap();
    // 1/2 with the banner, so one damage is not lethal yet.
    state.object_mut(squire).unwrap().damage = 1;
    state.object_mut(banner).unwrap().damage = 1;

    let rounds = run_sbas_to_fixed_point(&mut state).unwrap();
    assert_eq!(rounds, 2);
    assert!(state.zones.battlefield().is_empty());
    assert_eq!(state.zones.len(Zone::Graveyard(PlayerId(0))), 2);
}

/// Counters annihilate before toughness is checked.
#[test]
fn test_counters_annihilate_in_pairs() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();
    {
        let object = state.object_mut(bear).unwrap();
        object.add_counters(CounterType::PlusOnePlusOne, 1);
        object.add_counters(CounterType::MinusOneMinusOne, 3);
    }

    run_sbas_to_fixed_point(&mut state).unwrap();
    // 2/2 with net two -1/-1 counters dies.
    assert!(!state.zones.is_in(bear, Zone::Battlefield));
}

// =============================================================================
// Game end
// =============================================================================

/// The last player standing wins and the engine stops accepting actions.
#[test]
fn test_last_player_standing_wins() {
    let (registry, _) = standard_cards();
    let mut state = empty_game(registry, GameConfig::new(3));
    state.players[PlayerId(1)].life = 0;
    state.players[PlayerId(2)].poison = 10;

    run_sbas_to_fixed_point(&mut state).unwrap();
    let rules = StandardRules::new();
    assert_eq!(rules.is_terminal(&state), Some(GameResult::Winner(PlayerId(0))));
    assert!(rules.legal_actions(&state, PlayerId(0)).is_empty());
}

proptest! {
    /// Whatever damage is marked, one fixed point pass leaves nothing to do.
    #[test]
    fn prop_fixed_point_leaves_nothing_pending(damage in proptest::collection::vec(0u32..4, 1..6)) {
        let (registry, cards) = standard_cards();
        let mut state = empty_game(registry, GameConfig::two_player());
        for (i, amount) in damage.iter().enumerate() {
            let owner = PlayerId((i % 2) as u8);
            let id = state.create_object(cards.bears, owner, Zone::Battlefield).unwrap();
            state.object_mut(id).unwrap().damage = *amount;
        }

        run_sbas_to_fixed_point(&mut state).unwrap();
        prop_assert!(check_state_based_actions(&state).unwrap().is_empty());
        prop_assert!(!apply_sbas(&mut state).unwrap());

        let survivors = damage.iter().filter(|d| **d < 2).count();
        prop_assert_eq!(state.zones.battlefield().len(), survivors);
    }
}
