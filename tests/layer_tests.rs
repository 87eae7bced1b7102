//! Characteristic engine integration tests.
//!
//! These tests exercise the layer system end to end: sub-layer precedence,
//! dependency ordering against timestamp order, the cycle fallback, and
//! the determinism of repeated queries.

mod common;

use common::{empty_game, standard_cards};
use mtg_kernel::cards::{CardDefinition, CardType, StaticAbility, SubType};
use mtg_kernel::core::{GameConfig, GameState, PlayerId};
use mtg_kernel::layers::{
    apply_in_order, characteristics_of, compute_all, ContinuousEffect, ContinuousEffectSpec,
    EffectCondition, EffectId, LayerSnapshot, Modification, ObjectPredicate, PtSublayerOrder,
    Selector,
};
use mtg_kernel::sba::run_sbas_to_fixed_point;
use mtg_kernel::zones::Zone;
use proptest::prelude::*;

fn effect(state: &GameState, id: EffectId) -> &ContinuousEffect {
    state.effects.get(id).unwrap()
}

/// "All lands are creatures."
fn lands_are_creatures() -> ContinuousEffectSpec {
    ContinuousEffectSpec::new(
        Selector::permanents([ObjectPredicate::CardType(CardType::Land)]),
        Modification::AddCardType(CardType::Creature),
    )
}

/// "All creatures are artifacts."
fn creatures_are_artifacts() -> ContinuousEffectSpec {
    ContinuousEffectSpec::new(
        Selector::permanents([ObjectPredicate::CardType(CardType::Creature)]),
        Modification::AddCardType(CardType::Artifact),
    )
}

// =============================================================================
// Sub-layer precedence
// =============================================================================

/// A later "power is 0" beats an earlier "+2/+0" under the default order.
#[test]
fn test_set_power_overrides_earlier_pump() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();

    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::Object(bear), Modification::pump(2, 0))
            .until_end_of_turn(),
        None,
        PlayerId(0),
    );
    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::Object(bear), Modification::set_power(0)),
        None,
        PlayerId(1),
    );

    let chars = characteristics_of(&state, bear).unwrap();
    assert_eq!(chars.power, Some(0));
    assert_eq!(chars.toughness, Some(2));
}

/// The printed rules order sets first and modifies second.
#[test]
fn test_comprehensive_order_modifies_after_set() {
    let (registry, cards) = standard_cards();
    let config = GameConfig::two_player().with_pt_order(PtSublayerOrder::ComprehensiveRules);
    let mut state = empty_game(registry, config);
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();

    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::Object(bear), Modification::pump(2, 0)),
        None,
        PlayerId(0),
    );
    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::Object(bear), Modification::set_power(0)),
        None,
        PlayerId(0),
    );

    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(2));
}

/// Type-changing effects apply before P/T effects look for creatures.
#[test]
fn test_type_change_feeds_later_layers() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let forest = state
        .create_object(cards.forest, PlayerId(0), Zone::Battlefield)
        .unwrap();

    // Lord first, land animation second: layer order, not timestamps, decides.
    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::creatures_you_control(), Modification::pump(1, 1)),
        None,
        PlayerId(0),
    );
    state.add_continuous_effect(lands_are_creatures(), None, PlayerId(0));
    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::Object(forest), Modification::set_pt(0, 0)),
        None,
        PlayerId(0),
    );

    let chars = characteristics_of(&state, forest).unwrap();
    assert!(chars.is_creature());
    assert!(chars.is_land());
    assert_eq!((chars.power, chars.toughness), (Some(0), Some(0)));

    let config = GameConfig::two_player().with_pt_order(PtSublayerOrder::ComprehensiveRules);
    state.config = config;
    let chars = characteristics_of(&state, forest).unwrap();
    assert_eq!((chars.power, chars.toughness), (Some(1), Some(1)));
}

// =============================================================================
// Dependency ordering
// =============================================================================

/// "Creatures are artifacts" depends on "lands are creatures" even when it
/// is older, so an animated land also becomes an artifact.
#[test]
fn test_dependency_overrides_timestamp() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let forest = state
        .create_object(cards.forest, PlayerId(0), Zone::Battlefield)
        .unwrap();
    let bear = state
        .create_object(cards.bears, PlayerId(1), Zone::Battlefield)
        .unwrap();

    state.add_continuous_effect(creatures_are_artifacts(), None, PlayerId(1));
    state.add_continuous_effect(lands_are_creatures(), None, PlayerId(0));

    let snapshot = compute_all(&state).unwrap();
    let land = snapshot.get(forest).unwrap();
    assert!(land.has_type(CardType::Creature));
    assert!(land.has_type(CardType::Artifact));
    assert!(snapshot.get(bear).unwrap().has_type(CardType::Artifact));
}

/// Applying the dependent pair in timestamp order gives a different,
/// wrong answer; the engine's answer matches the dependency order.
#[test]
fn test_dependent_effects_do_not_commute() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let forest = state
        .create_object(cards.forest, PlayerId(0), Zone::Battlefield)
        .unwrap();

    let older = state.add_continuous_effect(creatures_are_artifacts(), None, PlayerId(0));
    let newer = state.add_continuous_effect(lands_are_creatures(), None, PlayerId(0));

    let base = LayerSnapshot::base(&state).unwrap();
    let mut by_timestamp = base.clone();
    apply_in_order(
        &[effect(&state, older), effect(&state, newer)],
        &mut by_timestamp,
        &state,
    );
    let mut by_dependency = base;
    apply_in_order(
        &[effect(&state, newer), effect(&state, older)],
        &mut by_dependency,
        &state,
    );

    assert_ne!(by_timestamp.get(forest), by_dependency.get(forest));
    assert!(!by_timestamp.get(forest).unwrap().has_type(CardType::Artifact));

    let engine = compute_all(&state).unwrap();
    assert_eq!(engine.get(forest), by_dependency.get(forest));
}

/// Two effects that each change what the other affects fall back to
/// timestamp order instead of failing.
#[test]
fn test_dependency_cycle_falls_back_to_timestamps() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let forest = state
        .create_object(cards.forest, PlayerId(0), Zone::Battlefield)
        .unwrap();
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();

    // "Forests are creatures" then "creatures are Forests".
    let first = state.add_continuous_effect(
        ContinuousEffectSpec::new(
            Selector::permanents([ObjectPredicate::Subtype(SubType::Forest)]),
            Modification::AddCardType(CardType::Creature),
        ),
        None,
        PlayerId(0),
    );
    let second = state.add_continuous_effect(
        ContinuousEffectSpec::new(
            Selector::permanents([ObjectPredicate::CardType(CardType::Creature)]),
            Modification::AddSubtype(SubType::Forest),
        ),
        None,
        PlayerId(0),
    );

    let snapshot = compute_all(&state).unwrap();

    let mut expected = LayerSnapshot::base(&state).unwrap();
    apply_in_order(
        &[effect(&state, first), effect(&state, second)],
        &mut expected,
        &state,
    );
    assert_eq!(snapshot.get(forest), expected.get(forest));
    assert_eq!(snapshot.get(bear), expected.get(bear));
    assert!(snapshot.get(bear).unwrap().has_subtype(SubType::Forest));
    assert!(snapshot.get(forest).unwrap().is_creature());
}

// =============================================================================
// Durations
// =============================================================================

/// "+2/+0 for as long as the squire stays untapped" ends for good the first
/// time the squire is tapped.
#[test]
fn test_while_effect_does_not_come_back() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let squire = state
        .create_object(cards.squire, PlayerId(0), Zone::Battlefield)
        .unwrap();
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();
    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::Object(bear), Modification::pump(2, 0))
            .while_condition(EffectCondition::SourceUntapped),
        Some(squire),
        PlayerId(0),
    );
    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(4));

    state.object_mut(squire).unwrap().tapped = true;
    run_sbas_to_fixed_point(&mut state).unwrap();
    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(2));
    assert!(state.effects.is_empty());

    state.object_mut(squire).unwrap().tapped = false;
    run_sbas_to_fixed_point(&mut state).unwrap();
    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(2));
}

/// A static "as long as it is your turn" switches off and on again.
#[test]
fn test_static_while_effect_toggles() {
    let (mut registry, cards) = standard_cards();
    let banner = registry.register_with(|id| {
        CardDefinition::new(id, "Turn Banner")
            .with_type(CardType::Enchantment)
            .with_static(StaticAbility::new(
                "Your creatures get +1/+1 during your turn",
                ContinuousEffectSpec::new(Selector::creatures_you_control(), Modification::pump(1, 1))
                    .while_condition(EffectCondition::ControllerIsActive),
            ))
    });
    let mut state = empty_game(registry, GameConfig::two_player());
    state
        .create_object(banner, PlayerId(0), Zone::Battlefield)
        .unwrap();
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();
    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(3));

    state.turn.active_player = PlayerId(1);
    run_sbas_to_fixed_point(&mut state).unwrap();
    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(2));
    assert_eq!(state.effects.len(), 1);

    state.turn.active_player = PlayerId(0);
    run_sbas_to_fixed_point(&mut state).unwrap();
    assert_eq!(characteristics_of(&state, bear).unwrap().power, Some(3));
}

// =============================================================================
// Determinism
// =============================================================================

/// Repeated queries on an unchanged state agree.
#[test]
fn test_queries_are_repeatable() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let bear = state
        .create_object(cards.bears, PlayerId(0), Zone::Battlefield)
        .unwrap();
    state
        .create_object(cards.forest, PlayerId(0), Zone::Battlefield)
        .unwrap();
    state.add_continuous_effect(lands_are_creatures(), None, PlayerId(0));
    state.add_continuous_effect(
        ContinuousEffectSpec::new(Selector::creatures_you_control(), Modification::pump(1, 1)),
        None,
        PlayerId(0),
    );

    let first = compute_all(&state).unwrap();
    let second = compute_all(&state).unwrap();
    assert_eq!(first.len(), second.len());
    for (id, chars) in first.iter() {
        assert_eq!(second.get(id), Some(chars));
    }
    assert_eq!(
        characteristics_of(&state, bear).unwrap(),
        characteristics_of(&state, bear).unwrap()
    );
}

/// Objects in hidden zones keep their printed characteristics.
#[test]
fn test_effects_do_not_reach_the_library() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player());
    let card = state.add_card_to_library(cards.forest, PlayerId(0)).unwrap();
    state.add_continuous_effect(lands_are_creatures(), None, PlayerId(0));

    assert!(!characteristics_of(&state, card).unwrap().is_creature());
}

proptest! {
    /// Independent pumps in the same sub-layer commute.
    #[test]
    fn prop_independent_pumps_commute(a in -5i32..5, b in -5i32..5, c in -5i32..5, d in -5i32..5) {
        let (registry, cards) = standard_cards();
        let mut state = empty_game(registry, GameConfig::two_player());
        let bear = state.create_object(cards.bears, PlayerId(0), Zone::Battlefield).unwrap();

        let x = state.add_continuous_effect(
            ContinuousEffectSpec::new(Selector::Object(bear), Modification::pump(a, b)),
            None,
            PlayerId(0),
        );
        let y = state.add_continuous_effect(
            ContinuousEffectSpec::new(Selector::Object(bear), Modification::pump(c, d)),
            None,
            PlayerId(1),
        );

        let base = LayerSnapshot::base(&state).unwrap();
        let mut forward = base.clone();
        apply_in_order(&[effect(&state, x), effect(&state, y)], &mut forward, &state);
        let mut backward = base;
        apply_in_order(&[effect(&state, y), effect(&state, x)], &mut backward, &state);

        prop_assert_eq!(forward.get(bear), backward.get(bear));
        let chars = characteristics_of(&state, bear).unwrap();
        prop_assert_eq!(chars.power, Some(2 + a + c));
        prop_assert_eq!(chars.toughness, Some(2 + b + d));
    }
}
