//! Turn structure, priority and full-game integration tests.
//!
//! The driver loop here is what a real client does: ask for legal actions,
//! pick one, apply it, repeat until the match ends.

mod common;

use common::{empty_game, standard_cards, stock_libraries, Cards};
use mtg_kernel::cards::CardRegistry;
use mtg_kernel::core::{GameConfig, GameState, IllegalAction, PlayerAction, PlayerId, RulesError};
use mtg_kernel::rules::{ActionReport, GameResult, RulesEngine, StandardRules};
use mtg_kernel::sba::run_sbas_to_fixed_point;
use mtg_kernel::turn::{start_game, PassOutcome, Step};
use mtg_kernel::zones::Zone;

fn started(config: GameConfig) -> (GameState, Cards) {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, config.with_starting_hand_size(0));
    stock_libraries(&mut state, cards.forest, 10);
    start_game(&mut state).unwrap();
    (state, cards)
}

/// Land first, then spells, then mana in the active player's main phase,
/// otherwise pass.
fn greedy_choice(rules: &StandardRules, state: &GameState, player: PlayerId) -> PlayerAction {
    let actions = rules.legal_actions(state, player);
    let pick = |wanted: fn(&PlayerAction) -> bool| actions.iter().find(|a| wanted(a)).cloned();
    let own_main = state.turn.active_player == player && state.turn.step.is_main();

    pick(|a| matches!(a, PlayerAction::PlayLand { .. }))
        .or_else(|| pick(|a| matches!(a, PlayerAction::CastSpell { .. })))
        .or_else(|| {
            own_main
                .then(|| pick(|a| matches!(a, PlayerAction::ActivateManaAbility { .. })))
                .flatten()
        })
        .unwrap_or_else(PlayerAction::pass)
}

/// Play until `turns` turns have started or the match is over.
fn play_greedy(rules: &mut StandardRules, state: &mut GameState, turns: u32) {
    while state.turn.turn_number <= turns && rules.is_terminal(state).is_none() {
        let holder = state.turn.priority.expect("someone holds priority mid-game");
        let action = greedy_choice(rules, state, holder);
        rules.apply_action(state, holder, &action).unwrap();
    }
}

fn mixed_registry_game(seed: u64) -> GameState {
    let (registry, cards): (CardRegistry, Cards) = standard_cards();
    let config = GameConfig::two_player().with_seed(seed);
    let mut state = empty_game(registry, config);
    for player in PlayerId::all(2) {
        for i in 0..30 {
            let card = if i % 3 == 0 { cards.bears } else { cards.forest };
            state.add_card_to_library(card, player).unwrap();
        }
    }
    start_game(&mut state).unwrap();
    state
}

// =============================================================================
// Priority
// =============================================================================

/// Active then non-active pass on an empty stack: exactly one step later.
#[test]
fn test_both_passing_advances_exactly_once() {
    let (mut state, _) = started(GameConfig::two_player());
    let mut rules = StandardRules::new();
    assert_eq!(state.turn.step, Step::Upkeep);

    let first = rules
        .apply_action(&mut state, PlayerId(0), &PlayerAction::pass())
        .unwrap();
    assert_eq!(
        first,
        ActionReport::Passed(PassOutcome::PriorityPassed { to: PlayerId(1) })
    );
    assert_eq!(state.turn.step, Step::Upkeep);

    let second = rules
        .apply_action(&mut state, PlayerId(1), &PlayerAction::pass())
        .unwrap();
    assert_eq!(
        second,
        ActionReport::Passed(PassOutcome::StepAdvanced {
            from: Step::Upkeep,
            to: Step::Draw
        })
    );
    assert_eq!(state.turn.step, Step::Draw);
    assert_eq!(state.turn.priority, Some(PlayerId(0)));
    assert_eq!(state.turn.passes, 0);
}

/// Playing a land keeps priority and does not count as a pass.
#[test]
fn test_special_action_keeps_priority() {
    let (mut state, cards) = started(GameConfig::two_player());
    let mut rules = StandardRules::new();
    while state.turn.step != Step::PrecombatMain {
        let holder = state.turn.priority.unwrap();
        rules.apply_action(&mut state, holder, &PlayerAction::pass()).unwrap();
    }
    let land = state
        .create_object(cards.forest, PlayerId(0), Zone::Hand(PlayerId(0)))
        .unwrap();

    rules
        .apply_action(&mut state, PlayerId(0), &PlayerAction::play_land(land))
        .unwrap();
    assert_eq!(state.turn.priority, Some(PlayerId(0)));
    assert_eq!(state.turn.passes, 0);

    rules
        .apply_action(&mut state, PlayerId(0), &PlayerAction::pass())
        .unwrap();
    let report = rules
        .apply_action(&mut state, PlayerId(1), &PlayerAction::pass())
        .unwrap();
    assert!(matches!(
        report,
        ActionReport::Passed(PassOutcome::StepAdvanced {
            from: Step::PrecombatMain,
            ..
        })
    ));
}

/// Four players take turns in seat order.
#[test]
fn test_turns_rotate_through_all_seats() {
    let (mut state, _) = started(GameConfig::new(4));
    let mut rules = StandardRules::new();
    let mut actives = vec![state.turn.active_player];

    while state.turn.turn_number < 5 {
        let holder = state.turn.priority.unwrap();
        if let ActionReport::Passed(PassOutcome::TurnAdvanced { active, .. }) = rules
            .apply_action(&mut state, holder, &PlayerAction::pass())
            .unwrap()
        {
            actives.push(active);
        }
    }
    assert_eq!(
        actives,
        vec![PlayerId(0), PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(0)]
    );
}

/// A player who lost is skipped in turn order and in priority.
#[test]
fn test_eliminated_player_is_skipped() {
    let (mut state, _) = started(GameConfig::new(3));
    let mut rules = StandardRules::new();
    state.players[PlayerId(1)].life = 0;
    run_sbas_to_fixed_point(&mut state).unwrap();
    assert!(state.players[PlayerId(1)].has_lost);
    assert!(rules.is_terminal(&state).is_none());

    rules
        .apply_action(&mut state, PlayerId(0), &PlayerAction::pass())
        .unwrap();
    assert_eq!(state.turn.priority, Some(PlayerId(2)));

    while state.turn.active_player == PlayerId(0) {
        let holder = state.turn.priority.unwrap();
        assert_ne!(holder, PlayerId(1));
        rules.apply_action(&mut state, holder, &PlayerAction::pass()).unwrap();
    }
    assert_eq!(state.turn.active_player, PlayerId(2));
}

// =============================================================================
// Whole games
// =============================================================================

/// A player who must draw from an empty library loses.
#[test]
fn test_drawing_from_empty_library_loses() {
    let (registry, cards) = standard_cards();
    let mut state = empty_game(registry, GameConfig::two_player().with_starting_hand_size(0));
    for _ in 0..5 {
        state.add_card_to_library(cards.forest, PlayerId(0)).unwrap();
    }
    start_game(&mut state).unwrap();
    let mut rules = StandardRules::new();

    let mut last = None;
    while rules.is_terminal(&state).is_none() {
        let holder = state.turn.priority.unwrap();
        last = Some(rules.apply_action(&mut state, holder, &PlayerAction::pass()).unwrap());
    }
    assert_eq!(last, Some(ActionReport::Passed(PassOutcome::GameOver)));
    assert_eq!(state.turn.turn_number, 2);
    assert_eq!(rules.is_terminal(&state), Some(GameResult::Winner(PlayerId(0))));
    assert_eq!(
        rules.apply_action(&mut state, PlayerId(0), &PlayerAction::pass()),
        Err(RulesError::IllegalAction(IllegalAction::GameOver))
    );
}

/// Lands come down one per turn and bears get cast once two are out.
#[test]
fn test_greedy_game_develops_board() {
    let mut state = mixed_registry_game(7);
    let mut rules = StandardRules::new();
    play_greedy(&mut rules, &mut state, 8);

    assert!(rules.is_terminal(&state).is_none());
    for player in PlayerId::all(2) {
        let lands_played = state
            .action_history
            .iter()
            .filter(|r| r.player == player && matches!(r.action, PlayerAction::PlayLand { .. }))
            .count();
        // Player 0 had turns 1, 3, 5, 7; player 1 had 2, 4, 6, 8.
        assert!(lands_played <= 4);
        assert!(lands_played >= 1);
    }
    assert_eq!(state.zones.total(), state.objects.len());
    assert!(state.stack.is_empty() || state.turn.priority.is_some());
}

/// Same seed, same choices, same game.
#[test]
fn test_games_are_deterministic() {
    let mut rules = StandardRules::new();
    let mut a = mixed_registry_game(99);
    let mut b = mixed_registry_game(99);
    play_greedy(&mut rules, &mut a, 6);
    play_greedy(&mut rules, &mut b, 6);

    assert_eq!(a.action_history, b.action_history);
    assert_eq!(a.resolution_log, b.resolution_log);
    assert_eq!(a.zones.battlefield().len(), b.zones.battlefield().len());
}
