//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use mtg_kernel::cards::{catalog, CardDefinition, CardId, CardRegistry, CardType, SubType};
use mtg_kernel::core::{GameConfig, GameState, PlayerId};

/// Route `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Card ids registered by `standard_cards`.
pub struct Cards {
    pub forest: CardId,
    pub mountain: CardId,
    pub bears: CardId,
    pub squire: CardId,
}

/// Basic lands, Grizzly Bears and a vanilla 1/1.
pub fn standard_cards() -> (CardRegistry, Cards) {
    let mut registry = CardRegistry::new();
    let forest = registry.register_with(|id| catalog::basic_land(id, SubType::Forest));
    let mountain = registry.register_with(|id| catalog::basic_land(id, SubType::Mountain));
    let bears = registry.register_with(catalog::grizzly_bears);
    let squire = registry.register_with(|id| {
        CardDefinition::new(id, "Squire")
            .with_type(CardType::Creature)
            .with_pt(1, 1)
    });
    (
        registry,
        Cards {
            forest,
            mountain,
            bears,
            squire,
        },
    )
}

/// A two-player state with no game started.
pub fn empty_game(registry: CardRegistry, config: GameConfig) -> GameState {
    init_tracing();
    GameState::new(config, Arc::new(registry))
}

/// Fill each library with `count` copies of `card`.
pub fn stock_libraries(state: &mut GameState, card: CardId, count: usize) {
    for player in PlayerId::all(state.player_count()) {
        for _ in 0..count {
            state.add_card_to_library(card, player).unwrap();
        }
    }
}
