//! Match configuration.
//!
//! `GameConfig` carries the numbers a match is played with (seats, life,
//! hand sizes, seed) and the policy knobs for rules corners that are left
//! to the table: legend rule choices, simultaneous trigger ordering, who
//! receives priority after an action, and the P/T sub-layer order.
//!
//! ```
//! use mtg_kernel::core::GameConfig;
//! use mtg_kernel::sba::LegendRulePolicy;
//!
//! let config = GameConfig::two_player()
//!     .with_seed(7)
//!     .with_starting_life(30)
//!     .with_legend_rule(LegendRulePolicy::KeepOldest);
//! assert_eq!(config.player_count, 2);
//! assert_eq!(config.starting_life, 30);
//! ```

use serde::{Deserialize, Serialize};

use crate::layers::PtSublayerOrder;
use crate::sba::LegendRulePolicy;
use crate::triggers::TriggerPolicy;
use crate::turn::PriorityPolicy;

/// Default cap on state-based action rounds before the kernel gives up.
pub const DEFAULT_SBA_ITERATION_CAP: usize = 64;

/// Match-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats.
    pub player_count: usize,

    /// Life each player starts with.
    pub starting_life: i32,

    /// Cards drawn into each opening hand.
    pub starting_hand_size: usize,

    /// Hand size checked during cleanup.
    pub max_hand_size: usize,

    /// Seed for library shuffles.
    pub seed: u64,

    /// Rounds of state-based actions allowed before reporting non-convergence.
    pub sba_iteration_cap: usize,

    /// Whether the starting player skips the draw on turn 1.
    pub skip_first_draw: bool,

    /// Which permanent survives the legend rule.
    pub legend_rule: LegendRulePolicy,

    /// How simultaneous triggers are ordered.
    pub triggers: TriggerPolicy,

    /// Who receives priority after a spell or ability is put on the stack.
    pub priority_after_action: PriorityPolicy,

    /// Order of the power/toughness sub-layers.
    pub pt_order: PtSublayerOrder,
}

impl GameConfig {
    /// Configuration for `player_count` seats with standard numbers.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            starting_life: 20,
            starting_hand_size: 7,
            max_hand_size: 7,
            seed: 0,
            sba_iteration_cap: DEFAULT_SBA_ITERATION_CAP,
            skip_first_draw: true,
            legend_rule: LegendRulePolicy::default(),
            triggers: TriggerPolicy::default(),
            priority_after_action: PriorityPolicy::default(),
            pt_order: PtSublayerOrder::default(),
        }
    }

    /// Standard two-player configuration.
    #[must_use]
    pub fn two_player() -> Self {
        Self::new(2)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_sba_iteration_cap(mut self, cap: usize) -> Self {
        self.sba_iteration_cap = cap;
        self
    }

    #[must_use]
    pub fn with_first_draw(mut self, skip: bool) -> Self {
        self.skip_first_draw = skip;
        self
    }

    #[must_use]
    pub fn with_legend_rule(mut self, policy: LegendRulePolicy) -> Self {
        self.legend_rule = policy;
        self
    }

    #[must_use]
    pub fn with_trigger_policy(mut self, policy: TriggerPolicy) -> Self {
        self.triggers = policy;
        self
    }

    #[must_use]
    pub fn with_priority_policy(mut self, policy: PriorityPolicy) -> Self {
        self.priority_after_action = policy;
        self
    }

    #[must_use]
    pub fn with_pt_order(mut self, order: PtSublayerOrder) -> Self {
        self.pt_order = order;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::two_player()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.starting_life, 20);
        assert_eq!(config.starting_hand_size, 7);
        assert_eq!(config.sba_iteration_cap, DEFAULT_SBA_ITERATION_CAP);
        assert!(config.skip_first_draw);
        assert_eq!(config.priority_after_action, PriorityPolicy::PassToNext);
        assert_eq!(config.pt_order, PtSublayerOrder::SetOverridesModify);
    }

    #[test]
    fn test_builder_chain() {
        let config = GameConfig::new(4)
            .with_starting_hand_size(0)
            .with_sba_iteration_cap(5)
            .with_first_draw(false)
            .with_priority_policy(PriorityPolicy::RetainWithActor);

        assert_eq!(config.player_count, 4);
        assert_eq!(config.starting_hand_size, 0);
        assert_eq!(config.sba_iteration_cap, 5);
        assert!(!config.skip_first_draw);
        assert_eq!(config.priority_after_action, PriorityPolicy::RetainWithActor);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = GameConfig::two_player().with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
