//! Phases and steps of a turn.

use serde::{Deserialize, Serialize};

/// The five phases of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PrecombatMain,
    Combat,
    PostcombatMain,
    Ending,
}

/// Steps in turn order. The main phases have no steps, so each appears
/// here as a single step of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Untap,
    Upkeep,
    Draw,
    PrecombatMain,
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,
    PostcombatMain,
    End,
    Cleanup,
}

impl Step {
    pub const ALL: [Step; 12] = [
        Step::Untap,
        Step::Upkeep,
        Step::Draw,
        Step::PrecombatMain,
        Step::BeginCombat,
        Step::DeclareAttackers,
        Step::DeclareBlockers,
        Step::CombatDamage,
        Step::EndCombat,
        Step::PostcombatMain,
        Step::End,
        Step::Cleanup,
    ];

    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::PrecombatMain => Phase::PrecombatMain,
            Step::BeginCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::CombatDamage
            | Step::EndCombat => Phase::Combat,
            Step::PostcombatMain => Phase::PostcombatMain,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// The following step in the same turn, `None` after cleanup.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        let index = Step::ALL.iter().position(|s| *s == self)?;
        Step::ALL.get(index + 1).copied()
    }

    /// The step the turn actually moves to. With no attackers declared the
    /// declare blockers and combat damage steps are skipped.
    #[must_use]
    pub fn next_played(self) -> Option<Step> {
        let mut next = self.next();
        while let Some(step @ (Step::DeclareBlockers | Step::CombatDamage)) = next {
            next = step.next();
        }
        next
    }

    /// Whether players receive priority in this step as a matter of course.
    /// Cleanup grants it only when something happened during the step.
    #[must_use]
    pub const fn grants_priority(self) -> bool {
        !matches!(self, Step::Untap | Step::Cleanup)
    }

    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Step::PrecombatMain | Step::PostcombatMain)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Untap => "untap",
            Step::Upkeep => "upkeep",
            Step::Draw => "draw",
            Step::PrecombatMain => "precombat main",
            Step::BeginCombat => "beginning of combat",
            Step::DeclareAttackers => "declare attackers",
            Step::DeclareBlockers => "declare blockers",
            Step::CombatDamage => "combat damage",
            Step::EndCombat => "end of combat",
            Step::PostcombatMain => "postcombat main",
            Step::End => "end",
            Step::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_sequence() {
        assert_eq!(Step::Untap.next(), Some(Step::Upkeep));
        assert_eq!(Step::DeclareAttackers.next(), Some(Step::DeclareBlockers));
        assert_eq!(Step::Cleanup.next(), None);
    }

    #[test]
    fn test_played_sequence_skips_blocks_and_damage() {
        assert_eq!(Step::DeclareAttackers.next_played(), Some(Step::EndCombat));
        assert_eq!(Step::Draw.next_played(), Some(Step::PrecombatMain));

        let mut played = vec![Step::Untap];
        while let Some(step) = played.last().and_then(|s| s.next_played()) {
            played.push(step);
        }
        assert_eq!(played.len(), 10);
        assert_eq!(played.last(), Some(&Step::Cleanup));
    }

    #[test]
    fn test_phases_and_priority() {
        assert_eq!(Step::Draw.phase(), Phase::Beginning);
        assert_eq!(Step::CombatDamage.phase(), Phase::Combat);
        assert!(Step::PostcombatMain.is_main());
        assert!(!Step::Untap.grants_priority());
        assert!(!Step::Cleanup.grants_priority());
        assert!(Step::End.grants_priority());
        assert_eq!(Step::BeginCombat.to_string(), "beginning of combat");
    }
}
