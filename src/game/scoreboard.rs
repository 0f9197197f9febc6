use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::GameError;
use crate::models::Team;

/// What the clue-giver reports for the current card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Correct,
    Taboo,
    Pass,
}

impl FromStr for ActionKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "correct" => Ok(ActionKind::Correct),
            "taboo" => Ok(ActionKind::Taboo),
            "pass" => Ok(ActionKind::Pass),
            other => Err(GameError::invalid(format!("Unknown action '{}'.", other))),
        }
    }
}

impl ActionKind {
    /// Score change applied to the clue-giver's team
    pub fn delta(self) -> i64 {
        match self {
            ActionKind::Correct => 1,
            ActionKind::Taboo => -1,
            ActionKind::Pass => 0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub red: u32,
    pub blue: u32,
    pub passes: u32,
}

impl Scoreboard {
    pub fn score(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    /// Apply a delta, flooring the team's score at zero
    pub fn apply(&mut self, team: Team, delta: i64) -> u32 {
        let slot = match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        };
        let next = (*slot as i64 + delta).clamp(0, u32::MAX as i64);
        *slot = next as u32;
        *slot
    }

    pub fn record(&mut self, team: Team, kind: ActionKind) -> u32 {
        if kind == ActionKind::Pass {
            self.passes += 1;
        }
        self.apply(team, kind.delta())
    }

    /// Team with the higher score, `None` on a tie
    pub fn leader(&self) -> Option<Team> {
        match self.red.cmp(&self.blue) {
            std::cmp::Ordering::Greater => Some(Team::Red),
            std::cmp::Ordering::Less => Some(Team::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_taboo_never_goes_below_zero() {
        let mut board = Scoreboard::default();
        assert_eq!(board.record(Team::Red, ActionKind::Taboo), 0);
        assert_eq!(board.record(Team::Red, ActionKind::Correct), 1);
        assert_eq!(board.record(Team::Red, ActionKind::Taboo), 0);
    }

    #[test]
    fn test_pass_counts_but_does_not_score() {
        let mut board = Scoreboard::default();
        board.record(Team::Blue, ActionKind::Correct);
        assert_eq!(board.record(Team::Blue, ActionKind::Pass), 1);
        assert_eq!(board.passes, 1);
        assert_eq!(board.red, 0);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("Correct".parse::<ActionKind>(), Ok(ActionKind::Correct));
        assert_eq!(" pass".parse::<ActionKind>(), Ok(ActionKind::Pass));
        assert!(matches!(
            "skip".parse::<ActionKind>(),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_leader() {
        let mut board = Scoreboard::default();
        assert_eq!(board.leader(), None);
        board.record(Team::Blue, ActionKind::Correct);
        assert_eq!(board.leader(), Some(Team::Blue));
        board.reset();
        assert_eq!(board, Scoreboard::default());
    }

    fn action() -> impl Strategy<Value = (Team, ActionKind)> {
        (
            prop_oneof![Just(Team::Red), Just(Team::Blue)],
            prop_oneof![
                Just(ActionKind::Correct),
                Just(ActionKind::Taboo),
                Just(ActionKind::Pass)
            ],
        )
    }

    proptest! {
        #[test]
        fn prop_score_bounded_by_correct_count(actions in prop::collection::vec(action(), 0..200)) {
            let mut board = Scoreboard::default();
            let mut corrects = [0u32; 2];
            let mut passes = 0u32;

            for (team, kind) in actions {
                let before = board.score(team);
                let after = board.record(team, kind);
                match kind {
                    ActionKind::Correct => {
                        corrects[team as usize] += 1;
                        prop_assert_eq!(after, before + 1);
                    }
                    ActionKind::Taboo => prop_assert_eq!(after, before.saturating_sub(1)),
                    ActionKind::Pass => {
                        passes += 1;
                        prop_assert_eq!(after, before);
                    }
                }
                prop_assert!(board.score(team) <= corrects[team as usize]);
            }
            prop_assert_eq!(board.passes, passes);
        }
    }
}
