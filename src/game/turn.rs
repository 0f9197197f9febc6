use super::error::{GameResult, Precondition};
use super::roster::Roster;
use crate::models::Player;

/// Tracks the clue-giver as an index into the roster
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TurnTracker {
    turn_index: usize,
}

impl TurnTracker {
    pub fn current<'a>(&self, roster: &'a Roster) -> GameResult<&'a Player> {
        if roster.is_empty() {
            return Err(Precondition::NoPlayers.into());
        }
        roster
            .at(self.turn_index % roster.len())
            .ok_or(Precondition::NoPlayers.into())
    }

    /// Callers must check the roster is non-empty first
    pub fn advance(&mut self, roster: &Roster) {
        if roster.is_empty() {
            return;
        }
        self.turn_index = (self.turn_index + 1) % roster.len();
    }

    pub fn index(&self) -> usize {
        self.turn_index
    }

    pub fn reset(&mut self) {
        self.turn_index = 0;
    }
}
