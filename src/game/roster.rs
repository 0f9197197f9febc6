use uuid::Uuid;

use super::error::{GameError, GameResult};
use crate::models::{Player, PlayerId, Team};

/// Longest display name accepted at registration
pub const MAX_NAME_LENGTH: usize = 32;

/// Registered players in join order. Join order is also turn order.
#[derive(Debug, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new player. The caller is responsible for rejecting
    /// registrations while a round is running.
    pub fn register(&mut self, name: &str, team: Team) -> GameResult<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::invalid("Enter a player name and choose a team."));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(GameError::invalid(format!(
                "Player names are limited to {} characters.",
                MAX_NAME_LENGTH
            )));
        }

        let player = Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            team,
        };
        self.players.push(player.clone());
        Ok(player)
    }

    /// At least two players with both teams represented
    pub fn can_start(&self) -> bool {
        self.players.len() >= 2 && Team::ALL.iter().all(|team| self.team_size(*team) > 0)
    }

    pub fn team_size(&self, team: Team) -> usize {
        self.players.iter().filter(|p| p.team == team).count()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn reset(&mut self) {
        self.players.clear();
    }
}
