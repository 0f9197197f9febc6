use thiserror::Error;

/// Session state that made an otherwise valid request impossible right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    RoundInProgress,
    RoundNotStarted,
    NotEnoughPlayers,
    TeamsUnbalanced,
    EmptyCatalog,
    DeckExhausted,
    NoPlayers,
}

impl Precondition {
    pub fn code(self) -> &'static str {
        match self {
            Precondition::RoundInProgress => "round_in_progress",
            Precondition::RoundNotStarted => "round_not_started",
            Precondition::NotEnoughPlayers => "not_enough_players",
            Precondition::TeamsUnbalanced => "teams_unbalanced",
            Precondition::EmptyCatalog => "empty_catalog",
            Precondition::DeckExhausted => "deck_exhausted",
            Precondition::NoPlayers => "no_players",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Precondition::RoundInProgress => "Round already started. End the round to join.",
            Precondition::RoundNotStarted => "No round is in progress.",
            Precondition::NotEnoughPlayers => "Add at least two players to start.",
            Precondition::TeamsUnbalanced => "Add at least one player to each team.",
            Precondition::EmptyCatalog => "No cards available in the catalog.",
            Precondition::DeckExhausted => "The deck is empty.",
            Precondition::NoPlayers => "No players are registered.",
        }
    }
}

/// Every way a session operation can be refused. None of them are fatal and
/// none of them leave the session partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{}", .0.message())]
    Precondition(Precondition),
    #[error("only the active clue-giver can do that")]
    Forbidden,
    #[error("unknown player")]
    UnknownPlayer,
}

impl GameError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidInput(detail.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidInput(_) => "invalid_input",
            GameError::Precondition(p) => p.code(),
            GameError::Forbidden => "forbidden",
            GameError::UnknownPlayer => "unknown_player",
        }
    }
}

impl From<Precondition> for GameError {
    fn from(p: Precondition) -> Self {
        GameError::Precondition(p)
    }
}

pub type GameResult<T> = Result<T, GameError>;
