use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque player identifier, issued at registration
pub type PlayerId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// The team that is allowed to watch the card while `self` gives clues
    pub fn other(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTeam(pub String);

impl FromStr for Team {
    type Err = UnknownTeam;

    /// Accepts "red" / "blue" in any case, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            other => Err(UnknownTeam(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_parsing_is_case_insensitive() {
        assert_eq!(" RED ".parse::<Team>(), Ok(Team::Red));
        assert_eq!("Blue".parse::<Team>(), Ok(Team::Blue));
        assert!("green".parse::<Team>().is_err());
        assert!("".parse::<Team>().is_err());
    }

    #[test]
    fn test_other_team() {
        assert_eq!(Team::Red.other(), Team::Blue);
        assert_eq!(Team::Blue.other(), Team::Red);
    }

    #[test]
    fn test_team_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Team::Blue).unwrap(), "\"blue\"");
    }
}
