pub mod card;
pub mod player;

pub use card::{Card, RawEntry};
pub use player::{Player, PlayerId, Team};
