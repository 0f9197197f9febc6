// Game engine: a single Taboo session and the pieces it is built from

pub mod deck;
pub mod error;
pub mod roster;
pub mod scoreboard;
pub mod session;
pub mod shared;
pub mod turn;

pub use error::{GameError, Precondition};
pub use scoreboard::ActionKind;
pub use session::{RoundView, SessionSettings};
pub use shared::{SessionEvent, SharedSession};
