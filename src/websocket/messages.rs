use serde::{Deserialize, Serialize};

use crate::game::{RoundView, SessionEvent};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for a fresh copy of the caller's view
    Refresh,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State { view: RoundView },
    Event { event: SessionEvent },
    Error { message: String },
}
