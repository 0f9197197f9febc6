use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use super::error::GameResult;
use super::scoreboard::ActionKind;
use super::session::{ActionOutcome, LobbyView, RoundView, Session, SessionSettings};
use crate::models::{Player, PlayerId, RawEntry, Team};

/// Buffered events per subscriber before it starts lagging
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Emitted after every successful mutation. Carries nothing that would leak
/// the current word; subscribers fetch their own view afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    PlayerJoined { player: Player },
    RoundStarted { time_limit_seconds: u32 },
    ActionRecorded { action: ActionKind, team: Team },
    TurnAdvanced { active_player: Player },
    RoundEnded,
    SessionReset,
}

/// The one session of the process behind a single exclusive lock.
///
/// Every operation, reads included, takes the same lock, so callers always
/// see a fully applied state and turn-ownership checks happen in the same
/// critical section as the mutation they guard.
pub struct SharedSession {
    inner: Mutex<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl SharedSession {
    pub fn new(settings: SessionSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(Session::new(settings)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn register(&self, name: &str, team: &str) -> GameResult<Player> {
        let player = self.inner.lock().await.register(name, team)?;
        self.publish(SessionEvent::PlayerJoined {
            player: player.clone(),
        });
        Ok(player)
    }

    /// `entries` must already be loaded; no I/O happens under the lock.
    pub async fn start_round(
        &self,
        entries: &[RawEntry],
        time_limit_seconds: Option<u32>,
    ) -> GameResult<RoundView> {
        let view = {
            let mut session = self.inner.lock().await;
            session.start_round(entries, time_limit_seconds)?;
            session.view_state(None)?
        };
        self.publish(SessionEvent::RoundStarted {
            time_limit_seconds: view.time_limit_seconds,
        });
        Ok(view)
    }

    pub async fn view_state(&self, requester: Option<PlayerId>) -> GameResult<RoundView> {
        self.inner.lock().await.view_state(requester)
    }

    pub async fn lobby(&self, requester: Option<PlayerId>) -> LobbyView {
        self.inner.lock().await.lobby(requester)
    }

    pub async fn record_action(
        &self,
        requester: PlayerId,
        kind: ActionKind,
    ) -> GameResult<ActionOutcome> {
        let outcome = self.inner.lock().await.record_action(requester, kind)?;
        self.publish(SessionEvent::ActionRecorded {
            action: outcome.action,
            team: outcome.team,
        });
        if outcome.round_over {
            self.publish(SessionEvent::RoundEnded);
        }
        Ok(outcome)
    }

    pub async fn advance_turn(&self, requester: PlayerId) -> GameResult<Player> {
        let next = self.inner.lock().await.advance_turn(requester)?;
        self.publish(SessionEvent::TurnAdvanced {
            active_player: next.clone(),
        });
        Ok(next)
    }

    pub async fn reset(&self) {
        self.inner.lock().await.reset();
        self.publish(SessionEvent::SessionReset);
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        if self.events.send(event).is_err() {
            tracing::trace!("No session event subscribers");
        }
    }
}
