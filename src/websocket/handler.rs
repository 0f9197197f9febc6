use crate::{
    auth::MaybePlayer,
    game::SessionEvent,
    models::PlayerId,
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};

/// WebSocket upgrade handler. Anonymous clients get the redacted view.
pub async fn handle_websocket(
    caller: MaybePlayer,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let requester = caller.id();
    tracing::info!("WebSocket connection requested by {:?}", requester);
    ws.on_upgrade(move |socket| handle_socket(socket, state, requester))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, requester: Option<PlayerId>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let events = state.session.subscribe();

    send_state(&state, requester, &tx).await;

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Forward session events, each followed by the caller's new view
    let mut event_task = tokio::spawn(forward_events(events, state.clone(), requester, tx.clone()));

    // Handle incoming messages from the client
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => handle_client_text(&text, &recv_state, requester, &tx).await,
                Message::Close(_) => {
                    tracing::info!("Client disconnected: {:?}", requester);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            event_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            event_task.abort();
        }
        _ = (&mut event_task) => {
            send_task.abort();
            recv_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed for {:?}", requester);
}

/// Relay every session event to one connection, each followed by that
/// connection's own view. Ends when the client side or the session goes away.
async fn forward_events(
    mut events: broadcast::Receiver<SessionEvent>,
    state: Arc<AppState>,
    requester: Option<PlayerId>,
    tx: mpsc::Sender<ServerMessage>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if tx.send(ServerMessage::Event { event }).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("WebSocket subscriber lagged by {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
        send_state(&state, requester, &tx).await;
    }
}

async fn handle_client_text(
    text: &str,
    state: &AppState,
    requester: Option<PlayerId>,
    tx: &mpsc::Sender<ServerMessage>,
) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Refresh) => send_state(state, requester, tx).await,
        Err(e) => {
            tracing::debug!("Failed to parse message: {}", e);
            let error_msg = ServerMessage::Error {
                message: format!("Invalid message format: {}", e),
            };
            let _ = tx.send(error_msg).await;
        }
    }
}

async fn send_state(
    state: &AppState,
    requester: Option<PlayerId>,
    tx: &mpsc::Sender<ServerMessage>,
) {
    let message = match state.session.view_state(requester).await {
        Ok(view) => ServerMessage::State { view },
        Err(e) => ServerMessage::Error {
            message: e.to_string(),
        },
    };
    let _ = tx.send(message).await;
}
