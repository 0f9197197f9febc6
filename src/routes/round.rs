use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{error::ApiError, extract::ApiJson};
use crate::{
    auth::{AuthenticatedPlayer, MaybePlayer},
    game::{session::ActionOutcome, ActionKind, RoundView},
    models::Player,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct StartRoundRequest {
    #[serde(default)]
    pub time_limit_seconds: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub active_player: Player,
}

/// Load the catalog, then start a round with it. The body is optional.
pub async fn start_round(
    State(state): State<Arc<AppState>>,
    payload: Option<ApiJson<StartRoundRequest>>,
) -> Result<Json<RoundView>, ApiError> {
    let payload = payload.map(|ApiJson(p)| p).unwrap_or_default();

    // Read cards before taking the session lock
    let entries = state.catalog.load().await.map_err(|e| {
        tracing::error!("Failed to load card catalog: {:#}", e);
        ApiError::Internal("Card catalog unavailable".to_string())
    })?;

    let view = state
        .session
        .start_round(&entries, payload.time_limit_seconds)
        .await?;
    Ok(Json(view))
}

/// The caller's view of the current round
pub async fn view_state(
    State(state): State<Arc<AppState>>,
    caller: MaybePlayer,
) -> Result<Json<RoundView>, ApiError> {
    Ok(Json(state.session.view_state(caller.id()).await?))
}

/// Clue-giver reports correct / taboo / pass for the current card
pub async fn record_action(
    State(state): State<Arc<AppState>>,
    player: AuthenticatedPlayer,
    ApiJson(payload): ApiJson<ActionRequest>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let kind: ActionKind = payload.action.parse()?;
    tracing::debug!(
        "Player {} ({}) submitting {:?}",
        player.name,
        player.player_id,
        kind
    );

    let outcome = state.session.record_action(player.player_id, kind).await?;
    Ok(Json(outcome))
}

/// Clue-giver hands the role to the next player
pub async fn advance_turn(
    State(state): State<Arc<AppState>>,
    player: AuthenticatedPlayer,
) -> Result<Json<TurnResponse>, ApiError> {
    let active_player = state.session.advance_turn(player.player_id).await?;
    Ok(Json(TurnResponse { active_player }))
}

/// Clear everything; all issued tokens stop resolving to players
pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.reset().await;
    StatusCode::NO_CONTENT
}
