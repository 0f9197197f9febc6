use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{error::ApiError, extract::ApiJson};
use crate::{
    auth::{self, MaybePlayer},
    game::session::LobbyView,
    models::Player,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub player: Player,
    /// Bearer token identifying this player for the rest of the session
    pub token: String,
}

/// Join the session on a team
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let player = state.session.register(&payload.name, &payload.team).await?;

    let token = auth::generate_token(
        player.id,
        &player.name,
        &state.config.security.jwt_secret,
        state.config.security.token_ttl_hours,
    )
    .map_err(|e| ApiError::Internal(format!("Failed to generate player token: {}", e)))?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { player, token })))
}

/// Roster, start readiness and the caller's own record
pub async fn lobby(State(state): State<Arc<AppState>>, caller: MaybePlayer) -> Json<LobbyView> {
    Json(state.session.lobby(caller.id()).await)
}
