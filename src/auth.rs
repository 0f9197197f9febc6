use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{models::PlayerId, routes::error::ApiError, AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Player ID
    pub name: String, // Display name at registration
    pub exp: usize,   // Expiration time
}

/// The player a request speaks for. The session decides whether that id
/// still means anything.
#[derive(Debug, Clone)]
pub struct AuthenticatedPlayer {
    pub player_id: PlayerId,
    pub name: String,
}

/// Like `AuthenticatedPlayer`, but anonymous requests are allowed through
#[derive(Debug, Clone)]
pub struct MaybePlayer(pub Option<AuthenticatedPlayer>);

impl MaybePlayer {
    pub fn id(&self) -> Option<PlayerId> {
        self.0.as_ref().map(|p| p.player_id)
    }
}

/// Bearer header first, then a `token` query parameter (for WebSocket clients)
fn token_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(String::from)
        .or_else(|| {
            parts
                .uri
                .query()
                .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
                .and_then(|params| {
                    params
                        .into_iter()
                        .find(|(k, _)| k == "token")
                        .map(|(_, v)| v)
                })
        })
}

pub fn verify_token(token: &str, jwt_secret: &str) -> Result<AuthenticatedPlayer, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;

    let player_id = token_data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| ApiError::Unauthorized)?;

    Ok(AuthenticatedPlayer {
        player_id,
        name: token_data.claims.name,
    })
}

/// Extractor for registered players from JWT tokens
impl<S> FromRequestParts<S> for AuthenticatedPlayer
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let app_state = Arc::<AppState>::from_ref(state);
        let token = token_from_parts(parts);

        async move {
            let token = token.ok_or(ApiError::Unauthorized)?;
            verify_token(&token, &app_state.config.security.jwt_secret)
        }
    }
}

/// A present but invalid token is still rejected
impl<S> FromRequestParts<S> for MaybePlayer
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let app_state = Arc::<AppState>::from_ref(state);
        let token = token_from_parts(parts);

        async move {
            match token {
                Some(token) => {
                    verify_token(&token, &app_state.config.security.jwt_secret)
                        .map(|player| MaybePlayer(Some(player)))
                }
                None => Ok(MaybePlayer(None)),
            }
        }
    }
}

/// Generate a JWT token for a freshly registered player
pub fn generate_token(
    player_id: PlayerId,
    name: &str,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp();

    let claims = Claims {
        sub: player_id.to_string(),
        name: name.to_string(),
        exp: expiration.max(0) as usize,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(jwt_secret.as_ref()),
    )
}
