pub mod error;
pub mod extract;
pub mod health;
pub mod players;
pub mod round;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/players", post(players::register).get(players::lobby))
        .route("/round", post(round::start_round))
        .route("/round/state", get(round::view_state))
        .route("/round/actions", post(round::record_action))
        .route("/round/turn/advance", post(round::advance_turn))
        .route("/round/reset", post(round::reset))
}
