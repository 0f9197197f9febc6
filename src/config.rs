use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::game::SessionSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional frontend served at the root
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub catalog_path: String,
    pub default_time_limit: u32,
    pub max_time_limit: u32,
    pub shuffle_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "./frontend".to_string()),
        };

        let security = SecurityConfig {
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("TOKEN_TTL_HOURS must be a number")?,
        };

        let game = GameConfig {
            catalog_path: env::var("GAME_CATALOG_PATH")
                .unwrap_or_else(|_| "./cards.json".to_string()),
            default_time_limit: env::var("GAME_DEFAULT_TIME_LIMIT")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("GAME_DEFAULT_TIME_LIMIT must be a number of seconds")?,
            max_time_limit: env::var("GAME_MAX_TIME_LIMIT")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("GAME_MAX_TIME_LIMIT must be a number of seconds")?,
            shuffle_seed: env::var("GAME_SHUFFLE_SEED")
                .ok()
                .map(|seed| seed.parse())
                .transpose()
                .context("GAME_SHUFFLE_SEED must be an unsigned integer")?,
        };

        if game.default_time_limit == 0 || game.default_time_limit > game.max_time_limit {
            anyhow::bail!(
                "GAME_DEFAULT_TIME_LIMIT must be between 1 and GAME_MAX_TIME_LIMIT ({})",
                game.max_time_limit
            );
        }

        Ok(Config {
            server,
            security,
            game,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            default_time_limit: self.game.default_time_limit,
            max_time_limit: self.game.max_time_limit,
            shuffle_seed: self.game.shuffle_seed,
        }
    }

    /// Configuration for tests: fixed secret and shuffle seed
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                static_dir: "./frontend".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: "test-secret".to_string(),
                token_ttl_hours: 1,
            },
            game: GameConfig {
                catalog_path: "./cards.json".to_string(),
                default_time_limit: 60,
                max_time_limit: 600,
                shuffle_seed: Some(11),
            },
        }
    }
}
