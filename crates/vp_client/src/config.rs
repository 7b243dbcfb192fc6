//! Endpoint configuration from environment.

use std::env;
use std::time::Duration;

pub const API_BASE_ENV: &str = "VP_API_BASE";
pub const GAME_API_BASE_ENV: &str = "VP_GAME_API_BASE";

pub const DEFAULT_API_BASE: &str = "http://localhost:3001/api";
pub const DEFAULT_GAME_API_BASE: &str = "https://valorant-api.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Pick persistence server, including the `/api` prefix.
    pub api_base: String,
    /// Public game-data API root (no `/v1`).
    pub game_api_base: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            game_api_base: DEFAULT_GAME_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = env_value(API_BASE_ENV) {
            config.api_base = base;
        }
        if let Some(base) = env_value(GAME_API_BASE_ENV) {
            config.game_api_base = base;
        }
        config
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap_or_default()
}
