//! vp_client: HTTP access to the game-data API (roster, weapons) and to the
//! pick persistence server. Nothing here blocks the reveal flow: every
//! failure degrades to fallback data or an empty result.

pub mod config;
pub mod error;
pub mod picks;
pub mod roster;

pub use config::{ClientConfig, API_BASE_ENV, GAME_API_BASE_ENV};
pub use error::{ClientError, Result};
pub use picks::PickClient;
pub use roster::{parse_agent_response, parse_weapon_response, RosterProvider};
