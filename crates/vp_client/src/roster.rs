//! Roster and weapon provider for the public game-data API.
//!
//! Agent fetch failures fall back to the static roster; weapon fetch
//! failures yield an empty list.

use crate::config::{http_client, ClientConfig};
use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;
use vp_core::{Agent, Roster, Weapon};

/// `{ "status": 200, "data": [...] }`
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: u16,
    data: T,
}

/// Decode an envelope; any status other than 200 is an error.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    if envelope.status != 200 {
        return Err(ClientError::Status(envelope.status));
    }
    Ok(envelope.data)
}

pub fn parse_agent_response(body: &str) -> Result<Vec<Agent>> {
    parse_envelope(body)
}

pub fn parse_weapon_response(body: &str) -> Result<Vec<Weapon>> {
    parse_envelope(body)
}

pub struct RosterProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RosterProvider {
    pub fn new(game_api_base: &str, config: &ClientConfig) -> Self {
        Self {
            client: http_client(config.timeout),
            base_url: game_api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.game_api_base, config)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status().as_u16()));
        }
        Ok(resp.text().await?)
    }

    pub async fn try_fetch_agents(&self) -> Result<Vec<Agent>> {
        let body = self.get_text("/v1/agents?isPlayableCharacter=true").await?;
        parse_agent_response(&body)
    }

    /// Playable agents de-duplicated by name, or the fallback roster.
    pub async fn fetch_roster(&self) -> Roster {
        let started = Instant::now();
        match self.try_fetch_agents().await {
            Ok(agents) if !agents.is_empty() => {
                let roster = Roster::from_agents(agents);
                tracing::info!(
                    agents = roster.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "roster fetched"
                );
                roster
            }
            Ok(_) => {
                tracing::warn!("roster fetch returned no agents, using fallback roster");
                Roster::fallback()
            }
            Err(error) => {
                tracing::warn!(error = %error, "roster fetch failed, using fallback roster");
                Roster::fallback()
            }
        }
    }

    pub async fn try_fetch_weapons(&self) -> Result<Vec<Weapon>> {
        let body = self.get_text("/v1/weapons").await?;
        parse_weapon_response(&body)
    }

    pub async fn fetch_weapons(&self) -> Vec<Weapon> {
        match self.try_fetch_weapons().await {
            Ok(weapons) => weapons,
            Err(error) => {
                tracing::warn!(error = %error, "weapon fetch failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vp_core::Role;

    #[test]
    fn test_parse_agent_response() {
        let body = r#"{
            "status": 200,
            "data": [
                {"uuid": "add6443a", "displayName": "Jett", "displayIcon": "https://media.valorant-api.com/agents/add6443a/displayicon.png",
                 "role": {"uuid": "dbe8757e", "displayName": "Duelist"}},
                {"uuid": "569fdd95", "displayName": "Sova", "displayIcon": "", "role": {"displayName": "Initiator"}},
                {"uuid": "ded3520f", "displayName": "Sova", "displayIcon": "", "role": {"displayName": "Initiator"}}
            ]
        }"#;
        let agents = parse_agent_response(body).unwrap();
        assert_eq!(agents.len(), 3);
        assert_eq!(agents[0].role, Some(Role::Duelist));
        assert_eq!(Roster::from_agents(agents).len(), 2);
    }

    #[test]
    fn test_non_200_envelope_is_error() {
        let err = parse_agent_response(r#"{"status": 404, "data": []}"#).unwrap_err();
        assert!(matches!(err, ClientError::Status(404)));
        assert!(matches!(parse_agent_response("<html>"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_parse_weapon_response() {
        let body = r#"{"status": 200, "data": [
            {"uuid": "w1", "displayName": "Vandal", "displayIcon": null, "category": "EEquippableCategory::Rifle"}
        ]}"#;
        let weapons = parse_weapon_response(body).unwrap();
        assert_eq!(weapons[0].display_name, "Vandal");
    }
}
