//! Pick persistence client.
//!
//! The plain methods never fail: errors are logged and turned into
//! `None` / empty / `false`. The `try_` variants surface the error.

use crate::config::{http_client, ClientConfig};
use crate::error::{ClientError, Result};
use vp_core::{Agent, AgentRecap, NewPick, PickLog, SelectionMode};

#[derive(Clone)]
pub struct PickClient {
    client: reqwest::Client,
    base_url: String,
}

impl PickClient {
    pub fn new(api_base: &str, config: &ClientConfig) -> Self {
        Self {
            client: http_client(config.timeout),
            base_url: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base, config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ensure_success(resp: &reqwest::Response) -> Result<()> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(resp.status().as_u16()))
        }
    }

    pub async fn try_log_pick(&self, mode: SelectionMode, agents: &[Agent]) -> Result<PickLog> {
        let body = NewPick { mode, picked_agents: agents.to_vec() };
        let resp = self.client.post(format!("{}/picks", self.base_url)).json(&body).send().await?;
        Self::ensure_success(&resp)?;
        Ok(resp.json().await?)
    }

    pub async fn log_pick(&self, mode: SelectionMode, agents: &[Agent]) -> Option<PickLog> {
        match self.try_log_pick(mode, agents).await {
            Ok(log) => {
                tracing::debug!(id = %log.id, mode = %mode, "pick logged");
                Some(log)
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to log pick");
                None
            }
        }
    }

    pub async fn try_get_history(&self, limit: usize, offset: usize) -> Result<Vec<PickLog>> {
        let resp = self
            .client
            .get(format!("{}/picks", self.base_url))
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        Self::ensure_success(&resp)?;
        Ok(resp.json().await?)
    }

    /// Newest first.
    pub async fn get_history(&self, limit: usize, offset: usize) -> Vec<PickLog> {
        self.try_get_history(limit, offset).await.unwrap_or_else(|error| {
            tracing::warn!(error = %error, "failed to fetch history");
            Vec::new()
        })
    }

    pub async fn try_get_recap(&self) -> Result<Vec<AgentRecap>> {
        let resp = self.client.get(format!("{}/stats/recap", self.base_url)).send().await?;
        Self::ensure_success(&resp)?;
        Ok(resp.json().await?)
    }

    pub async fn get_recap(&self) -> Vec<AgentRecap> {
        self.try_get_recap().await.unwrap_or_else(|error| {
            tracing::warn!(error = %error, "failed to fetch recap");
            Vec::new()
        })
    }

    pub async fn try_delete_pick(&self, id: &str) -> Result<()> {
        let resp = self.client.delete(format!("{}/picks/{}", self.base_url, id)).send().await?;
        Self::ensure_success(&resp)
    }

    /// `true` iff the server answered 2xx.
    pub async fn delete_pick(&self, id: &str) -> bool {
        match self.try_delete_pick(id).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(id, error = %error, "failed to delete pick");
                false
            }
        }
    }
}
