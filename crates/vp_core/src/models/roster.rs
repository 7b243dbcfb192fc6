//! Session roster: de-duplicated, read-only list of agents.

use super::agent::{Agent, AgentId, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const FALLBACK_ICON_BASE: &str = "https://media.valorant-api.com/agents";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    /// Build a roster, keeping the first agent seen for each display name.
    pub fn from_agents(agents: impl IntoIterator<Item = Agent>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut dropped = 0usize;

        for agent in agents {
            if seen.insert(agent.display_name.clone()) {
                kept.push(agent);
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            log::debug!("Roster dropped {} duplicate agent(s) by display name", dropped);
        }

        Self { agents: kept }
    }

    /// Hard-coded roster used when the game-data API is unreachable.
    pub fn fallback() -> Self {
        Self::from_agents(fallback_agents())
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| &a.uuid == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Agent> {
        let name = name.trim();
        self.agents.iter().find(|a| a.display_name.eq_ignore_ascii_case(name))
    }

    pub fn bucket(&self, role: Role) -> Vec<&Agent> {
        self.agents.iter().filter(|a| a.has_role(role)).collect()
    }

    /// Agents sorted by display name, for pool grids and pick menus.
    pub fn sorted_by_name(&self) -> Vec<&Agent> {
        let mut sorted: Vec<&Agent> = self.agents.iter().collect();
        sorted.sort_by(|a, b| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()));
        sorted
    }
}

/// Five agents covering all four roles (two Duelists).
pub fn fallback_agents() -> Vec<Agent> {
    let icon = |uuid: &str| format!("{}/{}/displayicon.png", FALLBACK_ICON_BASE, uuid);
    vec![
        Agent::new("1", "Jett", Role::Duelist).with_icon(icon("add6443a-41bd-e414-f6ad-e58d267f4e95")),
        Agent::new("2", "Sage", Role::Sentinel).with_icon(icon("569fdd95-4d10-43ab-ca70-79becc718b46")),
        Agent::new("3", "Omen", Role::Controller).with_icon(icon("8e253930-4c05-31dd-1b6c-968525494517")),
        Agent::new("4", "Sova", Role::Initiator).with_icon(icon("ded3520f-4264-bfed-162d-b080e2af9527")),
        Agent::new("5", "Phoenix", Role::Duelist).with_icon(icon("eb93336a-449b-9c1b-0a54-a891f7921d69")),
    ]
}
