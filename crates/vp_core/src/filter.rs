//! Ban list ("exclusion set") and pool queries.

use crate::models::{Agent, AgentId, Role, Roster};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet {
    ids: BTreeSet<AgentId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_excluded(&self, agent: &Agent) -> bool {
        self.ids.contains(&agent.uuid)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentId> {
        self.ids.iter()
    }

    pub fn insert(&mut self, id: AgentId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &AgentId) -> bool {
        self.ids.remove(id)
    }

    /// Ban or unban one agent. Returns `true` if the agent is now banned.
    pub fn toggle_agent(&mut self, id: &AgentId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Ban every agent of `role`, or unban them all when all are already banned.
    /// Returns `true` if the role ended up fully banned.
    pub fn toggle_role(&mut self, roster: &Roster, role: Role) -> bool {
        let members = roster.bucket(role);
        let all_banned = members.iter().all(|a| self.ids.contains(&a.uuid));

        for agent in members {
            if all_banned {
                self.ids.remove(&agent.uuid);
            } else {
                self.ids.insert(agent.uuid.clone());
            }
        }
        !all_banned
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Roster agents not banned.
    pub fn pool<'a>(&self, roster: &'a Roster) -> Vec<&'a Agent> {
        roster.agents().iter().filter(|a| !self.is_excluded(a)).collect()
    }

    /// Whether a full-random squad of `player_count` can be drawn.
    pub fn is_valid_config(&self, roster: &Roster, player_count: usize) -> bool {
        self.pool(roster).len() >= player_count
    }
}

impl FromIterator<AgentId> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = AgentId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}
