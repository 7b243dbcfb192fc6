use crate::models::{Agent, AgentId};
use serde::{Deserialize, Serialize};

/// One squad slot as rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSlot {
    /// Provisional while shuffling or flickering; final once `finalized`.
    pub agent: Option<Agent>,
    /// Pinned by the user; immune to runs, rerolls and substitutions.
    pub locked: bool,
    /// Holds its terminal value for the current run.
    pub finalized: bool,
    /// A single-slot reroll is flickering this slot.
    pub rerolling: bool,
}

impl ResultSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn agent_id(&self) -> Option<&AgentId> {
        self.agent.as_ref().map(|a| &a.uuid)
    }

    pub fn holds(&self, id: &AgentId) -> bool {
        self.agent_id() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.agent.is_none()
    }

    /// Repaintable by shuffle frames.
    pub fn is_animating(&self) -> bool {
        !self.locked && !self.finalized
    }
}

/// True when no agent id appears in two non-empty slots.
pub fn all_distinct(slots: &[ResultSlot]) -> bool {
    let mut seen = std::collections::HashSet::new();
    slots.iter().filter_map(|s| s.agent_id()).all(|id| seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_all_distinct() {
        let jett = Agent::new("1", "Jett", Role::Duelist);
        let sage = Agent::new("2", "Sage", Role::Sentinel);
        let slot = |a: &Agent| ResultSlot { agent: Some(a.clone()), ..ResultSlot::empty() };

        assert!(all_distinct(&[slot(&jett), ResultSlot::empty(), slot(&sage), ResultSlot::empty()]));
        assert!(!all_distinct(&[slot(&jett), slot(&sage), slot(&jett)]));
    }
}
