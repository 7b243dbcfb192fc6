//! Pick logs, history paging and recap sorting.

use crate::models::Agent;
use crate::selection::SelectionMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const HISTORY_PAGE_SIZE: usize = 20;

/// One persisted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickLog {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// `full`, `balance`, or `unknown` when the client sent none.
    pub mode: String,
    pub picked_agents: Vec<Agent>,
}

impl PickLog {
    pub fn selection_mode(&self) -> Option<SelectionMode> {
        self.mode.parse().ok()
    }

    /// `Jett, Sage, Omen`
    pub fn squad_names(&self) -> String {
        self.picked_agents.iter().map(|a| a.display_name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

/// Request body for a new pick log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPick {
    pub mode: SelectionMode,
    pub picked_agents: Vec<Agent>,
}

/// How often an agent appeared across all stored picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecap {
    pub agent_name: String,
    #[serde(default)]
    pub agent_role: Option<String>,
    #[serde(default)]
    pub agent_icon: Option<String>,
    pub pick_count: u64,
}

/// Accumulates history pages fetched with limit/offset.
#[derive(Debug, Clone)]
pub struct HistoryPager {
    entries: Vec<PickLog>,
    page_size: usize,
    has_more: bool,
}

impl Default for HistoryPager {
    fn default() -> Self {
        Self::with_page_size(HISTORY_PAGE_SIZE)
    }
}

impl HistoryPager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self { entries: Vec::new(), page_size: page_size.max(1), has_more: true }
    }

    pub fn entries(&self) -> &[PickLog] {
        &self.entries
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Offset for the next fetch: number of entries already loaded.
    pub fn next_offset(&self) -> usize {
        self.entries.len()
    }

    /// The last page came back full, so another may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Append a fetched page. Ids already loaded are skipped.
    pub fn push_page(&mut self, page: Vec<PickLog>) {
        self.has_more = page.len() == self.page_size;
        for log in page {
            if !self.entries.iter().any(|e| e.id == log.id) {
                self.entries.push(log);
            }
        }
    }

    /// Drop a deleted entry locally. Returns `true` if it was loaded.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.has_more = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecapSortField {
    #[default]
    PickCount,
    AgentName,
    AgentRole,
}

impl std::str::FromStr for RecapSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "pick_count" => Ok(RecapSortField::PickCount),
            "name" | "agent_name" => Ok(RecapSortField::AgentName),
            "role" | "agent_role" => Ok(RecapSortField::AgentRole),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

/// Current recap ordering; defaults to most-picked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecapSort {
    pub field: RecapSortField,
    pub descending: bool,
}

impl Default for RecapSort {
    fn default() -> Self {
        Self { field: RecapSortField::PickCount, descending: true }
    }
}

impl RecapSort {
    /// Clicking the active column flips direction; a new column starts descending.
    pub fn select(&mut self, field: RecapSortField) {
        if self.field == field {
            self.descending = !self.descending;
        } else {
            self.field = field;
            self.descending = true;
        }
    }

    pub fn apply(&self, rows: &mut [AgentRecap]) {
        sort_recap(rows, self.field, self.descending);
    }
}

/// Stable sort of recap rows.
pub fn sort_recap(rows: &mut [AgentRecap], field: RecapSortField, descending: bool) {
    rows.sort_by(|a, b| {
        let ord = compare(a, b, field);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn compare(a: &AgentRecap, b: &AgentRecap, field: RecapSortField) -> Ordering {
    match field {
        RecapSortField::PickCount => a.pick_count.cmp(&b.pick_count),
        RecapSortField::AgentName => a.agent_name.cmp(&b.agent_name),
        RecapSortField::AgentRole => a.agent_role.cmp(&b.agent_role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn log(id: &str) -> PickLog {
        PickLog {
            id: id.to_string(),
            created_at: Utc::now(),
            mode: "full".to_string(),
            picked_agents: vec![Agent::new("1", "Jett", Role::Duelist)],
        }
    }

    fn recap(name: &str, role: &str, count: u64) -> AgentRecap {
        AgentRecap {
            agent_name: name.to_string(),
            agent_role: Some(role.to_string()),
            agent_icon: None,
            pick_count: count,
        }
    }

    #[test]
    fn test_pager_has_more_follows_page_fill() {
        let mut pager = HistoryPager::with_page_size(2);
        assert!(pager.has_more());

        pager.push_page(vec![log("a"), log("b")]);
        assert!(pager.has_more());
        assert_eq!(pager.next_offset(), 2);

        pager.push_page(vec![log("c")]);
        assert!(!pager.has_more());
        assert_eq!(pager.next_offset(), 3);
    }

    #[test]
    fn test_pager_remove_and_dedupe() {
        let mut pager = HistoryPager::new();
        pager.push_page(vec![log("a"), log("b")]);

        assert!(pager.remove("a"));
        assert!(!pager.remove("a"));
        assert_eq!(pager.next_offset(), 1);

        pager.push_page(vec![log("b"), log("c")]);
        let ids: Vec<_> = pager.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_pick_log_wire_shape() {
        let json = r#"{
            "id": "5b1c",
            "created_at": "2026-03-01T12:00:00.000Z",
            "mode": "balance",
            "picked_agents": [{"uuid": "2", "displayName": "Sage", "role": {"displayName": "Sentinel"}}]
        }"#;
        let log: PickLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.selection_mode(), Some(SelectionMode::RoleBalanced));
        assert_eq!(log.squad_names(), "Sage");
        assert_eq!(log.picked_agents[0].role, Some(Role::Sentinel));
    }

    #[test]
    fn test_sort_recap() {
        let mut rows = vec![recap("Sage", "Sentinel", 3), recap("Jett", "Duelist", 7), recap("Omen", "Controller", 5)];

        sort_recap(&mut rows, RecapSortField::PickCount, true);
        assert_eq!(rows.iter().map(|r| r.pick_count).collect::<Vec<_>>(), vec![7, 5, 3]);

        sort_recap(&mut rows, RecapSortField::AgentName, false);
        assert_eq!(rows[0].agent_name, "Jett");

        sort_recap(&mut rows, RecapSortField::AgentRole, false);
        assert_eq!(rows[0].agent_role.as_deref(), Some("Controller"));
    }

    #[test]
    fn test_recap_sort_toggle() {
        let mut sort = RecapSort::default();
        sort.select(RecapSortField::PickCount);
        assert!(!sort.descending);

        sort.select(RecapSortField::AgentName);
        assert_eq!(sort.field, RecapSortField::AgentName);
        assert!(sort.descending);
    }
}
