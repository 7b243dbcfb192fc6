//! SQLite storage for pick logs.
//!
//! One table, `agent_picks`; `picked_agents` holds the JSON array exactly as
//! the client sent it. Access is serialised behind a single connection.

use crate::error::{Result, ServerError};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS agent_picks (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    mode          TEXT NOT NULL,
    picked_agents TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_agent_picks_created_at ON agent_picks (created_at);
";

const RECAP_SQL: &str = "
SELECT
    json_extract(agent.value, '$.displayName')      AS agent_name,
    json_extract(agent.value, '$.role.displayName') AS agent_role,
    json_extract(agent.value, '$.displayIcon')      AS agent_icon,
    COUNT(*)                                        AS pick_count
FROM agent_picks, json_each(agent_picks.picked_agents) AS agent
WHERE json_extract(agent.value, '$.displayName') IS NOT NULL
GROUP BY agent_name, agent_role, agent_icon
ORDER BY pick_count DESC, agent_name ASC
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRow {
    pub id: String,
    /// RFC 3339, millisecond precision, UTC.
    pub created_at: String,
    pub mode: String,
    pub picked_agents: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapRow {
    pub agent_name: String,
    pub agent_role: Option<String>,
    pub agent_icon: Option<String>,
    pub pick_count: u64,
}

pub struct PickStore {
    conn: Mutex<Connection>,
}

impl PickStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "pick store opened");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ServerError::LockPoisoned)
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn to_pick(raw: (String, String, String, String)) -> Result<PickRow> {
        let (id, created_at, mode, agents) = raw;
        Ok(PickRow { id, created_at, mode, picked_agents: serde_json::from_str(&agents)? })
    }

    /// `picked_agents` must be a JSON array.
    pub fn insert(&self, mode: &str, picked_agents: &Value) -> Result<PickRow> {
        if !picked_agents.is_array() {
            return Err(ServerError::InvalidPayload);
        }
        let row = PickRow {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            mode: mode.to_string(),
            picked_agents: picked_agents.clone(),
        };
        self.conn()?.execute(
            "INSERT INTO agent_picks (id, created_at, mode, picked_agents) VALUES (?1, ?2, ?3, ?4)",
            params![row.id, row.created_at, row.mode, serde_json::to_string(&row.picked_agents)?],
        )?;
        tracing::debug!(id = %row.id, mode = %row.mode, "pick stored");
        Ok(row)
    }

    /// Newest first.
    pub fn list(&self, limit: u32, offset: u32) -> Result<Vec<PickRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, created_at, mode, picked_agents FROM agent_picks
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
        )?;
        let raw = stmt
            .query_map(params![limit, offset], Self::read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter().map(Self::to_pick).collect()
    }

    /// Returns `false` when no row had this id.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.conn()?.execute("DELETE FROM agent_picks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Total stored picks.
    pub fn count(&self) -> Result<u64> {
        let n: i64 = self.conn()?.query_row("SELECT COUNT(*) FROM agent_picks", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Appearance count per (name, role, icon), most picked first.
    pub fn recap(&self) -> Result<Vec<RecapRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(RECAP_SQL)?;
        let rows = stmt
            .query_map([], |row| {
                let count: i64 = row.get(3)?;
                Ok(RecapRow {
                    agent_name: row.get(0)?,
                    agent_role: row.get(1)?,
                    agent_icon: row.get(2)?,
                    pick_count: count as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent(name: &str, role: &str) -> Value {
        json!({ "uuid": name.to_lowercase(), "displayName": name, "displayIcon": format!("{}.png", name), "role": { "displayName": role } })
    }

    #[test]
    fn test_insert_and_list_newest_first() {
        let store = PickStore::open_in_memory().unwrap();
        let first = store.insert("full", &json!([agent("Jett", "Duelist")])).unwrap();
        let second = store.insert("balance", &json!([agent("Sage", "Sentinel")])).unwrap();

        let rows = store.list(20, 0).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);

        let page = store.list(1, 1).unwrap();
        assert_eq!(page[0].id, first.id);
    }

    #[test]
    fn test_insert_rejects_non_array() {
        let store = PickStore::open_in_memory().unwrap();
        assert!(matches!(store.insert("full", &json!({"a": 1})), Err(ServerError::InvalidPayload)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let store = PickStore::open_in_memory().unwrap();
        let row = store.insert("full", &json!([])).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert!(store.delete(&row.id).unwrap());
        assert!(!store.delete(&row.id).unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_recap_counts_appearances() {
        let store = PickStore::open_in_memory().unwrap();
        store.insert("full", &json!([agent("Jett", "Duelist"), agent("Sage", "Sentinel")])).unwrap();
        store.insert("full", &json!([agent("Jett", "Duelist"), agent("Omen", "Controller")])).unwrap();
        store.insert("balance", &json!([agent("Jett", "Duelist")])).unwrap();

        let recap = store.recap().unwrap();
        assert_eq!(recap.len(), 3);
        assert_eq!(recap[0].agent_name, "Jett");
        assert_eq!(recap[0].agent_role.as_deref(), Some("Duelist"));
        assert_eq!(recap[0].agent_icon.as_deref(), Some("Jett.png"));
        assert_eq!(recap[0].pick_count, 3);
        assert!(recap[1..].iter().all(|r| r.pick_count == 1));
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picks.sqlite3");

        let id = PickStore::open(&path).unwrap().insert("full", &json!([agent("Sova", "Initiator")])).unwrap().id;
        let reopened = PickStore::open(&path).unwrap();
        let rows = reopened.list(20, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].mode, "full");
    }
}
