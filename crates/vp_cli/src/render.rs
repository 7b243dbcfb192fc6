//! Plain-text rendering for the terminal.

use chrono::Local;
use vp_core::{AgentRecap, ExclusionSet, PickLog, ResultSlot, Role, Roster};

const EMPTY_CELL: &str = "-";
const SHUFFLE_CELL: &str = "???";

pub fn slot_cell(slot: &ResultSlot) -> String {
    let name = match (&slot.agent, slot.finalized || slot.locked) {
        (Some(agent), true) => agent.label(),
        (Some(agent), false) => format!("{}?", agent.display_name),
        (None, false) if !slot.locked => SHUFFLE_CELL.to_string(),
        (None, _) => EMPTY_CELL.to_string(),
    };
    if slot.locked {
        format!("{} [L]", name)
    } else {
        name
    }
}

/// `1: Jett (Duelist) | 2: Sage (Sentinel) [L] | 3: ???`
pub fn squad_line(slots: &[ResultSlot]) -> String {
    slots
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}: {}", i + 1, slot_cell(s)))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn pool_summary(roster: &Roster, excluded: &ExclusionSet) -> String {
    let sorted = roster.sorted_by_name();
    let mut lines = Vec::new();
    for role in Role::ALL {
        let members = sorted
            .iter()
            .filter(|a| a.has_role(role))
            .map(|a| if excluded.is_excluded(a) { format!("({})", a.display_name) } else { a.display_name.clone() })
            .collect::<Vec<_>>();
        lines.push(format!("{:<11} {}", role.as_str(), members.join(", ")));
    }
    lines.push(format!("pool: {}/{} available", excluded.pool(roster).len(), roster.len()));
    lines.join("\n")
}

pub fn history_table(logs: &[PickLog]) -> String {
    if logs.is_empty() {
        return "no picks logged yet".to_string();
    }
    logs.iter()
        .map(|log| {
            format!(
                "{}  {:<8} {}  [{}]",
                log.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                log.mode,
                log.squad_names(),
                log.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn recap_table(rows: &[AgentRecap]) -> String {
    if rows.is_empty() {
        return "no recap data".to_string();
    }
    let mut out = format!("{:<14} {:<11} {:>5}", "AGENT", "ROLE", "PICKS");
    for row in rows {
        out.push_str(&format!(
            "\n{:<14} {:<11} {:>5}",
            row.agent_name,
            row.agent_role.as_deref().unwrap_or(EMPTY_CELL),
            row.pick_count
        ));
    }
    out
}
