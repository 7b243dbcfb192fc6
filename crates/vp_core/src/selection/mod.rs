//! Squad selection engine.
//!
//! Every entry point is a pure function of (agents, request, RNG stream):
//! exclusion and lock snapshots are borrowed, never mutated, so the same
//! seeded RNG always reproduces the same squad.

pub mod balanced;
pub mod full_random;
pub mod shuffle;

use crate::error::SelectionError;
use crate::filter::ExclusionSet;
use crate::models::{Agent, AgentId, Role};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub use shuffle::{fisher_yates, pick_one, shuffled};

pub const MIN_PLAYERS: usize = 1;
pub const MAX_PLAYERS: usize = 5;

/// Squad draw mode. Serialized as the short names stored in pick logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    #[serde(rename = "full")]
    FullRandom,
    #[serde(rename = "balance")]
    RoleBalanced,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::FullRandom => "full",
            SelectionMode::RoleBalanced => "balance",
        }
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::FullRandom
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "random" | "full-random" => Ok(SelectionMode::FullRandom),
            "balance" | "balanced" | "role-balanced" => Ok(SelectionMode::RoleBalanced),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// Strategy resolved once from (mode, count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPlan {
    FullRandom,
    /// Balanced, four or more slots: every role forced once.
    BalancedAllRoles,
    /// Balanced, two or three slots: distinct roles targeted cyclically.
    BalancedPartial,
}

impl SelectionPlan {
    pub fn classify(mode: SelectionMode, count: usize) -> Self {
        match (mode, count) {
            (SelectionMode::RoleBalanced, n) if n >= 4 => SelectionPlan::BalancedAllRoles,
            (SelectionMode::RoleBalanced, n) if n >= 2 => SelectionPlan::BalancedPartial,
            _ => SelectionPlan::FullRandom,
        }
    }

    /// Whether bans shrink the candidate pool (balanced plans can override them).
    pub fn honors_bans_strictly(&self) -> bool {
        matches!(self, SelectionPlan::FullRandom)
    }
}

/// One draw: squad size, mode, ban snapshot and the slots pinned from a previous run.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub mode: SelectionMode,
    pub count: usize,
    pub excluded: &'a ExclusionSet,
    pub locked: &'a BTreeMap<usize, Agent>,
}

impl<'a> SelectionRequest<'a> {
    /// Indices that need a fresh agent.
    pub fn open_slots(&self) -> Vec<usize> {
        (0..self.count).filter(|i| !self.locked.contains_key(i)).collect()
    }

    fn locked_ids(&self) -> HashSet<&'a AgentId> {
        self.locked.iter().filter(|(i, _)| **i < self.count).map(|(_, a)| &a.uuid).collect()
    }
}

/// First occurrence of each id wins.
pub(crate) fn unique_by_id<'a>(agents: impl Iterator<Item = &'a Agent>) -> Vec<&'a Agent> {
    let mut seen: HashSet<&AgentId> = HashSet::new();
    let mut unique = Vec::new();
    for agent in agents {
        if seen.insert(&agent.uuid) {
            unique.push(agent);
        }
    }
    unique
}

/// Draw `count` distinct agents according to `mode`.
pub fn select_agents<R: Rng + ?Sized>(
    agents: &[Agent],
    mode: SelectionMode,
    count: usize,
    excluded: &ExclusionSet,
    rng: &mut R,
) -> Vec<Agent> {
    draw(agents, SelectionPlan::classify(mode, count), count, excluded, &[], rng)
}

/// `open` agents for a squad already holding agents of the `covered` roles.
fn draw<R: Rng + ?Sized>(
    agents: &[Agent],
    plan: SelectionPlan,
    open: usize,
    excluded: &ExclusionSet,
    covered: &[Role],
    rng: &mut R,
) -> Vec<Agent> {
    let mut squad = match plan {
        SelectionPlan::FullRandom => full_random::select(agents, open, excluded, rng),
        SelectionPlan::BalancedAllRoles => balanced::select_all_roles(agents, open, excluded, covered, rng),
        SelectionPlan::BalancedPartial => balanced::select_partial(agents, open, excluded, covered, rng),
    };

    fisher_yates(&mut squad, rng);
    squad.truncate(open);
    squad
}

/// Reject requests that cannot produce a full squad.
///
/// Locked agents are removed from the candidates and only open slots count
/// toward the requirement. Balanced plans ignore bans here because they may
/// override them.
pub fn validate_request(agents: &[Agent], request: &SelectionRequest<'_>) -> Result<(), SelectionError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&request.count) {
        return Err(SelectionError::InvalidCount(request.count));
    }

    let open = request.open_slots().len();
    let locked = request.locked_ids();
    let plan = SelectionPlan::classify(request.mode, request.count);

    let available = unique_by_id(agents.iter())
        .into_iter()
        .filter(|a| !locked.contains(&a.uuid))
        .filter(|a| !plan.honors_bans_strictly() || !request.excluded.is_excluded(a))
        .count();

    if available < open {
        return Err(SelectionError::InsufficientPool { available, requested: open });
    }
    Ok(())
}

/// Produce the full slot vector: locked bindings verbatim, open indices filled
/// in order from a draw over the roster minus locked agents.
///
/// The plan follows the whole squad size, and roles already held by locked
/// agents count as covered for balanced draws.
pub fn fill_slots<R: Rng + ?Sized>(
    agents: &[Agent],
    request: &SelectionRequest<'_>,
    rng: &mut R,
) -> Vec<Option<Agent>> {
    let locked = request.locked_ids();
    let candidates: Vec<Agent> = agents.iter().filter(|a| !locked.contains(&a.uuid)).cloned().collect();
    let open = request.open_slots();
    let covered: Vec<Role> = request
        .locked
        .iter()
        .filter(|(i, _)| **i < request.count)
        .filter_map(|(_, a)| a.role)
        .collect();

    let plan = SelectionPlan::classify(request.mode, request.count);
    let mut drawn = draw(&candidates, plan, open.len(), request.excluded, &covered, rng).into_iter();

    (0..request.count)
        .map(|i| match request.locked.get(&i) {
            Some(agent) => Some(agent.clone()),
            None => drawn.next(),
        })
        .collect()
}

/// Candidates for rerolling one slot: unbanned agents not held by any other slot.
pub fn reroll_candidates<'a>(
    agents: &'a [Agent],
    excluded: &ExclusionSet,
    occupied: &HashSet<AgentId>,
) -> Vec<&'a Agent> {
    unique_by_id(agents.iter())
        .into_iter()
        .filter(|a| !excluded.is_excluded(a) && !occupied.contains(&a.uuid))
        .collect()
}
