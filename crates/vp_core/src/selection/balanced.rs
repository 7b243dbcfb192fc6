//! Role-balanced selection.
//!
//! Buckets are built from the full roster; bans only decide which member of a
//! bucket is preferred. A role whose members are all banned is still
//! represented (the ban is overridden), while fillers never override bans.

use super::shuffle::{pick_one, shuffled};
use super::unique_by_id;
use crate::filter::ExclusionSet;
use crate::models::{Agent, AgentId, Role};
use rand::Rng;
use std::collections::HashSet;

struct RoleBuckets<'a> {
    buckets: [Vec<&'a Agent>; 4],
}

impl<'a> RoleBuckets<'a> {
    fn from_agents(agents: &'a [Agent]) -> Self {
        let mut buckets: [Vec<&'a Agent>; 4] = Default::default();
        for agent in agents {
            if let Some(role) = agent.role {
                buckets[Self::slot(role)].push(agent);
            }
        }
        Self { buckets }
    }

    fn slot(role: Role) -> usize {
        match role {
            Role::Duelist => 0,
            Role::Initiator => 1,
            Role::Controller => 2,
            Role::Sentinel => 3,
        }
    }

    fn get(&self, role: Role) -> &[&'a Agent] {
        &self.buckets[Self::slot(role)]
    }

    fn has_unbanned(&self, role: Role, excluded: &ExclusionSet) -> bool {
        self.get(role).iter().any(|a| !excluded.is_excluded(a))
    }
}

/// Unused member of one role. Bans are only overridden when every member of
/// the role is banned; otherwise `None` once the unbanned members are used up.
fn pick_from_bucket<'a, R: Rng + ?Sized>(
    bucket: &[&'a Agent],
    excluded: &ExclusionSet,
    used: &HashSet<&'a AgentId>,
    rng: &mut R,
) -> Option<&'a Agent> {
    let role_fully_banned = bucket.iter().all(|a| excluded.is_excluded(a));
    let candidates: Vec<&'a Agent> = bucket
        .iter()
        .copied()
        .filter(|a| !used.contains(&a.uuid))
        .filter(|a| role_fully_banned || !excluded.is_excluded(a))
        .collect();

    let pick = pick_one(&candidates, rng).copied();
    if let (true, Some(agent)) = (role_fully_banned, pick) {
        log::debug!("All candidates for {:?} banned, overriding ban on {}", agent.role, agent.display_name);
    }
    pick
}

/// Unused, unbanned agent of any role.
fn pick_spare<'a, R: Rng + ?Sized>(
    agents: &'a [Agent],
    excluded: &ExclusionSet,
    used: &HashSet<&'a AgentId>,
    rng: &mut R,
) -> Option<&'a Agent> {
    let spare: Vec<&'a Agent> = unique_by_id(agents.iter())
        .into_iter()
        .filter(|a| !used.contains(&a.uuid) && !excluded.is_excluded(a))
        .collect();
    pick_one(&spare, rng).copied()
}

/// Squads of four or more: one forced pick per role not in `covered`, then
/// unbanned fillers. `covered` holds the roles of agents already seated
/// (locked slots).
pub fn select_all_roles<R: Rng + ?Sized>(
    agents: &[Agent],
    count: usize,
    excluded: &ExclusionSet,
    covered: &[Role],
    rng: &mut R,
) -> Vec<Agent> {
    let buckets = RoleBuckets::from_agents(agents);
    let mut used: HashSet<&AgentId> = HashSet::new();
    let mut forced: Vec<&Agent> = Vec::with_capacity(Role::ALL.len());

    for role in Role::ALL.into_iter().filter(|r| !covered.contains(r)) {
        // empty bucket: role skipped
        if let Some(pick) = pick_from_bucket(buckets.get(role), excluded, &used, rng) {
            used.insert(&pick.uuid);
            forced.push(pick);
        }
    }

    // more uncovered roles than open slots: keep a random subset
    let forced = shuffled(forced, rng);
    let forced_kept = forced.len().min(count);
    let remaining = count - forced_kept;

    let mut fillers: Vec<&Agent> = shuffled(
        unique_by_id(agents.iter())
            .into_iter()
            .filter(|a| !excluded.is_excluded(a) && !used.contains(&a.uuid))
            .collect(),
        rng,
    );
    fillers.truncate(remaining);

    let squad: Vec<Agent> = forced.into_iter().take(forced_kept).chain(fillers).cloned().collect();
    shuffled(squad, rng)
}

/// Squads of two or three: distinct roles assigned cyclically over the
/// shuffled list of roles that still have an unbanned member, preferring
/// roles not in `covered`.
///
/// An agent is never drawn twice; when a repeated role has no unused
/// unbanned member left, the slot takes any unused unbanned agent instead.
pub fn select_partial<R: Rng + ?Sized>(
    agents: &[Agent],
    count: usize,
    excluded: &ExclusionSet,
    covered: &[Role],
    rng: &mut R,
) -> Vec<Agent> {
    let buckets = RoleBuckets::from_agents(agents);

    let available: Vec<Role> =
        Role::ALL.into_iter().filter(|r| buckets.has_unbanned(*r, excluded)).collect();
    let available = if available.is_empty() { Role::ALL.to_vec() } else { available };
    let fresh: Vec<Role> = available.iter().copied().filter(|r| !covered.contains(r)).collect();
    let roles = shuffled(if fresh.is_empty() { available } else { fresh }, rng);

    let mut used: HashSet<&AgentId> = HashSet::new();
    let mut picked: Vec<&Agent> = Vec::with_capacity(count);

    for i in 0..count {
        let role = roles[i % roles.len()];
        let pick = pick_from_bucket(buckets.get(role), excluded, &used, rng)
            .or_else(|| pick_spare(agents, excluded, &used, rng));

        match pick {
            Some(agent) => {
                used.insert(&agent.uuid);
                picked.push(agent);
            }
            None => log::debug!("No candidate left for slot {} ({})", i, role),
        }
    }

    picked.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn only_duelists() -> Vec<Agent> {
        vec![
            Agent::new("1", "Jett", Role::Duelist),
            Agent::new("5", "Phoenix", Role::Duelist),
            Agent::new("6", "Reyna", Role::Duelist),
        ]
    }

    #[test]
    fn test_partial_never_repeats_agent_on_repeated_role() {
        let agents = only_duelists();
        let excluded = ExclusionSet::new();

        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let squad = select_partial(&agents, 3, &excluded, &[], &mut rng);
            let ids: HashSet<_> = squad.iter().map(|a| a.uuid.clone()).collect();
            assert_eq!(squad.len(), 3);
            assert_eq!(ids.len(), 3, "seed {} produced duplicates", seed);
        }
    }

    #[test]
    fn test_partial_falls_back_to_spare_agent() {
        // Only one Duelist, but the Duelist is the only available role.
        let agents = vec![
            Agent::new("1", "Jett", Role::Duelist),
            Agent::new("2", "Sage", Role::Sentinel),
            Agent::new("3", "Omen", Role::Controller),
        ];
        let excluded: ExclusionSet =
            [AgentId::new("2"), AgentId::new("3")].into_iter().collect();

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let squad = select_partial(&agents, 2, &excluded, &[], &mut rng);

        // Jett for the Duelist slot; the repeat has no unused unbanned agent left.
        assert_eq!(squad.len(), 1);
        assert_eq!(squad[0].display_name, "Jett");
    }

    #[test]
    fn test_partial_targets_distinct_roles() {
        let roster = Roster::fallback();
        let excluded = ExclusionSet::new();

        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let squad = select_partial(roster.agents(), 3, &excluded, &[], &mut rng);
            let roles: HashSet<_> = squad.iter().filter_map(|a| a.role).collect();
            assert_eq!(roles.len(), 3);
        }
    }

    #[test]
    fn test_all_roles_skips_empty_bucket() {
        let agents = vec![
            Agent::new("1", "Jett", Role::Duelist),
            Agent::new("5", "Phoenix", Role::Duelist),
            Agent::new("3", "Omen", Role::Controller),
            Agent::new("4", "Sova", Role::Initiator),
            Agent::new("7", "Viper", Role::Controller),
        ];
        let excluded = ExclusionSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let squad = select_all_roles(&agents, 4, &excluded, &[], &mut rng);
        assert_eq!(squad.len(), 4);
        assert!(squad.iter().all(|a| a.role != Some(Role::Sentinel)));
    }

    #[test]
    fn test_fillers_respect_bans() {
        let roster = Roster::fallback();
        // Ban Jett: Phoenix is forced as Duelist, and Jett can't be a filler.
        let excluded: ExclusionSet = [AgentId::new("1")].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let squad = select_all_roles(roster.agents(), 5, &excluded, &[], &mut rng);
        assert_eq!(squad.len(), 4);
        assert!(squad.iter().all(|a| a.display_name != "Jett"));
    }
}
