use super::shuffle::fisher_yates;
use super::unique_by_id;
use crate::filter::ExclusionSet;
use crate::models::Agent;
use rand::Rng;

/// Uniform sample without replacement from the non-banned pool.
///
/// Callers validate `pool >= count` beforehand; a short pool simply yields
/// fewer agents.
pub fn select<R: Rng + ?Sized>(
    agents: &[Agent],
    count: usize,
    excluded: &ExclusionSet,
    rng: &mut R,
) -> Vec<Agent> {
    let mut pool = unique_by_id(agents.iter().filter(|a| !excluded.is_excluded(a)));
    fisher_yates(&mut pool, rng);
    pool.into_iter().take(count).cloned().collect()
}
