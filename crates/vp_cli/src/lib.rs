//! Terminal front end for the squad randomizer.

pub mod driver;
pub mod render;
pub mod session;

pub use driver::run_until_idle;
pub use session::{Outcome, Session, SessionCommand};

use vp_core::{ExclusionSet, Role, Roster};

/// Build a ban list from agent names and role names. Unknown names are
/// returned so the caller can report them.
pub fn exclusions_from_names(roster: &Roster, agents: &[String], roles: &[Role]) -> (ExclusionSet, Vec<String>) {
    let mut excluded = ExclusionSet::new();
    let mut unknown = Vec::new();
    for name in agents {
        match roster.find_by_name(name) {
            Some(agent) => {
                excluded.insert(agent.uuid.clone());
            }
            None => unknown.push(name.clone()),
        }
    }
    for role in roles {
        for agent in roster.bucket(*role) {
            excluded.insert(agent.uuid.clone());
        }
    }
    (excluded, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vp_core::AgentId;

    #[test]
    fn test_exclusions_from_names() {
        let roster = Roster::fallback();
        let (excluded, unknown) =
            exclusions_from_names(&roster, &["jett".to_string(), "Yoru".to_string()], &[Role::Controller]);

        assert!(excluded.contains(&AgentId::new("1")));
        assert!(excluded.contains(&AgentId::new("3")));
        assert_eq!(excluded.len(), 2);
        assert_eq!(unknown, vec!["Yoru".to_string()]);
    }
}
