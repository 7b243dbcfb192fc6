pub mod agent;
pub mod roster;
pub mod weapon;

pub use agent::{Agent, AgentId, Role};
pub use roster::{fallback_agents, Roster};
pub use weapon::{Weapon, WeaponCategory};
