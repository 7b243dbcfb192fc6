//! # vp_core - Agent Squad Selection Engine
//!
//! Draws random or role-balanced squads of agents from a roster and drives
//! the timed reveal of each draw.
//!
//! ## Features
//! - Deterministic selection (same seed = same squad)
//! - Role balancing with ban overrides when a whole role is banned
//! - Reveal state machine on an injected clock (lock / reroll / substitute)
//! - Weapon randomizer, pick history paging and recap sorting

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Method naming conventions - would require API changes
#![allow(clippy::should_implement_trait)]

pub mod error;
pub mod filter;
pub mod history;
pub mod models;
pub mod reveal;
pub mod selection;
pub mod weapon;

pub use error::{CoreError, Result, SelectionError, SlotError};
pub use filter::ExclusionSet;
pub use history::{
    sort_recap, AgentRecap, HistoryPager, NewPick, PickLog, RecapSort, RecapSortField, HISTORY_PAGE_SIZE,
};
pub use models::{fallback_agents, Agent, AgentId, Role, Roster, Weapon, WeaponCategory};
pub use reveal::{
    CompletedRun, ResultSlot, RevealEvent, RevealSequencer, RevealTiming, RunState, StartOutcome,
};
pub use selection::{
    fill_slots, reroll_candidates, select_agents, validate_request, SelectionMode, SelectionPlan,
    SelectionRequest, MAX_PLAYERS, MIN_PLAYERS,
};
pub use weapon::WeaponPicker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
