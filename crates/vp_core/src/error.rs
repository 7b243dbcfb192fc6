use thiserror::Error;

use crate::models::agent::AgentId;

/// Errors raised before a selection run is allowed to start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Not enough agents for squad size: {available} available, {requested} requested")]
    InsufficientPool { available: usize, requested: usize },

    #[error("Invalid squad size: {0} (expected 1..=5)")]
    InvalidCount(usize),
}

/// Errors from explicit slot edits (substitution, locking).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Slot index out of range: {index} (squad size {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Slot {0} is locked")]
    SlotLocked(usize),

    #[error("Slot {0} is empty")]
    EmptySlot(usize),

    #[error("Agent {agent} is locked in slot {slot}")]
    AgentLocked { agent: AgentId, slot: usize },

    #[error("A run is in progress")]
    Busy,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Slot(#[from] SlotError),
}

impl SelectionError {
    /// Configuration problems the user can fix by unbanning agents or shrinking the squad.
    pub fn is_user_fixable(&self) -> bool {
        matches!(self, SelectionError::InsufficientPool { .. })
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
