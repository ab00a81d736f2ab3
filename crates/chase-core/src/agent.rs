use core::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for an agent.
///
/// Rosters and per-agent controllers are keyed by this, so it must be:
/// - cheap to copy
/// - totally ordered (`Ord`) for deterministic iteration
/// - convertible to a stable numeric ID (`stable_id`) for logs
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Who drives an agent's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentRole {
    /// Moved by direct input-to-impulse mapping; never follows paths.
    Human,
    /// Chases the tracked target through the navigation grid.
    Autonomous,
}

impl AgentRole {
    pub fn is_human(self) -> bool {
        matches!(self, AgentRole::Human)
    }
}
