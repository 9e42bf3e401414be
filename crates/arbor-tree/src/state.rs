#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a node's most recent tick.
///
/// `NotRunning` is the state a node carries before it has ever been ticked;
/// a tick itself only ever resolves to `Running`, `Succeeded` or `Failed`.
/// Parents read a child's last state to decide whether to resume it, and a
/// composite reads its own last state to decide whether to re-enter its
/// private resumption bookkeeping or start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeState {
    /// Never ticked, or implicitly reset by a parent restarting the branch.
    NotRunning,
    /// Mid-flight; the node expects to be ticked again next step.
    Running,
    /// The node's goal was satisfied this tick.
    Succeeded,
    /// Nothing useful happened this tick. Also the degraded outcome for
    /// structural problems (no children, missing child reference).
    Failed,
}

impl NodeState {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, NodeState::Running)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeState::Succeeded | NodeState::Failed)
    }

    #[inline]
    pub fn is_succeeded(self) -> bool {
        matches!(self, NodeState::Succeeded)
    }

    #[inline]
    pub fn is_failed(self) -> bool {
        matches!(self, NodeState::Failed)
    }

    /// Stable numeric code for trace payloads.
    #[inline]
    pub fn code(self) -> u64 {
        match self {
            NodeState::NotRunning => 0,
            NodeState::Running => 1,
            NodeState::Succeeded => 2,
            NodeState::Failed => 3,
        }
    }
}
