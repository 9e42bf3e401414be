use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identity of a node.
///
/// Ids are assigned once, when a node is registered with its tree, and are
/// never reused for the lifetime of that tree; clone/relink bookkeeping and
/// trace output both rely on this. Id 0 is reserved for nodes that have not
/// been registered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub u64);

impl NodeId {
    /// Placeholder id carried by a node between construction and
    /// registration.
    pub const UNREGISTERED: NodeId = NodeId(0);

    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn is_registered(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id allocator.
///
/// Execution is single-threaded (cooperative polling), so a plain counter
/// suffices; ids start at 1 and never wrap back over handed-out values.
#[derive(Debug, Clone)]
pub struct NodeIdGen {
    next: u64,
}

impl Default for NodeIdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
