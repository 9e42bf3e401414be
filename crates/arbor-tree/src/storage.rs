use std::collections::BTreeMap;

use arbor_core::NodeId;

/// Ordered, duplicate-free-by-id child collection owned by a composite.
///
/// Order is evaluation order. The storage holds references only; the nodes
/// themselves live in the tree's arena, and each id appears in exactly one
/// parent's storage.
#[derive(Debug, Clone, Default)]
pub struct ChildStorage {
    ids: Vec<NodeId>,
}

impl ChildStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.ids.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Append a child reference; rejects duplicates.
    pub fn push(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove a child reference, preserving the order of the rest.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.ids.iter().position(|&c| c == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Reorder in place. Used by selectors that keep a sorted mirror of
    /// per-child metadata.
    pub(crate) fn set_order(&mut self, ids: Vec<NodeId>) {
        self.ids = ids;
    }

    /// Rewrite every reference through `remap`, dropping ids that have no
    /// entry (they point outside a cloned set).
    pub fn relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.ids = self
            .ids
            .iter()
            .filter_map(|old| remap.get(old).copied())
            .collect();
    }
}
