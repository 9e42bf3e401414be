use std::collections::BTreeMap;

use crate::tree::Tree;

/// Explicit-lifecycle home for constructed trees.
///
/// Owners that juggle several trees (one per agent archetype, one per
/// editor tab) inject an implementation of this instead of reaching for
/// global state; a registered tree is owned by the registry until
/// unregistered.
pub trait TreeRegistry {
    /// Store `tree` under `name`, returning whatever it displaced.
    fn register(&mut self, name: &str, tree: Tree) -> Option<Tree>;

    fn unregister(&mut self, name: &str) -> Option<Tree>;

    fn lookup(&self, name: &str) -> Option<&Tree>;

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Tree>;
}

/// Map-backed registry with deterministic name order.
#[derive(Default)]
pub struct MapRegistry {
    trees: BTreeMap<String, Tree>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(|name| name.as_str())
    }
}

impl TreeRegistry for MapRegistry {
    fn register(&mut self, name: &str, tree: Tree) -> Option<Tree> {
        self.trees.insert(name.to_string(), tree)
    }

    fn unregister(&mut self, name: &str) -> Option<Tree> {
        self.trees.remove(name)
    }

    fn lookup(&self, name: &str) -> Option<&Tree> {
        self.trees.get(name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Tree> {
        self.trees.get_mut(name)
    }
}
