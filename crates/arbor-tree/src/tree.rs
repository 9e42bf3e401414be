use std::collections::{BTreeMap, BTreeSet};

use arbor_core::{Blackboard, NodeId, NodeIdGen, TickContext};
use arbor_tools::{emit, TraceEvent};
use thiserror::Error;

use crate::composite::{PrioritySelector, WeightedSelector};
use crate::node::Node;
use crate::state::NodeState;

/// Structural-mutation failures at the authoring boundary.
///
/// Tick-time problems never surface here; they degrade to
/// [`NodeState::Failed`] instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {0} cannot take another child")]
    CannotParent(NodeId),
    #[error("node {1} is not a child of {0}")]
    NotAChild(NodeId, NodeId),
    #[error("node {0} is not a priority selector")]
    NotPrioritySelector(NodeId),
    #[error("node {0} is not a weighted selector")]
    NotWeightedSelector(NodeId),
    #[error("node {0} is already registered")]
    DuplicateId(NodeId),
}

/// Id-addressed owner of every node in a tree.
///
/// Ticking a child goes through here: the node is taken out, ticked against
/// the rest of the arena, its returned state is recorded as its `state()`,
/// and it is put back. A missing id resolves to `Failed`, so a dangling
/// reference in a live-edited tree degrades instead of crashing.
#[derive(Default)]
pub struct Arena {
    nodes: BTreeMap<NodeId, Box<dyn Node>>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn Node> {
        self.nodes.get(&id).map(|node| node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Box<dyn Node>> {
        self.nodes.get_mut(&id)
    }

    /// Last-known state of a node; `NotRunning` for unknown ids.
    pub fn state_of(&self, id: NodeId) -> NodeState {
        self.get(id).map(|node| node.state()).unwrap_or(NodeState::NotRunning)
    }

    /// Tick one node and record its result as its new `state()`.
    pub fn tick_node(&mut self, id: NodeId, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        let Some(mut node) = self.nodes.remove(&id) else {
            return NodeState::Failed;
        };
        let state = node.tick(self, ctx, bb);
        node.base_mut().record(state);
        self.nodes.insert(id, node);
        state
    }
}

/// A detached set of cloned nodes, relinked among themselves and awaiting
/// insertion via [`Tree::adopt`].
pub struct Subtree {
    root: NodeId,
    nodes: BTreeMap<NodeId, Box<dyn Node>>,
}

impl Subtree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn Node> {
        self.nodes.get(&id).map(|node| node.as_ref())
    }
}

/// Second pass of a deep clone: rewrite every intra-set child reference
/// through `remap` (old id → new id). References to nodes outside the set
/// are cleared, never left dangling.
///
/// Tooling that duplicates an arbitrary selection of nodes must call this
/// once, after the whole selection has been cloned.
pub fn post_clone_relink(
    nodes: &mut BTreeMap<NodeId, Box<dyn Node>>,
    remap: &BTreeMap<NodeId, NodeId>,
) {
    for node in nodes.values_mut() {
        node.post_clone_relink(remap);
    }
}

/// A behavior tree: an arena of nodes, a designated root, and the id
/// allocator that hands every registered node its permanent identity.
#[derive(Default)]
pub struct Tree {
    arena: Arena,
    root: Option<NodeId>,
    ids: NodeIdGen,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn Node> {
        self.arena.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Box<dyn Node>> {
        self.arena.get_mut(id)
    }

    /// Typed view of a node, for access to subtype-specific operations.
    pub fn node_as<T: Node>(&self, id: NodeId) -> Option<&T> {
        self.arena.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn node_as_mut<T: Node>(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    fn register(&mut self, mut node: Box<dyn Node>) -> NodeId {
        let id = self.ids.next_id();
        node.base_mut().assign_id(id);
        self.arena.nodes.insert(id, node);
        id
    }

    /// Install `node` as the tree's entry point. Any previous root and its
    /// entire subtree are destroyed.
    pub fn set_root(&mut self, node: Box<dyn Node>) -> NodeId {
        if let Some(old) = self.root.take() {
            self.remove_subtree(old);
        }
        let id = self.register(node);
        self.root = Some(id);
        id
    }

    /// Register `node` and attach it as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Box<dyn Node>) -> Result<NodeId, TreeError> {
        if !self.arena.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let id = self.register(node);
        let attached = self
            .arena
            .get_mut(parent)
            .map(|p| p.add_child(id))
            .unwrap_or(false);
        if !attached {
            self.arena.nodes.remove(&id);
            return Err(TreeError::CannotParent(parent));
        }
        Ok(id)
    }

    /// Register `node` under a [`PrioritySelector`], slotting it into the
    /// priority order immediately.
    pub fn add_child_with_priority(
        &mut self,
        parent: NodeId,
        node: Box<dyn Node>,
        priority: i32,
    ) -> Result<NodeId, TreeError> {
        if !self.arena.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        if self.node_as::<PrioritySelector>(parent).is_none() {
            return Err(TreeError::NotPrioritySelector(parent));
        }
        let id = self.register(node);
        let selector = self
            .node_as_mut::<PrioritySelector>(parent)
            .ok_or(TreeError::NotPrioritySelector(parent))?;
        if !selector.add_child_with_priority(id, priority) {
            self.arena.nodes.remove(&id);
            return Err(TreeError::CannotParent(parent));
        }
        Ok(id)
    }

    /// Register `node` under a [`WeightedSelector`] with the given weight.
    pub fn add_child_with_weight(
        &mut self,
        parent: NodeId,
        node: Box<dyn Node>,
        weight: f32,
    ) -> Result<NodeId, TreeError> {
        if !self.arena.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        if self.node_as::<WeightedSelector>(parent).is_none() {
            return Err(TreeError::NotWeightedSelector(parent));
        }
        let id = self.register(node);
        let selector = self
            .node_as_mut::<WeightedSelector>(parent)
            .ok_or(TreeError::NotWeightedSelector(parent))?;
        if !selector.add_child_with_weight(id, weight) {
            self.arena.nodes.remove(&id);
            return Err(TreeError::CannotParent(parent));
        }
        Ok(id)
    }

    /// Change a child's priority; the selector re-sorts immediately.
    pub fn set_priority(
        &mut self,
        parent: NodeId,
        child: NodeId,
        priority: i32,
    ) -> Result<(), TreeError> {
        if !self.arena.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let selector = self
            .node_as_mut::<PrioritySelector>(parent)
            .ok_or(TreeError::NotPrioritySelector(parent))?;
        if selector.set_priority(child, priority) {
            Ok(())
        } else {
            Err(TreeError::NotAChild(parent, child))
        }
    }

    /// Change a child's selection weight.
    pub fn set_weight(
        &mut self,
        parent: NodeId,
        child: NodeId,
        weight: f32,
    ) -> Result<(), TreeError> {
        if !self.arena.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let selector = self
            .node_as_mut::<WeightedSelector>(parent)
            .ok_or(TreeError::NotWeightedSelector(parent))?;
        if selector.set_weight(child, weight) {
            Ok(())
        } else {
            Err(TreeError::NotAChild(parent, child))
        }
    }

    /// Detach `child` from `parent` and destroy it together with its whole
    /// subtree. Nodes have no existence outside the tree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let detached = self
            .arena
            .get_mut(parent)
            .ok_or(TreeError::UnknownNode(parent))?
            .remove_child(child);
        if !detached {
            return Err(TreeError::NotAChild(parent, child));
        }
        self.remove_subtree(child);
        Ok(())
    }

    fn remove_subtree(&mut self, from: NodeId) {
        for id in self.collect_subtree(from) {
            self.arena.nodes.remove(&id);
        }
    }

    /// Ids reachable from `from` (inclusive), depth-first, child order.
    fn collect_subtree(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut seen = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            order.push(id);
            let children = node.children();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Deep-clone the subtree rooted at `from` into a detached set.
    ///
    /// Two passes, exactly: every reachable node is cloned under a fresh id
    /// first, then [`post_clone_relink`] rewrites the cloned set's child
    /// references through the old-id → new-id map. The clones carry no
    /// execution state.
    pub fn clone_subtree(&mut self, from: NodeId) -> Result<Subtree, TreeError> {
        if !self.arena.contains(from) {
            return Err(TreeError::UnknownNode(from));
        }
        let order = self.collect_subtree(from);

        let mut remap = BTreeMap::new();
        let mut nodes = BTreeMap::new();
        let mut new_root = None;
        for old in order {
            let Some(node) = self.arena.get(old) else {
                continue;
            };
            let id = self.ids.next_id();
            if old == from {
                new_root = Some(id);
            }
            remap.insert(old, id);
            nodes.insert(id, node.clone_node(id));
        }
        post_clone_relink(&mut nodes, &remap);

        let root = new_root.ok_or(TreeError::UnknownNode(from))?;
        Ok(Subtree { root, nodes })
    }

    /// Insert a detached subtree and attach its root under `parent`.
    pub fn adopt(&mut self, parent: NodeId, subtree: Subtree) -> Result<NodeId, TreeError> {
        if !self.arena.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        for id in subtree.ids() {
            if self.arena.contains(id) {
                return Err(TreeError::DuplicateId(id));
            }
        }
        let Subtree { root, nodes } = subtree;
        let attached = self
            .arena
            .get_mut(parent)
            .map(|p| p.add_child(root))
            .unwrap_or(false);
        if !attached {
            return Err(TreeError::CannotParent(parent));
        }
        self.arena.nodes.extend(nodes);
        Ok(root)
    }

    /// Evaluate the tree once. Called by the owner exactly once per logical
    /// step; a tree with no root fails.
    pub fn tick(&mut self, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        let Some(root) = self.root else {
            return NodeState::Failed;
        };
        let state = self.arena.tick_node(root, ctx, bb);
        emit(
            bb,
            TraceEvent::new(ctx.tick, "tree.tick")
                .with_node(root.raw())
                .with_data(state.code()),
        );
        state
    }
}
