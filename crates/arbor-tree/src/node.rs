use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;

use arbor_core::{Blackboard, NodeId, TickContext};

use crate::state::NodeState;
use crate::storage::ChildStorage;
use crate::tree::Arena;

/// Which structural operations a node exposes.
///
/// The closed set: leaves have no children, decorators exactly one
/// (optional), composites an ordered collection. Everything else about a
/// node is behavior behind the [`Node`] trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Decorator,
    Composite,
}

/// Identity, label and last-known state; embedded in every node.
#[derive(Debug, Clone)]
pub struct NodeBase {
    id: NodeId,
    name: Cow<'static, str>,
    state: NodeState,
}

impl NodeBase {
    /// A fresh base with no id yet; the tree assigns one at registration.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: NodeId::UNREGISTERED,
            name: name.into(),
            state: NodeState::NotRunning,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value returned by this node's most recent tick.
    pub fn state(&self) -> NodeState {
        self.state
    }

    pub(crate) fn assign_id(&mut self, id: NodeId) {
        debug_assert!(!self.id.is_registered(), "node id assigned twice");
        self.id = id;
    }

    pub(crate) fn record(&mut self, state: NodeState) {
        self.state = state;
    }

    /// Base for a clone of this node: same name, given fresh id, execution
    /// state cleared (a pasted subtree has never run).
    pub fn clone_as(&self, id: NodeId) -> Self {
        Self {
            id,
            name: self.name.clone(),
            state: NodeState::NotRunning,
        }
    }
}

/// A behavior-tree node.
///
/// `tick` is the sole execution entry point. It must always resolve to a
/// state: failure is communicated by returning [`NodeState::Failed`], never
/// by panicking, since the tree may be edited live and misconfiguration
/// (no children, dangling references) has to degrade gracefully.
///
/// Children are addressed by [`NodeId`] and ticked through the [`Arena`],
/// which records each node's returned state after the call; implementations
/// never write their own `state` directly.
pub trait Node: 'static {
    fn base(&self) -> &NodeBase;

    fn base_mut(&mut self) -> &mut NodeBase;

    fn kind(&self) -> NodeKind;

    /// Evaluate this node for the current step.
    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState;

    fn id(&self) -> NodeId {
        self.base().id()
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    /// Outcome of the most recent tick; `NotRunning` before the first.
    fn state(&self) -> NodeState {
        self.base().state()
    }

    /// Child references in evaluation order. Empty for leaves.
    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    /// Ordered child collection, for composites only.
    fn storage(&self) -> Option<&ChildStorage> {
        None
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        None
    }

    /// Attach a child reference. Returns `false` when this node cannot take
    /// it (leaf, occupied decorator slot, duplicate id).
    fn add_child(&mut self, child: NodeId) -> bool {
        match self.storage_mut() {
            Some(storage) => storage.push(child),
            None => false,
        }
    }

    /// Detach a child reference, along with any per-child metadata the node
    /// keeps for it. Returns `false` when `child` was not attached here.
    fn remove_child(&mut self, child: NodeId) -> bool {
        match self.storage_mut() {
            Some(storage) => storage.remove(child),
            None => false,
        }
    }

    /// Rewrite every child reference through `remap` after a deep clone.
    ///
    /// References with no entry in `remap` point outside the cloned set and
    /// must be dropped, not left dangling.
    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        let _ = remap;
    }

    /// Clone this node's configuration under a fresh id.
    ///
    /// Child references still name the originals afterwards; callers must
    /// follow up with [`post_clone_relink`](Node::post_clone_relink) once
    /// the whole set has been cloned. Execution state does not survive the
    /// copy.
    fn clone_node(&self, id: NodeId) -> Box<dyn Node>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
