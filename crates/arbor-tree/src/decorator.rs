use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::rc::Rc;

use arbor_core::{Blackboard, NodeId, TickContext};

use crate::node::{Node, NodeBase, NodeKind};
use crate::state::NodeState;
use crate::tree::Arena;

/// The tree's entry point: a single-child decorator with the trivial
/// policy. It ticks its child and answers with exactly the child's result;
/// with no child attached it fails.
pub struct Root {
    base: NodeBase,
    child: Option<NodeId>,
}

impl Root {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            child: None,
        }
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }
}

impl Node for Root {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        match self.child {
            Some(child) => nodes.tick_node(child, ctx, bb),
            None => NodeState::Failed,
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.child.into_iter().collect()
    }

    fn add_child(&mut self, child: NodeId) -> bool {
        if self.child.is_some() {
            return false;
        }
        self.child = Some(child);
        true
    }

    fn remove_child(&mut self, child: NodeId) -> bool {
        if self.child != Some(child) {
            return false;
        }
        self.child = None;
        true
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.child = self.child.and_then(|old| remap.get(&old).copied());
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            child: self.child,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Boolean precondition over the child.
///
/// When the predicate holds, the child is ticked and its result propagated;
/// when it does not, the gate fails without touching the child at all.
pub struct Gate {
    base: NodeBase,
    child: Option<NodeId>,
    pred: Rc<dyn Fn(&TickContext, &Blackboard) -> bool>,
}

impl Gate {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        pred: impl Fn(&TickContext, &Blackboard) -> bool + 'static,
    ) -> Self {
        Self {
            base: NodeBase::new(name),
            child: None,
            pred: Rc::new(pred),
        }
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }
}

impl Node for Gate {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        let Some(child) = self.child else {
            return NodeState::Failed;
        };
        if (self.pred)(ctx, bb) {
            nodes.tick_node(child, ctx, bb)
        } else {
            NodeState::Failed
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.child.into_iter().collect()
    }

    fn add_child(&mut self, child: NodeId) -> bool {
        if self.child.is_some() {
            return false;
        }
        self.child = Some(child);
        true
    }

    fn remove_child(&mut self, child: NodeId) -> bool {
        if self.child != Some(child) {
            return false;
        }
        self.child = None;
        true
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.child = self.child.and_then(|old| remap.get(&old).copied());
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            child: self.child,
            pred: Rc::clone(&self.pred),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Elapsed-time precondition.
///
/// Accumulates `dt_seconds` across ticks, reporting `Running` until the
/// threshold; on crossing it the child is ticked once and the gate reports
/// `Succeeded`. Entering from a non-`Running` state rearms the accumulator.
/// Timeout behavior is node-local bookkeeping like this; the engine has no
/// cancellation primitive.
pub struct TimedGate {
    base: NodeBase,
    child: Option<NodeId>,
    threshold_seconds: f32,
    elapsed_seconds: f32,
}

impl TimedGate {
    pub fn new(name: impl Into<Cow<'static, str>>, threshold_seconds: f32) -> Self {
        Self {
            base: NodeBase::new(name),
            child: None,
            threshold_seconds,
            elapsed_seconds: 0.0,
        }
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }

    pub fn threshold_seconds(&self) -> f32 {
        self.threshold_seconds
    }
}

impl Node for TimedGate {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if !self.base.state().is_running() {
            self.elapsed_seconds = 0.0;
        }
        let Some(child) = self.child else {
            return NodeState::Failed;
        };
        self.elapsed_seconds += ctx.dt_seconds;
        if self.elapsed_seconds < self.threshold_seconds {
            return NodeState::Running;
        }
        let _ = nodes.tick_node(child, ctx, bb);
        NodeState::Succeeded
    }

    fn children(&self) -> Vec<NodeId> {
        self.child.into_iter().collect()
    }

    fn add_child(&mut self, child: NodeId) -> bool {
        if self.child.is_some() {
            return false;
        }
        self.child = Some(child);
        true
    }

    fn remove_child(&mut self, child: NodeId) -> bool {
        if self.child != Some(child) {
            return false;
        }
        self.child = None;
        true
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.child = self.child.and_then(|old| remap.get(&old).copied());
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            child: self.child,
            threshold_seconds: self.threshold_seconds,
            elapsed_seconds: 0.0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Swaps `Succeeded` and `Failed`; `Running` passes through.
pub struct Inverter {
    base: NodeBase,
    child: Option<NodeId>,
}

impl Inverter {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            child: None,
        }
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }
}

impl Node for Inverter {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        let Some(child) = self.child else {
            return NodeState::Failed;
        };
        match nodes.tick_node(child, ctx, bb) {
            NodeState::Succeeded => NodeState::Failed,
            NodeState::Failed => NodeState::Succeeded,
            other => other,
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.child.into_iter().collect()
    }

    fn add_child(&mut self, child: NodeId) -> bool {
        if self.child.is_some() {
            return false;
        }
        self.child = Some(child);
        true
    }

    fn remove_child(&mut self, child: NodeId) -> bool {
        if self.child != Some(child) {
            return false;
        }
        self.child = None;
        true
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.child = self.child.and_then(|old| remap.get(&old).copied());
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            child: self.child,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
