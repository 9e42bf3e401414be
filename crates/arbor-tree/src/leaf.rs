//! Terminal nodes.
//!
//! Domain behaviors with real private state should implement [`Node`]
//! directly; the adapters here cover the common cases of a boolean check, a
//! one-shot closure, and a timed pause. Closures are shared `Rc<dyn Fn>` so
//! leaves stay cloneable for subtree duplication (execution is
//! single-threaded, so `Rc` is sufficient).

use std::any::Any;
use std::borrow::Cow;
use std::rc::Rc;

use arbor_core::{Blackboard, NodeId, TickContext};

use crate::node::{Node, NodeBase, NodeKind};
use crate::state::NodeState;
use crate::tree::Arena;

/// Boolean check against the context: `Succeeded` when the predicate holds,
/// `Failed` otherwise. Resolves within a single tick.
pub struct Condition {
    base: NodeBase,
    pred: Rc<dyn Fn(&TickContext, &Blackboard) -> bool>,
}

impl Condition {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        pred: impl Fn(&TickContext, &Blackboard) -> bool + 'static,
    ) -> Self {
        Self {
            base: NodeBase::new(name),
            pred: Rc::new(pred),
        }
    }
}

impl Node for Condition {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn tick(&mut self, _nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if (self.pred)(ctx, bb) {
            NodeState::Succeeded
        } else {
            NodeState::Failed
        }
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
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

/// Arbitrary behavior as a closure over the blackboard. The closure decides
/// the outcome, including `Running` for multi-tick work that keeps its
/// progress on the blackboard.
pub struct Action {
    base: NodeBase,
    run: Rc<dyn Fn(&TickContext, &mut Blackboard) -> NodeState>,
}

impl Action {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        run: impl Fn(&TickContext, &mut Blackboard) -> NodeState + 'static,
    ) -> Self {
        Self {
            base: NodeBase::new(name),
            run: Rc::new(run),
        }
    }
}

impl Node for Action {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn tick(&mut self, _nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        (self.run)(ctx, bb)
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            run: Rc::clone(&self.run),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Multi-tick pause: `Running` until `duration_seconds` of `dt_seconds`
/// have accumulated, then `Succeeded`. The elapsed counter is private node
/// state, re-entered while `Running` and rearmed on a fresh entry, so
/// re-invocation continues rather than restarts.
pub struct Wait {
    base: NodeBase,
    duration_seconds: f32,
    elapsed_seconds: f32,
}

impl Wait {
    pub fn new(name: impl Into<Cow<'static, str>>, duration_seconds: f32) -> Self {
        Self {
            base: NodeBase::new(name),
            duration_seconds,
            elapsed_seconds: 0.0,
        }
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }
}

impl Node for Wait {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn tick(&mut self, _nodes: &mut Arena, ctx: &TickContext, _bb: &mut Blackboard) -> NodeState {
        if !self.base.state().is_running() {
            self.elapsed_seconds = 0.0;
        }
        self.elapsed_seconds += ctx.dt_seconds;
        if self.elapsed_seconds >= self.duration_seconds {
            NodeState::Succeeded
        } else {
            NodeState::Running
        }
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            duration_seconds: self.duration_seconds,
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
