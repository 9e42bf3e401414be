#![allow(dead_code)]

use std::any::Any;

use arbor_core::{Blackboard, Key, NodeId, TickContext};
use arbor_tree::{Arena, Node, NodeBase, NodeKind, NodeState};

/// Tick log: raw node ids in the order they were ticked.
pub const TICKS: Key<Vec<u64>> = Key::new(0xBEEF);

pub fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        dt_seconds: 0.1,
        seed: 7,
    }
}

pub fn logging_blackboard() -> Blackboard {
    let mut bb = Blackboard::new();
    bb.set(TICKS, Vec::new());
    bb
}

pub fn ticked(bb: &Blackboard) -> &[u64] {
    bb.get(TICKS).map(|log| log.as_slice()).unwrap_or(&[])
}

/// Leaf that plays back a fixed script of states, one per tick, and records
/// every tick it receives. Past the end of the script it keeps failing.
pub struct Scripted {
    base: NodeBase,
    script: Vec<NodeState>,
    cursor: usize,
}

impl Scripted {
    pub fn new(name: &'static str, script: Vec<NodeState>) -> Self {
        Self {
            base: NodeBase::new(name),
            script,
            cursor: 0,
        }
    }

    pub fn boxed(name: &'static str, script: Vec<NodeState>) -> Box<dyn Node> {
        Box::new(Self::new(name, script))
    }
}

impl Node for Scripted {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn tick(&mut self, _nodes: &mut Arena, _ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if let Some(log) = bb.get_mut(TICKS) {
            log.push(self.base.id().raw());
        }
        let state = self
            .script
            .get(self.cursor)
            .copied()
            .unwrap_or(NodeState::Failed);
        self.cursor += 1;
        state
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            script: self.script.clone(),
            cursor: 0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
