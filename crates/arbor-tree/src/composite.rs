use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;

use arbor_core::{Blackboard, DeterministicRng, NodeId, TickContext};
use arbor_tools::{emit, TraceEvent};

use crate::node::{Node, NodeBase, NodeKind};
use crate::state::NodeState;
use crate::storage::ChildStorage;
use crate::tree::Arena;

/// All-children-must-succeed, in storage order.
///
/// A `Running` child suspends evaluation and is resumed on the next tick;
/// the resumption index survives only while the sequence itself is
/// `Running`. A failing child short-circuits the rest.
pub struct Sequence {
    base: NodeBase,
    children: ChildStorage,
    index: usize,
}

impl Sequence {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            children: ChildStorage::new(),
            index: 0,
        }
    }
}

impl Node for Sequence {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if !self.base.state().is_running() {
            self.index = 0;
        }
        if self.children.is_empty() {
            return NodeState::Failed;
        }
        if self.index >= self.children.len() {
            // Live edits can strand the resumption index.
            self.index = 0;
        }
        while let Some(child) = self.children.get(self.index) {
            match nodes.tick_node(child, ctx, bb) {
                NodeState::Succeeded => self.index += 1,
                NodeState::Running => return NodeState::Running,
                _ => return NodeState::Failed,
            }
        }
        NodeState::Succeeded
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().collect()
    }

    fn storage(&self) -> Option<&ChildStorage> {
        Some(&self.children)
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        Some(&mut self.children)
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.children.relink(remap);
        self.index = 0;
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            children: self.children.clone(),
            index: 0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// First-success-wins, in storage order, resumable.
///
/// The mirror image of [`Sequence`]: a succeeding child short-circuits, a
/// failing child advances, exhaustion fails. The scan index is reset only
/// when entering from a non-`Running` state.
pub struct Selector {
    base: NodeBase,
    children: ChildStorage,
    index: usize,
}

impl Selector {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            children: ChildStorage::new(),
            index: 0,
        }
    }
}

impl Node for Selector {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if !self.base.state().is_running() {
            self.index = 0;
        }
        if self.children.is_empty() {
            return NodeState::Failed;
        }
        if self.index >= self.children.len() {
            self.index = 0;
        }
        while let Some(child) = self.children.get(self.index) {
            match nodes.tick_node(child, ctx, bb) {
                NodeState::Succeeded => return NodeState::Succeeded,
                NodeState::Running => return NodeState::Running,
                _ => self.index += 1,
            }
        }
        NodeState::Failed
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().collect()
    }

    fn storage(&self) -> Option<&ChildStorage> {
        Some(&self.children)
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        Some(&mut self.children)
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.children.relink(remap);
        self.index = 0;
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            children: self.children.clone(),
            index: 0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// First-success-wins without re-favoring the first child.
///
/// Keeps one persistent cursor. Every evaluation scans cyclically from the
/// cursor for at most one full lap: `Running` and `Succeeded` stop the scan
/// and park the cursor on that child, a failure advances with wraparound,
/// and a completed lap fails. The cursor is where evaluation last stopped,
/// so no child is structurally favored across cycles.
pub struct RoundRobinSelector {
    base: NodeBase,
    children: ChildStorage,
    cursor: usize,
}

impl RoundRobinSelector {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            children: ChildStorage::new(),
            cursor: 0,
        }
    }
}

impl Node for RoundRobinSelector {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        let len = self.children.len();
        if len == 0 {
            return NodeState::Failed;
        }
        if self.cursor >= len {
            self.cursor = 0;
        }
        for step in 0..len {
            let index = (self.cursor + step) % len;
            let Some(child) = self.children.get(index) else {
                continue;
            };
            match nodes.tick_node(child, ctx, bb) {
                NodeState::Succeeded => {
                    self.cursor = index;
                    return NodeState::Succeeded;
                }
                NodeState::Running => {
                    self.cursor = index;
                    return NodeState::Running;
                }
                _ => {}
            }
        }
        NodeState::Failed
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().collect()
    }

    fn storage(&self) -> Option<&ChildStorage> {
        Some(&self.children)
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        Some(&mut self.children)
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.children.relink(remap);
        self.cursor = 0;
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            children: self.children.clone(),
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityEntry {
    pub child: NodeId,
    pub priority: i32,
}

/// First-success-wins over a priority-sorted order.
///
/// The `(child, priority)` list is kept sorted descending at mutation time
/// (insert, remove, [`set_priority`](PrioritySelector::set_priority)), and
/// the child storage mirrors that order; evaluation itself always scans from
/// the top. Unlike [`Selector`] there is no mid-scan resumption: a higher
/// priority child gets to preempt on every tick.
pub struct PrioritySelector {
    base: NodeBase,
    children: ChildStorage,
    entries: Vec<PriorityEntry>,
}

impl PrioritySelector {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            children: ChildStorage::new(),
            entries: Vec::new(),
        }
    }

    /// `(child, priority)` pairs in evaluation order.
    pub fn entries(&self) -> &[PriorityEntry] {
        &self.entries
    }

    pub fn priority_of(&self, child: NodeId) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.child == child)
            .map(|e| e.priority)
    }

    pub fn add_child_with_priority(&mut self, child: NodeId, priority: i32) -> bool {
        if !self.children.push(child) {
            return false;
        }
        self.entries.push(PriorityEntry { child, priority });
        self.resort();
        true
    }

    /// Re-rank one child. Returns `false` when `child` is not attached.
    pub fn set_priority(&mut self, child: NodeId, priority: i32) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.child == child) else {
            return false;
        };
        entry.priority = priority;
        self.resort();
        true
    }

    fn resort(&mut self) {
        self.entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        self.children
            .set_order(self.entries.iter().map(|e| e.child).collect());
    }
}

impl Node for PrioritySelector {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if self.children.is_empty() {
            return NodeState::Failed;
        }
        for child in self.children.iter() {
            match nodes.tick_node(child, ctx, bb) {
                NodeState::Succeeded => return NodeState::Succeeded,
                NodeState::Running => return NodeState::Running,
                _ => {}
            }
        }
        NodeState::Failed
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().collect()
    }

    fn storage(&self) -> Option<&ChildStorage> {
        Some(&self.children)
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        Some(&mut self.children)
    }

    fn add_child(&mut self, child: NodeId) -> bool {
        self.add_child_with_priority(child, 0)
    }

    fn remove_child(&mut self, child: NodeId) -> bool {
        if !self.children.remove(child) {
            return false;
        }
        self.entries.retain(|e| e.child != child);
        true
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.entries = self
            .entries
            .iter()
            .filter_map(|e| {
                remap.get(&e.child).map(|&child| PriorityEntry {
                    child,
                    priority: e.priority,
                })
            })
            .collect();
        self.children
            .set_order(self.entries.iter().map(|e| e.child).collect());
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            children: self.children.clone(),
            entries: self.entries.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightEntry {
    pub child: NodeId,
    pub weight: f32,
    /// Already drawn in the current selection cycle.
    pub tested: bool,
}

/// Weighted random one-of-many selection.
///
/// Each entry from a non-`Running` state draws uniformly over the weights of
/// children not yet tested this cycle, ticks only the drawn child, and marks
/// it tested; the draw sticks while that child is `Running`. When the
/// untested pool is exhausted every flag resets and the next draw covers all
/// children again. Shared preconditions thus cannot starve low-weight
/// children the way a fixed priority order would.
///
/// Draws come from the tick context's seeded generator (node id + current
/// tick as the stream), so a replay with the same seed selects identically.
pub struct WeightedSelector {
    base: NodeBase,
    children: ChildStorage,
    entries: Vec<WeightEntry>,
    selected: Option<NodeId>,
}

impl WeightedSelector {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            base: NodeBase::new(name),
            children: ChildStorage::new(),
            entries: Vec::new(),
            selected: None,
        }
    }

    /// `(child, weight, tested)` triples in storage order.
    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn weight_of(&self, child: NodeId) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.child == child)
            .map(|e| e.weight)
    }

    pub fn add_child_with_weight(&mut self, child: NodeId, weight: f32) -> bool {
        if !self.children.push(child) {
            return false;
        }
        self.entries.push(WeightEntry {
            child,
            weight: weight.max(0.0),
            tested: false,
        });
        true
    }

    /// Adjust a child's weight. Returns `false` when `child` is not
    /// attached. Negative weights clamp to zero.
    pub fn set_weight(&mut self, child: NodeId, weight: f32) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.child == child) else {
            return false;
        };
        entry.weight = weight.max(0.0);
        true
    }

    fn untested_total(&self) -> f32 {
        self.entries
            .iter()
            .filter(|e| !e.tested)
            .map(|e| e.weight)
            .sum()
    }

    /// Draw over the untested pool, resetting the cycle first if the pool
    /// is spent. `None` when every weight is zero.
    fn draw(&mut self, ctx: &TickContext, bb: &mut Blackboard) -> Option<usize> {
        let mut total = self.untested_total();
        if total <= 0.0 {
            for entry in &mut self.entries {
                entry.tested = false;
            }
            emit(
                bb,
                TraceEvent::new(ctx.tick, "weighted.reset").with_node(self.base.id().raw()),
            );
            total = self.entries.iter().map(|e| e.weight).sum();
        }
        if total <= 0.0 {
            return None;
        }

        let mut rng = ctx.rng_for_node(self.base.id(), ctx.tick);
        let point = rng.next_f32_below(total);

        let mut accumulated = 0.0;
        let mut fallback = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.tested || entry.weight <= 0.0 {
                continue;
            }
            fallback = Some(index);
            accumulated += entry.weight;
            if point < accumulated {
                return Some(index);
            }
        }
        // Rounding can push the point past the last bucket boundary.
        fallback
    }
}

impl Node for WeightedSelector {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if self.base.state().is_running() {
            if let Some(child) = self.selected {
                let state = nodes.tick_node(child, ctx, bb);
                return match state {
                    NodeState::Running => NodeState::Running,
                    NodeState::Succeeded => {
                        self.selected = None;
                        NodeState::Succeeded
                    }
                    _ => {
                        self.selected = None;
                        NodeState::Failed
                    }
                };
            }
        }

        self.selected = None;
        if self.entries.is_empty() {
            return NodeState::Failed;
        }
        let Some(index) = self.draw(ctx, bb) else {
            return NodeState::Failed;
        };
        self.entries[index].tested = true;
        let child = self.entries[index].child;
        emit(
            bb,
            TraceEvent::new(ctx.tick, "weighted.draw")
                .with_node(self.base.id().raw())
                .with_data(child.raw()),
        );

        match nodes.tick_node(child, ctx, bb) {
            NodeState::Running => {
                self.selected = Some(child);
                NodeState::Running
            }
            NodeState::Succeeded => NodeState::Succeeded,
            _ => NodeState::Failed,
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().collect()
    }

    fn storage(&self) -> Option<&ChildStorage> {
        Some(&self.children)
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        Some(&mut self.children)
    }

    fn add_child(&mut self, child: NodeId) -> bool {
        self.add_child_with_weight(child, 1.0)
    }

    fn remove_child(&mut self, child: NodeId) -> bool {
        if !self.children.remove(child) {
            return false;
        }
        self.entries.retain(|e| e.child != child);
        if self.selected == Some(child) {
            self.selected = None;
        }
        true
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.entries = self
            .entries
            .iter()
            .filter_map(|e| {
                remap.get(&e.child).map(|&child| WeightEntry {
                    child,
                    weight: e.weight,
                    tested: false,
                })
            })
            .collect();
        self.children
            .set_order(self.entries.iter().map(|e| e.child).collect());
        self.selected = None;
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            children: self.children.clone(),
            entries: self
                .entries
                .iter()
                .map(|e| WeightEntry {
                    tested: false,
                    ..*e
                })
                .collect(),
            selected: None,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Ticks every child every call, against success/failure thresholds.
///
/// No resumption index and no per-child short-circuit: counting stops only
/// when a threshold is crossed, at which point the remaining children are
/// skipped for that tick. With neither threshold met the composite is
/// `Running` while any child is, `Failed` otherwise.
pub struct Parallel {
    base: NodeBase,
    children: ChildStorage,
    success_threshold: usize,
    fail_threshold: usize,
}

impl Parallel {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        success_threshold: usize,
        fail_threshold: usize,
    ) -> Self {
        Self {
            base: NodeBase::new(name),
            children: ChildStorage::new(),
            success_threshold,
            fail_threshold,
        }
    }

    pub fn success_threshold(&self) -> usize {
        self.success_threshold
    }

    pub fn fail_threshold(&self) -> usize {
        self.fail_threshold
    }
}

impl Node for Parallel {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    fn tick(&mut self, nodes: &mut Arena, ctx: &TickContext, bb: &mut Blackboard) -> NodeState {
        if self.children.is_empty() {
            return NodeState::Failed;
        }
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut pending = false;
        for child in self.children.iter() {
            match nodes.tick_node(child, ctx, bb) {
                NodeState::Succeeded => {
                    succeeded += 1;
                    if succeeded >= self.success_threshold {
                        return NodeState::Succeeded;
                    }
                }
                NodeState::Running => pending = true,
                _ => {
                    failed += 1;
                    if failed >= self.fail_threshold {
                        return NodeState::Failed;
                    }
                }
            }
        }
        if pending {
            NodeState::Running
        } else {
            NodeState::Failed
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().collect()
    }

    fn storage(&self) -> Option<&ChildStorage> {
        Some(&self.children)
    }

    fn storage_mut(&mut self) -> Option<&mut ChildStorage> {
        Some(&mut self.children)
    }

    fn post_clone_relink(&mut self, remap: &BTreeMap<NodeId, NodeId>) {
        self.children.relink(remap);
    }

    fn clone_node(&self, id: NodeId) -> Box<dyn Node> {
        Box::new(Self {
            base: self.base.clone_as(id),
            children: self.children.clone(),
            success_threshold: self.success_threshold,
            fail_threshold: self.fail_threshold,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
