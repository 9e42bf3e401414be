//! Tick-based behavior-tree runtime.
//!
//! A tree is a hierarchy of stateful nodes evaluated once per logical step:
//! the owner calls [`Tree::tick`], the call cascades depth-first, and every
//! node answers with a [`NodeState`]. Composites keep private resumption
//! state so a child that answered [`NodeState::Running`] is resumed on the
//! next step instead of the whole branch being re-evaluated from scratch.
//!
//! Execution is strictly single-threaded and pull-based: there is no
//! suspension primitive and no callback dispatch, only a node returning
//! `Running` and being polled again. The blackboard handed into each tick is
//! the one shared mutable resource crossing node boundaries.
//!
//! # Architecture
//!
//! - [`Node`]: the capability set every node implements
//! - [`NodeState`]: four-valued outcome of the most recent tick
//! - [`Tree`]/[`Arena`]: id-addressed node ownership and the tick entry point
//! - Composites: [`Sequence`], [`Selector`], [`RoundRobinSelector`],
//!   [`PrioritySelector`], [`WeightedSelector`], [`Parallel`]
//! - Decorators: [`Root`], [`Gate`], [`TimedGate`], [`Inverter`]
//! - Leaf adapters: [`Condition`], [`Action`], [`Wait`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod node;
pub mod registry;
pub mod state;
pub mod storage;
pub mod tree;

pub use composite::{
    Parallel, PriorityEntry, PrioritySelector, RoundRobinSelector, Selector, Sequence,
    WeightEntry, WeightedSelector,
};
pub use decorator::{Gate, Inverter, Root, TimedGate};
pub use leaf::{Action, Condition, Wait};
pub use node::{Node, NodeBase, NodeKind};
pub use registry::{MapRegistry, TreeRegistry};
pub use state::NodeState;
pub use storage::ChildStorage;
pub use tree::{post_clone_relink, Arena, Subtree, Tree, TreeError};
