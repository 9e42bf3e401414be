//! Deterministic, engine-agnostic kernel primitives for the arbor
//! behavior-tree runtime.
//!
//! Nothing in this crate knows about nodes or trees; it provides the shared
//! context a tree is evaluated against (blackboard, tick context, seeded
//! randomness) and the identity scheme nodes are addressed by.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod id;
pub mod rng;
pub mod tick;

pub use blackboard::{Blackboard, Key};
pub use id::{NodeId, NodeIdGen};
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
