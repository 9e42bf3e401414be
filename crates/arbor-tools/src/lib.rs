//! Tooling primitives for the arbor behavior-tree runtime.
//!
//! The runtime stays free of any logging framework; instead it routes small
//! trace events through the blackboard to whatever sink or log the owner has
//! installed. Richer integrations (inspectors, editor overlays) should live
//! in dedicated adapter crates on top of these types.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};
