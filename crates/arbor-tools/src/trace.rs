#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use arbor_core::{Blackboard, Key};

/// One recorded tick decision.
///
/// Plain data on purpose: events are recorded during evaluation and rendered
/// later by tooling. `node` carries the raw id of the node that emitted the
/// event; `data` is tag-specific (a child id, a state code, a draw count).
///
/// Tags emitted by the runtime: `tree.tick`, `weighted.draw`,
/// `weighted.reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub node: u64,
    pub data: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            node: 0,
            data: 0,
        }
    }

    pub fn with_node(mut self, node: u64) -> Self {
        self.node = node;
        self
    }

    pub fn with_data(mut self, data: u64) -> Self {
        self.data = data;
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// In-memory event log, suitable for storing on the blackboard directly.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Blackboard key for collecting events in-memory.
pub const TRACE_LOG: Key<TraceLog> = Key::new(0xA4B0_77AC_0000_0001);
/// Blackboard key for streaming events into a user-provided sink.
pub const TRACE_SINK: Key<Box<dyn TraceSink>> = Key::new(0xA4B0_77AC_0000_0002);

/// Record `event` into whatever log and/or sink the blackboard carries.
/// A no-op when neither is installed.
pub fn emit(blackboard: &mut Blackboard, event: TraceEvent) {
    if let Some(log) = blackboard.get_mut(TRACE_LOG) {
        log.push(event.clone());
    }
    if let Some(sink) = blackboard.get_mut(TRACE_SINK) {
        sink.emit(event);
    }
}
