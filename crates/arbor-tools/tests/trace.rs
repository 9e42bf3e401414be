use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::Blackboard;
use arbor_tools::{emit, TraceEvent, TraceLog, TraceSink, TRACE_LOG, TRACE_SINK};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn emit_without_log_or_sink_is_a_noop() {
    let mut bb = Blackboard::new();
    emit(&mut bb, TraceEvent::new(0, "dropped"));
    assert!(bb.is_empty());
}

#[test]
fn emit_writes_to_trace_log_when_present() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());

    emit(
        &mut bb,
        TraceEvent::new(1, "weighted.draw").with_node(10).with_data(20),
    );

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].tick, 1);
    assert_eq!(log.events[0].tag, "weighted.draw");
    assert_eq!(log.events[0].node, 10);
    assert_eq!(log.events[0].data, 20);
}

#[test]
fn emit_writes_to_sink_when_present() {
    let mut bb = Blackboard::new();
    let handle = RcSink::default();
    let shared = handle.0.clone();
    bb.set(TRACE_SINK, Box::new(handle) as Box<dyn TraceSink>);

    emit(&mut bb, TraceEvent::new(2, "tree.tick"));

    let events = shared.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tick, 2);
    assert_eq!(events[0].tag, "tree.tick");
}

#[test]
fn emit_writes_to_both_log_and_sink_when_both_present() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());

    let handle = RcSink::default();
    let shared = handle.0.clone();
    bb.set(TRACE_SINK, Box::new(handle) as Box<dyn TraceSink>);

    emit(&mut bb, TraceEvent::new(3, "both"));

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(shared.borrow().len(), 1);
}

#[test]
fn drain_empties_the_log() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(1, "a"));
    log.push(TraceEvent::new(2, "b"));

    let drained = log.drain();
    assert_eq!(drained.len(), 2);
    assert!(log.events.is_empty());
}
