#![cfg(feature = "serde")]

use arbor_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let log = TraceLog {
        events: vec![
            TraceEvent::new(1, "tree.tick").with_node(1).with_data(2),
            TraceEvent::new(2, "weighted.draw").with_node(4).with_data(7),
            TraceEvent::new(3, "weighted.reset").with_node(4),
        ],
    };

    let json = serde_json::to_string(&log).expect("serialize");
    let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, log);
}
