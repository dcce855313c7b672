use crate::ingest::{
    EventKind, Measurement, NodeId, ParsedLine, classify_event, parse_identity_hint, parse_line,
    parse_measurement,
};
use pretty_assertions::assert_eq;

#[test]
fn parses_canonical_ranging_record() {
    let parsed = parse_line("100,1,2,1.50,-70").unwrap();

    assert_eq!(
        parsed,
        ParsedLine::Measurement(Measurement {
            timestamp: 100,
            source: NodeId(1),
            target: NodeId(2),
            target_text: "2".to_string(),
            distance_m: 1.50,
            rx_power_dbm: -70.0,
        })
    );
}

#[test]
fn hex_and_decimal_targets_normalize_to_same_node() {
    let hex = parse_measurement("5,1,0x2A,3.25,-80.5").unwrap();
    let upper = parse_measurement("5,1,0X2a,3.25,-80.5").unwrap();
    let decimal = parse_measurement("5,1,42,3.25,-80.5").unwrap();
    let bare_hex = parse_measurement("5,1,2A,3.25,-80.5").unwrap();

    assert_eq!(hex.target, NodeId(42));
    assert_eq!(upper.target, NodeId(42));
    assert_eq!(decimal.target, NodeId(42));
    assert_eq!(bare_hex.target, NodeId(42));

    // The original spelling survives for exports.
    assert_eq!(hex.target_text, "0x2A");
}

#[test]
fn fields_are_trimmed() {
    let m = parse_measurement("  7 , 3 , 4 , 2.0 , -65.25 ").unwrap();
    assert_eq!(m.source, NodeId(3));
    assert_eq!(m.target, NodeId(4));
    assert_eq!(m.rx_power_dbm, -65.25);
}

#[test]
fn rejects_lines_not_shaped_like_records() {
    for line in [
        "",
        "   ",
        "garbage",
        ",1,2,1.5,-70",
        "a100,1,2,1.5,-70",
        "100,1,2,1.5",
        "100,1,2,1.5,-70,extra",
        "100,x,2,1.5,-70",
        "100,1,zz,1.5,-70",
        "100,1,2,abc,-70",
        "100,1,2,1.5,loud",
        "-100,1,2,1.5,-70",
        "100,1,2,nan,-70",
    ] {
        assert_eq!(parse_measurement(line), None, "line {line:?} should not parse");
    }
}

#[test]
fn distance_outside_open_range_is_noise() {
    assert!(parse_measurement("1,1,2,0.01,-70").is_none());
    assert!(parse_measurement("1,1,2,100.0,-70").is_none());
    assert!(parse_measurement("1,1,2,-3.0,-70").is_none());
    assert!(parse_measurement("1,1,2,150,-70").is_none());

    assert!(parse_measurement("1,1,2,0.011,-70").is_some());
    assert!(parse_measurement("1,1,2,99.99,-70").is_some());
}

#[test]
fn identity_hint_tolerates_spacing() {
    assert_eq!(parse_identity_hint("Node ID: 3"), Some(NodeId(3)));
    assert_eq!(parse_identity_hint("boot ok, Node ID:12 ready"), Some(NodeId(12)));
    assert_eq!(parse_identity_hint("Node ID:    7"), Some(NodeId(7)));
    assert_eq!(parse_identity_hint("Node ID: unknown"), None);
    assert_eq!(parse_identity_hint("node id: 3"), None);
}

#[test]
fn event_markers_follow_priority_order() {
    assert_eq!(classify_event("[DISCOVER] node 4"), Some(EventKind::Discovery));
    assert_eq!(
        classify_event("[DISCONNECT] node 4"),
        Some(EventKind::Disconnect)
    );
    assert_eq!(classify_event("TX ERROR code 3"), Some(EventKind::Error));
    assert_eq!(classify_event("ranging FAIL"), Some(EventKind::Error));

    // First match wins.
    assert_eq!(
        classify_event("[DISCOVER] after ERROR"),
        Some(EventKind::Discovery)
    );
    assert_eq!(
        classify_event("[DISCONNECT] FAIL"),
        Some(EventKind::Disconnect)
    );

    // Case sensitive.
    assert_eq!(classify_event("error: lowercase"), None);
    assert_eq!(classify_event("[discover]"), None);
}

#[test]
fn parse_line_prefers_record_then_hint_then_event() {
    assert!(matches!(
        parse_line("100,1,2,1.50,-70"),
        Some(ParsedLine::Measurement(_))
    ));
    assert_eq!(
        parse_line("Node ID: 5 init FAIL"),
        Some(ParsedLine::IdentityHint(NodeId(5)))
    );
    assert_eq!(
        parse_line("[DISCONNECT] peer 3"),
        Some(ParsedLine::Event(EventKind::Disconnect))
    );
    assert_eq!(parse_line("DW1000 init done"), None);
}

#[test]
fn node_id_from_str_accepts_both_forms() {
    assert_eq!("0x10".parse::<NodeId>().unwrap(), NodeId(16));
    assert_eq!("10".parse::<NodeId>().unwrap(), NodeId(10));
    assert!("".parse::<NodeId>().is_err());
    assert!("0x".parse::<NodeId>().is_err());
    assert!("70000".parse::<NodeId>().is_err());
}
