use crate::ingest::types::{
    EventKind, MAX_DISTANCE_M, MIN_DISTANCE_M, Measurement, NodeId, ParsedLine,
};

const IDENTITY_MARKER: &str = "Node ID:";

/// Checked in order; the first marker found in the line wins.
const EVENT_MARKERS: [(&str, EventKind); 4] = [
    ("[DISCOVER]", EventKind::Discovery),
    ("[DISCONNECT]", EventKind::Disconnect),
    ("ERROR", EventKind::Error),
    ("FAIL", EventKind::Error),
];

/// Classify one raw device line.
///
/// A ranging record takes precedence over an identity hint, which takes
/// precedence over a lifecycle marker. Anything else, including lines with
/// malformed numbers, yields `None`; parsing never fails loudly.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();

    if let Some(measurement) = parse_measurement(line) {
        return Some(ParsedLine::Measurement(measurement));
    }

    if let Some(node) = parse_identity_hint(line) {
        return Some(ParsedLine::IdentityHint(node));
    }

    classify_event(line).map(ParsedLine::Event)
}

pub fn parse_measurement(line: &str) -> Option<Measurement> {
    let line = line.trim();

    // Cheap pre-filter before splitting: records always start with the timestamp.
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let mut fields = line.split(',').map(str::trim);
    let timestamp = fields.next()?;
    let source = fields.next()?;
    let target = fields.next()?;
    let distance = fields.next()?;
    let rx_power = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let distance_m: f64 = distance.parse().ok()?;
    if !(distance_m > MIN_DISTANCE_M && distance_m < MAX_DISTANCE_M) {
        return None;
    }

    let rx_power_dbm: f64 = rx_power.parse().ok()?;
    if !rx_power_dbm.is_finite() {
        return None;
    }

    Some(Measurement {
        timestamp: timestamp.parse().ok()?,
        source: NodeId::parse_decimal(source)?,
        target: NodeId::parse_target(target)?,
        target_text: target.to_string(),
        distance_m,
        rx_power_dbm,
    })
}

/// Extracts `<digits>` from `Node ID: <digits>` anywhere in the line.
pub fn parse_identity_hint(line: &str) -> Option<NodeId> {
    let (_, rest) = line.split_once(IDENTITY_MARKER)?;
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    NodeId::parse_decimal(&rest[..end])
}

pub fn classify_event(line: &str) -> Option<EventKind> {
    EVENT_MARKERS
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .map(|(_, kind)| *kind)
}
