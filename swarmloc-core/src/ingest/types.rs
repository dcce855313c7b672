use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distances at or below this are treated as noise.
pub const MIN_DISTANCE_M: f64 = 0.01;

/// Distances at or above this are treated as noise.
pub const MAX_DISTANCE_M: f64 = 100.0;

/// Canonical identity of a ranging device within a session.
///
/// Devices print ids either as decimal (`42`) or hex (`0x2A`). Every textual
/// form is normalized into this type once, when the line is parsed, so all
/// downstream lookups compare integers and never strings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u16);

impl NodeId {
    /// Fallback id for a device whose identity could not be detected.
    pub const SENTINEL: NodeId = NodeId(0);

    /// Decimal digits only, as used by `node_id` fields and `Node ID:` hints.
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse().ok().map(NodeId)
    }

    /// Target ids: `0x`-prefixed hex, plain decimal, or bare hex such as `2A`.
    pub fn parse_target(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return parse_hex(hex);
        }

        if text.bytes().all(|b| b.is_ascii_digit()) {
            return Self::parse_decimal(text);
        }

        parse_hex(text)
    }
}

fn parse_hex(digits: &str) -> Option<NodeId> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok().map(NodeId)
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node id '{0}'")]
pub struct InvalidNodeId(pub String);

impl FromStr for NodeId {
    type Err = InvalidNodeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeId::parse_target(s).ok_or_else(|| InvalidNodeId(s.to_string()))
    }
}

/// One ranging record: `timestamp,node_id,target_id,distance,rx_power`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Device clock units; not synchronized across devices.
    pub timestamp: u64,
    pub source: NodeId,
    pub target: NodeId,
    /// Target id exactly as the device printed it.
    pub target_text: String,
    pub distance_m: f64,
    pub rx_power_dbm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Discovery,
    Disconnect,
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Discovery => "discovery",
            EventKind::Disconnect => "disconnect",
            EventKind::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub node: NodeId,
    pub kind: EventKind,
    pub raw_line: String,
}

/// Classification of a single device line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Measurement(Measurement),
    IdentityHint(NodeId),
    Event(EventKind),
}
