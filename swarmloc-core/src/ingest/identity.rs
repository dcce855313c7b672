use crate::ingest::parse::parse_line;
use crate::ingest::types::{NodeId, ParsedLine};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_IDENTITY_ATTEMPTS: u32 = 50;
pub const DEFAULT_IDENTITY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a device may take to announce itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityPolicy {
    pub attempts: u32,
    pub poll_interval: Duration,
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_IDENTITY_ATTEMPTS,
            poll_interval: DEFAULT_IDENTITY_POLL_INTERVAL,
        }
    }
}

impl IdentityPolicy {
    /// Upper bound on the whole handshake.
    pub fn deadline(&self) -> Duration {
        self.poll_interval * self.attempts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityState {
    Unresolved,
    Resolving { attempt: u32 },
    Resolved(NodeId),
}

/// Where a resolved id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Supplied by the operator, no handshake.
    Configured,
    /// `Node ID: <n>` banner.
    Announced,
    /// `node_id` field of a ranging record.
    Measurement,
    /// Handshake timed out; sentinel id assigned.
    Sentinel,
}

/// Per-device identity handshake.
///
/// The resolver is driven one polling attempt at a time by the device reader;
/// it never touches I/O itself. Lines observed while resolving are kept so they
/// can be replayed once normal ingestion starts.
#[derive(Debug)]
pub struct IdentityResolver {
    policy: IdentityPolicy,
    state: IdentityState,
    source: Option<IdentitySource>,
    backlog: Vec<String>,
}

impl IdentityResolver {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self {
            policy,
            state: IdentityState::Unresolved,
            source: None,
            backlog: Vec::new(),
        }
    }

    pub fn preresolved(node: NodeId) -> Self {
        Self {
            policy: IdentityPolicy::default(),
            state: IdentityState::Resolved(node),
            source: Some(IdentitySource::Configured),
            backlog: Vec::new(),
        }
    }

    pub fn state(&self) -> IdentityState {
        self.state
    }

    pub fn source(&self) -> Option<IdentitySource> {
        self.source
    }

    pub fn poll_interval(&self) -> Duration {
        self.policy.poll_interval
    }

    pub fn resolved(&self) -> Option<NodeId> {
        match self.state {
            IdentityState::Resolved(node) => Some(node),
            _ => None,
        }
    }

    /// Record one polling attempt. `line` is whatever arrived within the poll
    /// interval, if anything.
    pub fn attempt(&mut self, line: Option<String>) -> IdentityState {
        let attempt = match self.state {
            IdentityState::Resolved(_) => return self.state,
            IdentityState::Unresolved => 1,
            IdentityState::Resolving { attempt } => attempt + 1,
        };
        self.state = IdentityState::Resolving { attempt };

        if let Some(line) = line.filter(|l| !l.trim().is_empty()) {
            let identified = identify(&line);
            self.backlog.push(line);

            if let Some((node, source)) = identified {
                self.resolve(node, source);
                return self.state;
            }
        }

        if attempt >= self.policy.attempts {
            self.give_up();
        }

        self.state
    }

    /// Stop waiting and fall back to the sentinel id.
    pub fn give_up(&mut self) -> NodeId {
        if let IdentityState::Resolved(node) = self.state {
            return node;
        }
        self.resolve(NodeId::SENTINEL, IdentitySource::Sentinel);
        NodeId::SENTINEL
    }

    pub fn take_backlog(&mut self) -> Vec<String> {
        std::mem::take(&mut self.backlog)
    }

    fn resolve(&mut self, node: NodeId, source: IdentitySource) {
        self.state = IdentityState::Resolved(node);
        self.source = Some(source);
    }
}

/// Does this line tell us who the device is?
pub fn identify(line: &str) -> Option<(NodeId, IdentitySource)> {
    match parse_line(line)? {
        ParsedLine::IdentityHint(node) => Some((node, IdentitySource::Announced)),
        ParsedLine::Measurement(m) => Some((m.source, IdentitySource::Measurement)),
        ParsedLine::Event(_) => None,
    }
}
