//! Turning raw device text into structured records.
//!
//! Devices print a mix of ranging records, identity banners, lifecycle markers
//! and free-form diagnostics. This module classifies each line and runs the
//! short identity handshake a device goes through before its lines can be
//! attributed to a node.
//!
//! raw line
//! parse_line
//! ParsedLine
//! SwarmState (see `aggregate`)

mod identity;
mod line_reader;
mod parse;
mod types;

#[cfg(test)]
mod tests;

pub use identity::*;
pub use line_reader::*;
pub use parse::*;
pub use types::*;
