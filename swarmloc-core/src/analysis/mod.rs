//! Offline analysis of archived node logs.
//!
//! Logs are replayed through the same parser and [`SwarmState`](crate::aggregate::SwarmState)
//! the live monitor uses, then the completed snapshot is scored and checked
//! for anomalies.

mod discover;
mod distance;
mod error;
mod export;
mod health;
mod issues;
mod loader;
mod report;

#[cfg(test)]
mod tests;

pub use discover::*;
pub use distance::*;
pub use error::AnalyzeError;
pub use export::*;
pub use health::*;
pub use issues::*;
pub use loader::*;
pub use report::*;
