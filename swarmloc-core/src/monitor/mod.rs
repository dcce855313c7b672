//! Live monitoring of several device streams.
//!
//! Each device gets its own reader task which resolves the device's node id,
//! then feeds every line into the shared [`SwarmState`](crate::aggregate::SwarmState),
//! the device's log file and the display queue. A single consumer prints the
//! queue; in matrix mode it drains silently while a periodic view redraws the
//! ranging matrix instead.

mod device;
mod device_log;
mod error;
mod session;
mod shutdown;
mod sink;
mod view;

#[cfg(test)]
mod tests;

pub use device::*;
pub use device_log::*;
pub use error::DeviceError;
pub use session::*;
pub use shutdown::*;
pub use sink::*;
pub use view::*;
