mod config;
mod devices;
pub mod tracing;

pub use config::test_config;
pub use devices::{SharedBuffer, scripted};
pub use self::tracing::{CapturedEvent, captured_events, init_test_tracing};
