//! Optional HCL configuration for the monitor.
//!
//! ```hcl
//! monitor {
//!   log_dir        = "logs"
//!   queue_capacity = 1024
//!
//!   identity {
//!     attempts         = 50
//!     poll_interval_ms = 100
//!   }
//! }
//! ```

mod error;
mod loader;
mod types;


pub use error::ConfigError;
pub use loader::{load_config, load_or_default, parse_config, validate_config};
pub use types::{IdentityConfig, MonitorConfig, SwarmConfig};
