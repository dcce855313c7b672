mod matrix;
mod state;
mod stats;

#[cfg(test)]
mod tests;

pub use matrix::*;
pub use state::*;
pub use stats::*;
