pub mod analyze;
pub mod config;
pub mod monitor;

#[cfg(test)]
mod tests;
