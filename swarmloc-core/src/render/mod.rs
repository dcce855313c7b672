//! Terminal presentation shared by the live monitor and the offline report.

mod grid;
mod highlight;

#[cfg(test)]
mod tests;

pub use grid::*;
pub use highlight::*;
