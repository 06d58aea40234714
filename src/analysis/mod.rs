//! Health analysis modules.
//!
//! The BMI calculator, the statistics aggregator and roster views are all
//! pure functions over plain values and snapshots of the roster.

pub mod aggregator;
pub mod bmi;
pub mod roster;

pub use aggregator::*;
pub use bmi::*;
pub use roster::*;
