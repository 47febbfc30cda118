//! Query translation for logsift
//!
//! This crate turns an immutable [`Demand`] into the ordered constraint list
//! a log store executes, and resolves calendar-relative date-range presets
//! into concrete timestamps.

mod builder;
mod range;

pub use builder::constraints_from_demand;
pub use range::{ResolvedRange, resolve};

// Re-export types used in our public API
pub use logsift_types::{Constraint, DateRangePreset, Demand, Field};
