//! Pure policy evaluation (no IO).
//!
//! Input: a policy pack built elsewhere and a stream of resource descriptors.
//! Output: violations + verdict + summary data.

#![forbid(unsafe_code)]

pub mod model;
pub mod policies;
pub mod policy;
pub mod report;
pub mod schema;
pub mod taxonomy;

mod engine;
mod fingerprint;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;

pub use engine::{evaluate, evaluate_resource};
