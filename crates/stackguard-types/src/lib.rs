//! Stable DTOs and IDs used across the stackguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs and codes
//! - canonical resource URN handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;
pub mod urn;

pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use receipt::{
    EnforcementLevel, RunMeta, StackguardData, StackguardReport, ToolMeta, Verdict, VerdictCounts,
    VerdictStatus, Violation, SCHEMA_REPORT_V1,
};
pub use urn::ResourceUrn;
