//! Stable DTOs and IDs used across the infraguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report envelope
//! - stable rule names and violation codes
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    EnforcementLevel, InfraguardData, InfraguardReport, ReportEnvelope, ResourceRef,
    SCHEMA_REPORT_V1, ToolMeta, Verdict, Violation,
};
