//! Pure policy evaluation (no IO).
//!
//! Input: a resource graph snapshot constructed elsewhere.
//! Output: violations + verdict + summary data.

#![forbid(unsafe_code)]

pub mod access;
pub mod graph;
pub mod model;
pub mod policy;
pub mod report;
pub mod rules;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{evaluate, evaluate_value};
pub use graph::InputFault;
pub use rules::{Registry, Rule, RuleContext};
