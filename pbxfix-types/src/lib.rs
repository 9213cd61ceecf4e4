//! Shared DTOs for the pbxfix workspace.
//!
//! # Design constraints
//! - Reports are serialized to stdout as JSON and may be consumed by scripts.
//! - Prefer adding optional fields over changing semantics.

pub mod report;
pub mod rules;

/// Schema identifiers.
pub mod schema {
    pub const PBXFIX_REPORT_V1: &str = "pbxfix.report.v1";
}
