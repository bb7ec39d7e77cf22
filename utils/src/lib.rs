//! Small domain-agnostic helpers shared across the procd workspace.
//!
//! Structured logging lives in `procd_server::logging` instead, since
//! that is the one place in the workspace that actually installs a
//! global subscriber; this crate stays dependency-free.

pub mod stats;
pub mod time;

pub use stats::StatsCounter;
pub use time::format_duration;
