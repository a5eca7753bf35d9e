//! Shared plumbing: core value types and the crate-wide error taxonomy.

/// Core value types (frame rate, canvas, restart token).
pub mod core;
/// Error taxonomy used across the crate.
pub mod error;
