//! The deterministic motion model: one normalized phase drives camera, mesh and
//! light transforms.

/// Cyclic phase accumulation and the per-frame transform formulas.
pub mod cycle;
