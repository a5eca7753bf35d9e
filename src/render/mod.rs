//! CPU rendering: camera math, the triangle rasterizer and the per-frame
//! pipeline wrapper.

/// Perspective camera matrices.
pub mod camera;
/// Tone mapping and vignette.
pub mod post;
/// Z-buffered triangle/point rasterization into linear-light targets.
pub mod raster;
/// The per-frame render pipeline ([`renderer::SceneRenderer`]).
pub mod renderer;
