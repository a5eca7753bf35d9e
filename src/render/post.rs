use crate::foundation::core::Canvas;
use crate::render::raster::{FrameRGBA, RasterTarget};
use rayon::prelude::*;

// ACES filmic tone curve fit.
// Source: https://knarkowicz.wordpress.com/2016/01/06/aces-filmic-tone-mapping-curve/
const ACES_A: f32 = 2.51;
const ACES_B: f32 = 0.03;
const ACES_C: f32 = 2.43;
const ACES_D: f32 = 0.59;
const ACES_E: f32 = 0.14;

// Vignette ramp endpoints on the normalized center distance (1.0 at the corner).
const VIGNETTE_START: f32 = 0.2;
const VIGNETTE_END: f32 = 0.95;

/// ACES filmic tone curve (Narkowicz fit), clamped to `[0, 1]`.
pub fn aces_filmic(x: f32) -> f32 {
    let num = x * (ACES_A * x + ACES_B);
    let den = x * (ACES_C * x + ACES_D) + ACES_E;
    (num / den).clamp(0.0, 1.0)
}

fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Tone-map the linear target into an opaque RGBA8 frame.
///
/// `exposure` scales linear light before the curve. `vignette` darkens toward the
/// corners with `1 - vignette * smoothstep(0.2, 0.95, r)` where `r` is 1.0 at the
/// frame corners; 0 leaves the frame untouched, 1 drives the corners to black.
pub fn resolve(target: &RasterTarget, exposure: f64, vignette: f64, out: &mut FrameRGBA) {
    if out.width != target.width || out.height != target.height {
        *out = FrameRGBA::new(Canvas {
            width: target.width,
            height: target.height,
        });
    }

    let exposure = exposure.max(0.0) as f32;
    let vignette = (vignette as f32).clamp(0.0, 1.0);
    let w = target.width as usize;
    let cx = target.width as f32 * 0.5;
    let cy = target.height as f32 * 0.5;
    let inv_corner = 1.0 / (cx * cx + cy * cy).sqrt().max(1e-6);

    out.data
        .par_chunks_mut(w.max(1) * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f32 + 0.5 - cy;
            for x in 0..w {
                let px = x as f32 + 0.5 - cx;
                let r = (px * px + py * py).sqrt() * inv_corner;
                let fade = 1.0 - vignette * smoothstep(VIGNETTE_START, VIGNETTE_END, r);
                let rgb = target.color[y * w + x];
                for c in 0..3 {
                    let v = aces_filmic(rgb[c] * exposure) * fade;
                    row[x * 4 + c] = (v * 255.0 + 0.5) as u8;
                }
                row[x * 4 + 3] = 255;
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/render/post.rs"]
mod tests;
