use crate::assets::decode::RgbaBitmap;
use crate::foundation::error::{DepthloopError, DepthloopResult};
use rayon::prelude::*;

/// Single-channel 8-bit field, tightly packed, row-major.
///
/// Used for the displacement map: 0 is the far plane, 255 the nearest relief.
#[derive(Clone, Debug)]
pub struct LumaBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// One byte per pixel, `width * height` long.
    pub data: Vec<u8>,
}

impl LumaBitmap {
    /// Sample the field bilinearly at normalized `(u, v)`, clamped to edges.
    ///
    /// Returns a height in `[0, 1]`.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }
        let x = u.clamp(0.0, 1.0) * (self.width as f32 - 1.0);
        let y = v.clamp(0.0, 1.0) * (self.height as f32 - 1.0);
        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = x - x0 as f32;
        let ty = y - y0 as f32;

        let at = |xx: u32, yy: u32| {
            f32::from(self.data[(yy * self.width + xx) as usize]) / 255.0
        };
        let top = at(x0, y0) * (1.0 - tx) + at(x1, y0) * tx;
        let bottom = at(x0, y1) * (1.0 - tx) + at(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

/// Derive a height field from pixel luminance (Rec.601 weights).
///
/// Bright pixels read as near, dark pixels as far. This is a heuristic, not depth
/// estimation: a white wall in shadow lands behind a sunlit floor. It is cheap,
/// deterministic and model-free, which is the trade this crate makes.
pub fn luminance_map(src: &RgbaBitmap) -> LumaBitmap {
    let w = src.width as usize;
    let mut data = vec![0u8; w * src.height as usize];
    data.par_chunks_mut(w.max(1)).enumerate().for_each(|(y, row)| {
        let src_row = &src.data[y * w * 4..(y + 1) * w * 4];
        for (x, out) in row.iter_mut().enumerate() {
            let px = &src_row[x * 4..x * 4 + 4];
            let l = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
            *out = l.round().min(255.0) as u8;
        }
    });
    LumaBitmap {
        width: src.width,
        height: src.height,
        data,
    }
}

/// Separable Gaussian blur over a single-channel field.
///
/// Radius 0 is the identity. Edges clamp. The kernel is Q16 fixed-point so the
/// result is platform-independent.
pub fn blur_luma(src: &LumaBitmap, radius: u32, sigma: f32) -> DepthloopResult<LumaBitmap> {
    let expected_len = (src.width as usize)
        .checked_mul(src.height as usize)
        .ok_or_else(|| DepthloopError::render("blur buffer size overflow"))?;
    if src.data.len() != expected_len {
        return Err(DepthloopError::render(
            "blur_luma expects data matching width*height",
        ));
    }
    if radius == 0 {
        return Ok(src.clone());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(&src.data, &mut tmp, src.width, &kernel);
    vertical_pass(&tmp, &mut out, src.width, src.height, &kernel);
    Ok(LumaBitmap {
        width: src.width,
        height: src.height,
        data: out,
    })
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> DepthloopResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(DepthloopError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(DepthloopError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Distribute rounding error onto the center tap so the kernel sums to 1.0 in Q16.
    let target: i64 = 65536;
    let delta = target - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        let new_mid = (mid_val + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    dst.par_chunks_mut(width.max(1) as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let base = y * width as usize;
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let dx = ki as i32 - radius;
                    let sx = (x as i32 + dx).clamp(0, w - 1);
                    acc += u64::from(kw) * u64::from(src[base + sx as usize]);
                }
                *out = q16_to_u8(acc);
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let h = height as i32;
    dst.par_chunks_mut(width.max(1) as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let dy = ki as i32 - radius;
                    let sy = (y as i32 + dy).clamp(0, h - 1);
                    acc += u64::from(kw) * u64::from(src[sy as usize * width as usize + x]);
                }
                *out = q16_to_u8(acc);
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/assets/depth.rs"]
mod tests;
