use crate::assets::decode::RgbaBitmap;
use crate::foundation::core::Canvas;
use crate::render::camera::{CameraMatrices, NEAR_PLANE};
use glam::{Mat4, Vec2, Vec3};
use rayon::prelude::*;

/// A rendered frame as opaque RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long. Alpha is always 255.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Allocate an opaque black frame.
    pub fn new(canvas: Canvas) -> Self {
        let len = canvas.width as usize * canvas.height as usize * 4;
        let mut data = vec![0u8; len];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Fetch one pixel; coordinates must be in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// Linear-light render target with a depth buffer.
///
/// Color accumulates as f32 RGB; the post pass tone-maps it into a [`FrameRGBA`].
/// Depth is NDC z in 0..1, smaller is closer.
pub struct RasterTarget {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Linear RGB per pixel.
    pub color: Vec<[f32; 3]>,
    /// NDC depth per pixel.
    pub depth: Vec<f32>,
}

impl RasterTarget {
    /// Allocate a cleared target for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        let len = canvas.width as usize * canvas.height as usize;
        Self {
            width: canvas.width,
            height: canvas.height,
            color: vec![[0.0; 3]; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    /// Reset color to `rgb` and depth to infinity.
    pub fn clear(&mut self, rgb: [f32; 3]) {
        self.color.par_iter_mut().for_each(|c| *c = rgb);
        self.depth.par_iter_mut().for_each(|d| *d = f32::INFINITY);
    }
}

/// A positional light with quadratic distance falloff.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    /// World-space position.
    pub pos: Vec3,
    /// Linear RGB intensity.
    pub rgb: [f32; 3],
}

// Lambert shading terms.
const AMBIENT: f32 = 0.22;
const FALLOFF: f32 = 0.03;

// Rows per parallel rasterization band.
const BAND_ROWS: usize = 16;

#[derive(Clone, Copy)]
struct ScreenVert {
    x: f32,
    y: f32,
    // NDC depth; affine across the triangle in screen space.
    z: f32,
    inv_w: f32,
    // Perspective-correct attributes, pre-divided by w.
    u_w: f32,
    v_w: f32,
    rgb_w: [f32; 3],
}

struct ScreenTri {
    v: [ScreenVert; 3],
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

/// Draw a textured, vertex-lit triangle mesh.
///
/// Lighting is Lambert with quadratic falloff evaluated per vertex and
/// interpolated perspective-correct across triangles, then modulated by a
/// bilinear texture sample per pixel. Triangles with any vertex behind the near
/// plane are skipped whole rather than clipped; under the stock motion
/// amplitudes the mesh never reaches the near plane.
pub fn draw_mesh(
    target: &mut RasterTarget,
    camera: &CameraMatrices,
    model: Mat4,
    positions: &[Vec3],
    normals: &[Vec3],
    uvs: &[Vec2],
    indices: &[u32],
    texture: &RgbaBitmap,
    lights: &[PointLight],
) {
    let verts: Vec<Option<ScreenVert>> = positions
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            let world = model.transform_point3(*p);
            let normal = model.transform_vector3(normals[i]);
            let lit = shade_vertex(world, normal, lights);
            project_vertex(camera, target, world, uvs[i], lit)
        })
        .collect();

    let tris = assemble_triangles(&verts, indices, target);
    raster_triangles(target, &tris, Some(texture));
}

/// Draw an unlit, untextured triangle list in one flat color.
pub fn draw_flat(
    target: &mut RasterTarget,
    camera: &CameraMatrices,
    model: Mat4,
    positions: &[Vec3],
    indices: &[u32],
    rgb: [f32; 3],
) {
    let verts: Vec<Option<ScreenVert>> = positions
        .iter()
        .map(|p| {
            let world = model.transform_point3(*p);
            project_vertex(camera, target, world, Vec2::ZERO, rgb)
        })
        .collect();

    let tris = assemble_triangles(&verts, indices, target);
    raster_triangles(target, &tris, None);
}

/// Splat world-space points as small depth-tested squares.
pub fn draw_points(
    target: &mut RasterTarget,
    camera: &CameraMatrices,
    model: Mat4,
    points: &[Vec3],
    rgb: [f32; 3],
    size_px: u32,
) {
    struct Splat {
        x: i32,
        y: i32,
        z: f32,
    }

    let size = size_px.max(1) as i32;
    let splats: Vec<Splat> = points
        .iter()
        .filter_map(|p| {
            let world = model.transform_point3(*p);
            let v = project_vertex(camera, target, world, Vec2::ZERO, rgb)?;
            Some(Splat {
                x: v.x.floor() as i32 - size / 2,
                y: v.y.floor() as i32 - size / 2,
                z: v.z,
            })
        })
        .collect();

    let width = target.width as usize;
    target
        .color
        .par_chunks_mut(width * BAND_ROWS)
        .zip(target.depth.par_chunks_mut(width * BAND_ROWS))
        .enumerate()
        .for_each(|(band, (cband, dband))| {
            let y_start = (band * BAND_ROWS) as i32;
            let y_end = y_start + (cband.len() / width) as i32;
            for s in &splats {
                if s.y + size <= y_start || s.y >= y_end {
                    continue;
                }
                for y in s.y.max(y_start)..(s.y + size).min(y_end) {
                    for x in s.x.max(0)..(s.x + size).min(width as i32) {
                        let idx = (y - y_start) as usize * width + x as usize;
                        if s.z < dband[idx] {
                            dband[idx] = s.z;
                            cband[idx] = rgb;
                        }
                    }
                }
            }
        });
}

fn shade_vertex(world: Vec3, normal: Vec3, lights: &[PointLight]) -> [f32; 3] {
    let normal = normal.normalize_or_zero();
    let mut rgb = [AMBIENT; 3];
    for light in lights {
        let to_light = light.pos - world;
        let dist_sq = to_light.length_squared().max(1e-6);
        let ndotl = normal.dot(to_light / dist_sq.sqrt()).max(0.0);
        let atten = 1.0 / (1.0 + FALLOFF * dist_sq);
        for (c, out) in rgb.iter_mut().enumerate() {
            *out += ndotl * atten * light.rgb[c];
        }
    }
    rgb
}

fn project_vertex(
    camera: &CameraMatrices,
    target: &RasterTarget,
    world: Vec3,
    uv: Vec2,
    rgb: [f32; 3],
) -> Option<ScreenVert> {
    let clip = camera.view_proj * world.extend(1.0);
    // For a right-handed perspective projection w is the view-space distance.
    if clip.w <= NEAR_PLANE {
        return None;
    }
    let inv_w = 1.0 / clip.w;
    let ndc_x = clip.x * inv_w;
    let ndc_y = clip.y * inv_w;
    let ndc_z = clip.z * inv_w;
    Some(ScreenVert {
        x: (ndc_x + 1.0) * 0.5 * target.width as f32,
        y: (1.0 - ndc_y) * 0.5 * target.height as f32,
        z: ndc_z,
        inv_w,
        u_w: uv.x * inv_w,
        v_w: uv.y * inv_w,
        rgb_w: [rgb[0] * inv_w, rgb[1] * inv_w, rgb[2] * inv_w],
    })
}

fn assemble_triangles(
    verts: &[Option<ScreenVert>],
    indices: &[u32],
    target: &RasterTarget,
) -> Vec<ScreenTri> {
    indices
        .par_chunks_exact(3)
        .filter_map(|tri| {
            let a = verts.get(tri[0] as usize).copied().flatten()?;
            let b = verts.get(tri[1] as usize).copied().flatten()?;
            let c = verts.get(tri[2] as usize).copied().flatten()?;

            // Canonicalize winding so barycentric signs are uniform below.
            let area = orient2d(a.x, a.y, b.x, b.y, c.x, c.y);
            if area.abs() < 1e-6 {
                return None;
            }
            let (b, c) = if area < 0.0 { (c, b) } else { (b, c) };

            let min_x = a.x.min(b.x).min(c.x).floor() as i32;
            let max_x = a.x.max(b.x).max(c.x).ceil() as i32;
            let min_y = a.y.min(b.y).min(c.y).floor() as i32;
            let max_y = a.y.max(b.y).max(c.y).ceil() as i32;
            if max_x < 0
                || max_y < 0
                || min_x >= target.width as i32
                || min_y >= target.height as i32
            {
                return None;
            }
            Some(ScreenTri {
                v: [a, b, c],
                min_x: min_x.max(0),
                max_x: max_x.min(target.width as i32 - 1),
                min_y: min_y.max(0),
                max_y: max_y.min(target.height as i32 - 1),
            })
        })
        .collect()
}

fn raster_triangles(target: &mut RasterTarget, tris: &[ScreenTri], texture: Option<&RgbaBitmap>) {
    let width = target.width as usize;
    target
        .color
        .par_chunks_mut(width * BAND_ROWS)
        .zip(target.depth.par_chunks_mut(width * BAND_ROWS))
        .enumerate()
        .for_each(|(band, (cband, dband))| {
            let y_start = (band * BAND_ROWS) as i32;
            let y_end = y_start + (cband.len() / width) as i32;
            for tri in tris {
                if tri.max_y < y_start || tri.min_y >= y_end {
                    continue;
                }
                raster_one(cband, dband, width, y_start, y_end, tri, texture);
            }
        });
}

fn raster_one(
    cband: &mut [[f32; 3]],
    dband: &mut [f32],
    width: usize,
    y_start: i32,
    y_end: i32,
    tri: &ScreenTri,
    texture: Option<&RgbaBitmap>,
) {
    let [a, b, c] = tri.v;
    let area = orient2d(a.x, a.y, b.x, b.y, c.x, c.y);
    if area <= 0.0 {
        return;
    }
    let inv_area = 1.0 / area;

    for y in tri.min_y.max(y_start)..=tri.max_y.min(y_end - 1) {
        let py = y as f32 + 0.5;
        for x in tri.min_x..=tri.max_x {
            let px = x as f32 + 0.5;
            let w0 = orient2d(b.x, b.y, c.x, c.y, px, py);
            let w1 = orient2d(c.x, c.y, a.x, a.y, px, py);
            let w2 = orient2d(a.x, a.y, b.x, b.y, px, py);
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let b0 = w0 * inv_area;
            let b1 = w1 * inv_area;
            let b2 = w2 * inv_area;

            let z = b0 * a.z + b1 * b.z + b2 * c.z;
            let idx = (y - y_start) as usize * width + x as usize;
            if z >= dband[idx] {
                continue;
            }

            let inv_w = b0 * a.inv_w + b1 * b.inv_w + b2 * c.inv_w;
            let w = 1.0 / inv_w.max(1e-20);
            let mut rgb = [
                (b0 * a.rgb_w[0] + b1 * b.rgb_w[0] + b2 * c.rgb_w[0]) * w,
                (b0 * a.rgb_w[1] + b1 * b.rgb_w[1] + b2 * c.rgb_w[1]) * w,
                (b0 * a.rgb_w[2] + b1 * b.rgb_w[2] + b2 * c.rgb_w[2]) * w,
            ];
            if let Some(tex) = texture {
                let u = (b0 * a.u_w + b1 * b.u_w + b2 * c.u_w) * w;
                let v = (b0 * a.v_w + b1 * b.v_w + b2 * c.v_w) * w;
                let t = sample_texture(tex, u, v);
                rgb = [rgb[0] * t[0], rgb[1] * t[1], rgb[2] * t[2]];
            }

            dband[idx] = z;
            cband[idx] = rgb;
        }
    }
}

fn orient2d(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

/// Bilinear RGBA8 texture fetch; coordinates clamp to the edge texels.
fn sample_texture(tex: &RgbaBitmap, u: f32, v: f32) -> [f32; 3] {
    if tex.width == 0 || tex.height == 0 {
        return [0.0; 3];
    }
    let x = u.clamp(0.0, 1.0) * (tex.width as f32 - 1.0);
    let y = v.clamp(0.0, 1.0) * (tex.height as f32 - 1.0);
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let tx = x - x0 as f32;
    let ty = y - y0 as f32;

    let p00 = tex.pixel_clamped(x0, y0);
    let p10 = tex.pixel_clamped(x0 + 1, y0);
    let p01 = tex.pixel_clamped(x0, y0 + 1);
    let p11 = tex.pixel_clamped(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 3];
    for (c, val) in out.iter_mut().enumerate() {
        let top = f32::from(p00[c]) * (1.0 - tx) + f32::from(p10[c]) * tx;
        let bottom = f32::from(p01[c]) * (1.0 - tx) + f32::from(p11[c]) * tx;
        *val = (top * (1.0 - ty) + bottom * ty) / 255.0;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
