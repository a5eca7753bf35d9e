use crate::assets::depth::LumaBitmap;
use glam::{Vec2, Vec3};

/// World-space height of the photo plane. Width follows the image aspect.
pub const PLANE_HEIGHT: f32 = 2.0;

/// Default grid resolution in quads per axis.
pub const DEFAULT_SUBDIVISIONS: u32 = 256;

/// Subdivided photo plane in the XY plane, centered at the origin, facing +Z.
///
/// `base_positions` hold the undisplaced grid (`z = 0`); displaced positions and
/// normals are built per displacement scale by [`displace`].
#[derive(Clone, Debug)]
pub struct PlaneMesh {
    /// Quads per axis.
    pub subdivisions: u32,
    /// Undisplaced vertex grid, `(subdivisions + 1)^2` entries, row-major from the
    /// top-left corner of the image.
    pub base_positions: Vec<Vec3>,
    /// Texture coordinates per vertex; `v` grows downward like image rows.
    pub uvs: Vec<Vec2>,
    /// Triangle list, counter-clockwise seen from +Z.
    pub indices: Vec<u32>,
}

/// Build the subdivided plane grid for an image with the given aspect ratio.
pub fn plane_grid(aspect: f64, subdivisions: u32) -> PlaneMesh {
    let subdivisions = subdivisions.max(1);
    let width = PLANE_HEIGHT * (aspect.max(1e-3) as f32);
    let half_w = width / 2.0;
    let half_h = PLANE_HEIGHT / 2.0;

    let per_axis = subdivisions + 1;
    let mut base_positions = Vec::with_capacity((per_axis * per_axis) as usize);
    let mut uvs = Vec::with_capacity((per_axis * per_axis) as usize);
    for iy in 0..=subdivisions {
        let v = iy as f32 / subdivisions as f32;
        let y = half_h - PLANE_HEIGHT * v;
        for ix in 0..=subdivisions {
            let u = ix as f32 / subdivisions as f32;
            let x = -half_w + width * u;
            base_positions.push(Vec3::new(x, y, 0.0));
            uvs.push(Vec2::new(u, v));
        }
    }

    let stride = per_axis;
    let mut indices = Vec::with_capacity((subdivisions * subdivisions * 6) as usize);
    for iy in 0..subdivisions {
        for ix in 0..subdivisions {
            let i0 = iy * stride + ix;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i3, i0, i3, i1]);
        }
    }

    PlaneMesh {
        subdivisions,
        base_positions,
        uvs,
        indices,
    }
}

/// Displaced vertex data for one `(displacement content, scale)` pair.
#[derive(Clone, Debug)]
pub struct DisplacedGeometry {
    /// Vertex positions with `z = height * scale`.
    pub positions: Vec<Vec3>,
    /// Unit normals smoothed by central differences over the height field.
    pub normals: Vec<Vec3>,
}

/// Sample the height field at every vertex and derive smoothed normals.
///
/// With `scale = 0` the output is exactly planar and all normals are +Z.
pub fn displace(mesh: &PlaneMesh, field: &LumaBitmap, scale: f32) -> DisplacedGeometry {
    let mut positions = mesh.base_positions.clone();
    for (pos, uv) in positions.iter_mut().zip(mesh.uvs.iter()) {
        pos.z = field.sample_bilinear(uv.x, uv.y) * scale;
    }

    let stride = mesh.subdivisions + 1;
    let mut normals = Vec::with_capacity(positions.len());
    for iy in 0..stride {
        for ix in 0..stride {
            // Central differences, one-sided at the grid edges.
            let x0 = ix.saturating_sub(1);
            let x1 = (ix + 1).min(stride - 1);
            let y0 = iy.saturating_sub(1);
            let y1 = (iy + 1).min(stride - 1);

            let left = positions[(iy * stride + x0) as usize];
            let right = positions[(iy * stride + x1) as usize];
            let above = positions[(y0 * stride + ix) as usize];
            let below = positions[(y1 * stride + ix) as usize];

            let dzdx = if right.x > left.x {
                (right.z - left.z) / (right.x - left.x)
            } else {
                0.0
            };
            let dzdy = if above.y > below.y {
                (above.z - below.z) / (above.y - below.y)
            } else {
                0.0
            };

            normals.push(Vec3::new(-dzdx, -dzdy, 1.0).normalize());
        }
    }

    DisplacedGeometry { positions, normals }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mesh.rs"]
mod tests;
