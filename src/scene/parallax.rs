use crate::assets::decode::RgbaBitmap;
use crate::assets::depth::LumaBitmap;
use crate::assets::prepare::{ImageId, PreparedImage};
use crate::foundation::error::DepthloopResult;
use crate::motion::cycle::ORBIT_LIGHT_COUNT;
use crate::scene::mesh::{self, DisplacedGeometry, PlaneMesh};
use xxhash_rust::xxh3::xxh3_64;

/// Per-light tint, warm to cool, indexed by orbit light.
pub(crate) const LIGHT_COLORS: [[f32; 3]; ORBIT_LIGHT_COUNT] = [
    [1.0, 0.93, 0.85],
    [0.82, 0.88, 1.0],
    [0.90, 0.90, 0.92],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GeometryKey {
    fingerprint: u64,
    scale_bits: u64,
}

/// One photo mounted on a displaced plane, ready to draw.
///
/// Geometry is cached per `(displacement content, scale)`; re-running the setup
/// with unchanged inputs is a cheap no-op, so the renderer can call
/// [`ParallaxScene::ensure_geometry`] every frame.
pub(crate) struct ParallaxScene {
    /// Identity of the prepared image driving this scene.
    pub image_id: ImageId,
    /// Decoded color plane used as the mesh texture.
    pub texture: RgbaBitmap,
    /// Source width over height.
    pub aspect: f64,
    /// The undisplaced plane grid.
    pub mesh: PlaneMesh,

    displacement: LumaBitmap,
    fingerprint: u64,
    geometry: Option<(GeometryKey, DisplacedGeometry)>,
}

impl ParallaxScene {
    /// Decode both planes of a prepared image and build the plane grid.
    pub fn from_prepared(img: &PreparedImage, subdivisions: u32) -> DepthloopResult<Self> {
        let texture = img.decode_color()?;
        let displacement = img.decode_displacement()?;
        let fingerprint = xxh3_64(&displacement.data);
        let mesh = mesh::plane_grid(img.aspect, subdivisions);
        Ok(Self {
            image_id: img.id,
            texture,
            aspect: img.aspect,
            mesh,
            displacement,
            fingerprint,
            geometry: None,
        })
    }

    /// Rebuild displaced geometry when `(displacement content, scale)` changed.
    pub fn ensure_geometry(&mut self, displacement_scale: f64) {
        let key = GeometryKey {
            fingerprint: self.fingerprint,
            scale_bits: displacement_scale.to_bits(),
        };
        if self.geometry.as_ref().is_some_and(|(k, _)| *k == key) {
            return;
        }
        let geo = mesh::displace(&self.mesh, &self.displacement, displacement_scale as f32);
        self.geometry = Some((key, geo));
    }

    /// The current displaced geometry, if [`Self::ensure_geometry`] ran.
    pub fn geometry(&self) -> Option<&DisplacedGeometry> {
        self.geometry.as_ref().map(|(_, g)| g)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/parallax.rs"]
mod tests;
