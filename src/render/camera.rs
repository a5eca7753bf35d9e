use crate::foundation::core::Canvas;
use glam::{DVec3, Mat4, Vec3};
use std::f32::consts::FRAC_PI_4;

/// Vertical field of view, radians.
pub const FOV_Y: f32 = FRAC_PI_4;

/// Near clip plane distance in world units.
pub const NEAR_PLANE: f32 = 0.1;

/// Far clip plane distance in world units.
pub const FAR_PLANE: f32 = 100.0;

/// View and projection matrices for one frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraMatrices {
    /// World to view.
    pub view: Mat4,
    /// View to clip (depth range 0..1).
    pub proj: Mat4,
    /// Combined world to clip.
    pub view_proj: Mat4,
    /// Camera position in world space.
    pub eye: Vec3,
}

/// Build right-handed camera matrices for `eye` looking at `target`, +Y up.
pub fn camera_matrices(eye: DVec3, target: DVec3, viewport: Canvas) -> CameraMatrices {
    let mut eye = eye.as_vec3();
    let target = target.as_vec3();
    // Degenerate look-at (eye on the target) would produce NaNs; nudge instead.
    if eye.distance_squared(target) < 1e-12 {
        eye.z += 1e-3;
    }
    let proj = Mat4::perspective_rh(FOV_Y, viewport.aspect() as f32, NEAR_PLANE, FAR_PLANE);
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    CameraMatrices {
        view,
        proj,
        view_proj: proj * view,
        eye,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
