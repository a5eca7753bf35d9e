use crate::settings::AnimationSettings;
use glam::DVec3;
use std::f64::consts::TAU;

/// Number of orbiting point lights. Fixed by the motion model, not a setting.
pub const ORBIT_LIGHT_COUNT: usize = 3;

// Floor for the loop duration so the phase math stays finite even when a host
// writes 0 between two frames.
const MIN_DURATION_SECS: f64 = 1e-6;

/// Everything the renderer needs for one frame, derived from elapsed time and the
/// current settings snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransforms {
    /// Camera position in world space.
    pub camera_eye: DVec3,
    /// Camera look-at point (always the scene origin).
    pub camera_target: DVec3,
    /// Mesh rotation about the view axis, radians.
    pub mesh_roll: f64,
    /// Mesh translation along the view axis.
    pub mesh_lift: f64,
    /// Displacement intensity handed to geometry building.
    pub displacement_scale: f64,
    /// Exposure multiplier for the tone-mapping pass.
    pub exposure: f64,
    /// Orbiting point light positions in world space.
    pub lights: [DVec3; ORBIT_LIGHT_COUNT],
}

/// Map elapsed seconds and settings to frame transforms.
///
/// Pure function: identical inputs produce bit-identical outputs, which is what
/// makes captures reproducible. Every channel is driven by one normalized phase
/// `cycle = (elapsed mod duration) / duration * 2pi`, so the whole transform set
/// repeats exactly every `duration` seconds.
pub fn compute_frame(elapsed: f64, settings: &AnimationSettings) -> FrameTransforms {
    let duration = if settings.duration.is_finite() {
        settings.duration.max(MIN_DURATION_SECS)
    } else {
        MIN_DURATION_SECS
    };
    let cycle = (elapsed.rem_euclid(duration) / duration) * TAU;

    let sway_x = cycle.sin() * settings.sway;
    let lift_y = (0.8 * cycle).cos() * settings.sway * 0.6;
    let zoom_z = (0.5 * cycle).sin() * settings.zoom;
    let roll = (0.5 * cycle).sin() * settings.roll;
    let wave = (1.4 * cycle).sin() * settings.wave;

    let mut lights = [DVec3::ZERO; ORBIT_LIGHT_COUNT];
    for (i, light) in lights.iter_mut().enumerate() {
        let t = cycle + 2.0 * i as f64;
        *light = DVec3::new(
            4.0 * (0.35 * t).sin(),
            3.0 * (0.22 * t).cos() + 1.5,
            5.0 * (0.18 * t).sin() + 4.0,
        );
    }

    FrameTransforms {
        camera_eye: DVec3::new(0.8 * sway_x, 0.4 * lift_y, 3.1 + 3.2 * zoom_z),
        camera_target: DVec3::ZERO,
        mesh_roll: roll,
        mesh_lift: 0.45 * wave,
        displacement_scale: 0.75 * settings.depth,
        exposure: settings.exposure,
        lights,
    }
}

/// Accumulated playback clock with an edge-triggered restart.
///
/// The phase is advanced by the render loop and reset through a token rather than
/// a direct call, so any clone of the restart signal can request it without a
/// reference into the renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionPhase {
    elapsed: f64,
    last_restart_token: u64,
}

impl MotionPhase {
    /// Phase at the loop origin with token 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the restart token; zero the clock exactly when it changed.
    ///
    /// Returns `true` when a restart was applied. Several bumps between two frames
    /// collapse into one restart.
    pub fn sync_restart(&mut self, token: u64) -> bool {
        if token == self.last_restart_token {
            return false;
        }
        self.last_restart_token = token;
        self.elapsed = 0.0;
        true
    }

    /// Advance by `dt` seconds. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Seconds accumulated since the last restart.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/cycle.rs"]
mod tests;
