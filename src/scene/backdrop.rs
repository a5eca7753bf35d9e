use glam::Vec3;
use std::f32::consts::TAU;

/// Number of points in the particle field.
pub const PARTICLE_COUNT: usize = 2000;

/// Segments of the backdrop ring annulus.
pub const RING_SEGMENTS: u32 = 64;

/// Ring rotation rate, radians per second.
pub const RING_RATE: f64 = 0.05;

/// Particle field rotation rate, radians per second.
pub const PARTICLE_RATE: f64 = 0.02;

/// Flat color of the ring, linear RGB.
pub const RING_RGB: [f32; 3] = [0.05, 0.06, 0.09];

/// Flat color of the particles, linear RGB.
pub const PARTICLE_RGB: [f32; 3] = [0.35, 0.38, 0.45];

const RING_INNER: f32 = 2.6;
const RING_OUTER: f32 = 4.0;
const RING_Z: f32 = -3.2;

const PARTICLE_RADIUS_MIN: f32 = 2.8;
const PARTICLE_RADIUS_MAX: f32 = 7.5;
const PARTICLE_Z_MIN: f32 = -4.5;
const PARTICLE_Z_MAX: f32 = -1.2;

const FIELD_SEED: u64 = 10_007;

/// Deterministic 64-bit generator (SplitMix64). Identical sequence on every
/// platform, which keeps the backdrop reproducible frame for frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f32_01(&mut self) -> f32 {
        // 24 bits of precision.
        let v = self.next_u64() >> 40;
        (v as f32) * (1.0 / ((1u64 << 24) as f32))
    }
}

/// Cosmetic background behind the photo plane: a slow ring and a particle field.
///
/// Both rotate on their own accumulators at fixed rates. The motion-phase restart
/// deliberately does not touch them, so restarting the loop never snaps the
/// background.
#[derive(Clone, Debug)]
pub struct Backdrop {
    particles: Vec<Vec3>,
    ring_positions: Vec<Vec3>,
    ring_indices: Vec<u32>,
    ring_angle: f64,
    particle_angle: f64,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

impl Backdrop {
    /// Build the ring annulus and scatter the particle field from a fixed seed.
    pub fn new() -> Self {
        let mut rng = Rng64::new(FIELD_SEED);
        let mut particles = Vec::with_capacity(PARTICLE_COUNT);
        for _ in 0..PARTICLE_COUNT {
            let radius =
                PARTICLE_RADIUS_MIN + (PARTICLE_RADIUS_MAX - PARTICLE_RADIUS_MIN) * rng.next_f32_01();
            let theta = TAU * rng.next_f32_01();
            let z = PARTICLE_Z_MIN + (PARTICLE_Z_MAX - PARTICLE_Z_MIN) * rng.next_f32_01();
            particles.push(Vec3::new(radius * theta.cos(), radius * theta.sin(), z));
        }

        let mut ring_positions = Vec::with_capacity(2 * RING_SEGMENTS as usize);
        for s in 0..RING_SEGMENTS {
            let angle = TAU * s as f32 / RING_SEGMENTS as f32;
            let (sin, cos) = angle.sin_cos();
            ring_positions.push(Vec3::new(RING_INNER * cos, RING_INNER * sin, RING_Z));
            ring_positions.push(Vec3::new(RING_OUTER * cos, RING_OUTER * sin, RING_Z));
        }
        let mut ring_indices = Vec::with_capacity(6 * RING_SEGMENTS as usize);
        for s in 0..RING_SEGMENTS {
            let next = (s + 1) % RING_SEGMENTS;
            let i0 = 2 * s;
            let o0 = 2 * s + 1;
            let i1 = 2 * next;
            let o1 = 2 * next + 1;
            ring_indices.extend_from_slice(&[i0, o0, o1, i0, o1, i1]);
        }

        Self {
            particles,
            ring_positions,
            ring_indices,
            ring_angle: 0.0,
            particle_angle: 0.0,
        }
    }

    /// Advance both rotation accumulators by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.ring_angle += RING_RATE * dt;
            self.particle_angle += PARTICLE_RATE * dt;
        }
    }

    /// Particle positions at angle 0.
    pub fn particles(&self) -> &[Vec3] {
        &self.particles
    }

    /// Ring vertex positions at angle 0.
    pub fn ring_positions(&self) -> &[Vec3] {
        &self.ring_positions
    }

    /// Ring triangle list.
    pub fn ring_indices(&self) -> &[u32] {
        &self.ring_indices
    }

    /// Current ring rotation in radians.
    pub fn ring_angle(&self) -> f64 {
        self.ring_angle
    }

    /// Current particle field rotation in radians.
    pub fn particle_angle(&self) -> f64 {
        self.particle_angle
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/backdrop.rs"]
mod tests;
