use crate::foundation::error::{DepthloopError, DepthloopResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Absolute 0-based frame index in capture timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> DepthloopResult<Self> {
        if den == 0 {
            return Err(DepthloopError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(DepthloopError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert a duration in seconds to the nearest frame count.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Render target dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    ///
    /// Video sinks impose stricter constraints (even dimensions for `yuv420p`);
    /// those are checked where the sink is opened.
    pub fn new(width: u32, height: u32) -> DepthloopResult<Self> {
        if width == 0 || height == 0 {
            return Err(DepthloopError::validation(
                "Canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Monotonically increasing token that requests a motion-phase restart.
///
/// Handles are cheap clones of one shared counter. The consumer is edge-triggered:
/// the phase resets exactly when the observed value differs from the last value it
/// saw, so several `bump` calls between two frames collapse into a single reset.
#[derive(Clone, Debug, Default)]
pub struct RestartSignal(Arc<AtomicU64>);

impl RestartSignal {
    /// Create a fresh signal with token 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the token, requesting a restart of the motion phase.
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current token value.
    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
