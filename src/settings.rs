use crate::foundation::error::{DepthloopError, DepthloopResult};
use std::sync::{Arc, PoisonError, RwLock};

/// Tunable parameters of the animation.
///
/// All fields are plain `f64` multipliers or seconds. Values are validated for
/// numeric sanity (finite) at the [`SettingsHandle`] boundary; artistic range is
/// the caller's business.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Loop duration in seconds. One full motion cycle spans exactly this long.
    pub duration: f64,
    /// Displacement intensity. 0 flattens the mesh to a plane.
    pub depth: f64,
    /// Lateral/vertical camera drift amplitude. 0 pins the camera to the axis.
    pub sway: f64,
    /// Camera dolly amplitude along the view axis.
    pub zoom: f64,
    /// Mesh roll amplitude about the view axis, in radians.
    pub roll: f64,
    /// Mesh push/pull amplitude along the view axis.
    pub wave: f64,
    /// Exposure multiplier applied before tone mapping.
    pub exposure: f64,
    /// Vignette strength. 0 leaves the frame untouched, 1 drives corners to black.
    pub vignette: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration: 10.0,
            depth: 1.0,
            sway: 1.0,
            zoom: 0.2,
            roll: 0.06,
            wave: 0.25,
            exposure: 1.25,
            vignette: 0.4,
        }
    }
}

impl AnimationSettings {
    /// Read one field by key.
    pub fn get(&self, key: SettingKey) -> f64 {
        match key {
            SettingKey::Duration => self.duration,
            SettingKey::Depth => self.depth,
            SettingKey::Sway => self.sway,
            SettingKey::Zoom => self.zoom,
            SettingKey::Roll => self.roll,
            SettingKey::Wave => self.wave,
            SettingKey::Exposure => self.exposure,
            SettingKey::Vignette => self.vignette,
        }
    }

    fn set(&mut self, key: SettingKey, value: f64) {
        match key {
            SettingKey::Duration => self.duration = value,
            SettingKey::Depth => self.depth = value,
            SettingKey::Sway => self.sway = value,
            SettingKey::Zoom => self.zoom = value,
            SettingKey::Roll => self.roll = value,
            SettingKey::Wave => self.wave = value,
            SettingKey::Exposure => self.exposure = value,
            SettingKey::Vignette => self.vignette = value,
        }
    }

    fn validate(&self) -> DepthloopResult<()> {
        for key in SettingKey::ALL {
            if !self.get(key).is_finite() {
                return Err(DepthloopError::validation(format!(
                    "setting '{}' must be finite",
                    key.name()
                )));
            }
        }
        Ok(())
    }
}

/// Field selector for [`SettingsHandle::set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Loop duration in seconds.
    Duration,
    /// Displacement intensity.
    Depth,
    /// Camera drift amplitude.
    Sway,
    /// Camera dolly amplitude.
    Zoom,
    /// Mesh roll amplitude.
    Roll,
    /// Mesh push/pull amplitude.
    Wave,
    /// Exposure multiplier.
    Exposure,
    /// Vignette strength.
    Vignette,
}

impl SettingKey {
    /// Every key, in declaration order.
    pub const ALL: [SettingKey; 8] = [
        SettingKey::Duration,
        SettingKey::Depth,
        SettingKey::Sway,
        SettingKey::Zoom,
        SettingKey::Roll,
        SettingKey::Wave,
        SettingKey::Exposure,
        SettingKey::Vignette,
    ];

    /// Stable snake_case name, matching the serde form.
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::Duration => "duration",
            SettingKey::Depth => "depth",
            SettingKey::Sway => "sway",
            SettingKey::Zoom => "zoom",
            SettingKey::Roll => "roll",
            SettingKey::Wave => "wave",
            SettingKey::Exposure => "exposure",
            SettingKey::Vignette => "vignette",
        }
    }
}

/// Shared, cloneable handle to the live [`AnimationSettings`].
///
/// The renderer, the recorder and the host all hold clones of one handle. Reads
/// take a coherent snapshot; writes are atomic per call, so a frame never sees a
/// half-applied `reset`.
#[derive(Clone, Debug, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<AnimationSettings>>,
}

impl SettingsHandle {
    /// Create a handle holding the default parameter table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a coherent snapshot of all parameters.
    pub fn get(&self) -> AnimationSettings {
        *self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set one parameter. Non-finite values are rejected; range is not clamped.
    pub fn set(&self, key: SettingKey, value: f64) -> DepthloopResult<()> {
        if !value.is_finite() {
            return Err(DepthloopError::validation(format!(
                "setting '{}' must be finite",
                key.name()
            )));
        }
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(key, value);
        Ok(())
    }

    /// Replace the whole parameter table in one write.
    pub fn replace(&self, settings: AnimationSettings) -> DepthloopResult<()> {
        settings.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    /// Restore the default table. All fields change under a single write lock.
    pub fn reset(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) =
            AnimationSettings::default();
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
