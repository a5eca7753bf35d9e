use crate::foundation::error::{DepthloopError, DepthloopResult};

/// Straight-alpha RGBA8 bitmap, tightly packed, row-major.
///
/// Photo textures are treated as opaque throughout the pipeline; alpha is carried
/// but never blended.
#[derive(Clone, Debug)]
pub struct RgbaBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl RgbaBitmap {
    /// Fetch one pixel. Coordinates are clamped to the bitmap edges.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into straight RGBA8.
///
/// Unsupported or corrupt input maps to [`DepthloopError::Decode`].
pub fn decode_rgba8(bytes: &[u8]) -> DepthloopResult<RgbaBitmap> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| DepthloopError::decode(format!("image decode failed: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbaBitmap {
        width,
        height,
        data: rgba.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
