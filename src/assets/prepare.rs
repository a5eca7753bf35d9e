use crate::assets::decode::{RgbaBitmap, decode_rgba8};
use crate::assets::depth::{LumaBitmap, blur_luma, luminance_map};
use crate::foundation::error::{DepthloopError, DepthloopResult};
use anyhow::Context as _;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of one preparation run.
///
/// Ids come from a process-wide counter, so preparing identical bytes twice yields
/// distinct ids: replacing the active image always reads as a supersession
/// downstream, never as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u64);

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Options for [`prepare`].
#[derive(Clone, Debug)]
pub struct PrepareOpts {
    /// Largest allowed working dimension. Bigger sources are downsampled with a
    /// triangle filter; aspect is preserved.
    pub max_dimension: u32,
    /// Gaussian blur radius applied to the derived displacement map.
    pub blur_radius: u32,
    /// Gaussian blur sigma for the displacement map.
    pub blur_sigma: f32,
}

impl Default for PrepareOpts {
    fn default() -> Self {
        Self {
            max_dimension: 1024,
            blur_radius: 2,
            blur_sigma: 1.2,
        }
    }
}

/// An image readied for animation.
///
/// Both planes are PNG-encoded and shared behind [`Arc`], so clones are cheap and
/// the value can cross threads freely. The struct is immutable after preparation.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Identity of this preparation run.
    pub id: ImageId,
    /// Caller-provided label, `"photo"` when none was given.
    pub display_name: String,
    /// Color plane (RGBA8) at working resolution, PNG-encoded.
    pub color_png: Arc<Vec<u8>>,
    /// Displacement plane (8-bit grayscale), same dimensions, PNG-encoded.
    pub displacement_png: Arc<Vec<u8>>,
    /// Source width / source height, computed before any resampling.
    pub aspect: f64,
    /// Working width in pixels.
    pub width: u32,
    /// Working height in pixels.
    pub height: u32,
}

impl PreparedImage {
    /// Decode the color plane back into pixels.
    pub fn decode_color(&self) -> DepthloopResult<RgbaBitmap> {
        decode_rgba8(&self.color_png)
    }

    /// Decode the displacement plane back into a height field.
    pub fn decode_displacement(&self) -> DepthloopResult<LumaBitmap> {
        let img = image::load_from_memory(&self.displacement_png)
            .map_err(|e| DepthloopError::decode(format!("displacement decode failed: {e}")))?;
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();
        Ok(LumaBitmap {
            width,
            height,
            data: luma.into_raw(),
        })
    }
}

/// Prepare raw image bytes for animation.
///
/// Decodes, records the source aspect ratio, bounds the working resolution to
/// `opts.max_dimension`, derives the displacement map from Rec.601 luminance and
/// blurs it slightly, then PNG-encodes both planes.
///
/// The luminance heuristic treats bright as near. It misreads scenes where
/// brightness and distance disagree; that is a documented property of the
/// approach, not a defect in the pipeline.
#[tracing::instrument(skip(bytes, opts), fields(len = bytes.len()))]
pub fn prepare(bytes: &[u8], display_name: &str, opts: &PrepareOpts) -> DepthloopResult<PreparedImage> {
    if opts.max_dimension == 0 {
        return Err(DepthloopError::validation("max_dimension must be > 0"));
    }

    let decoded = decode_rgba8(bytes)?;
    if decoded.width == 0 || decoded.height == 0 {
        return Err(DepthloopError::decode("image has zero dimension"));
    }
    // Aspect comes from the source dimensions, before the working-resolution clamp.
    let aspect = f64::from(decoded.width) / f64::from(decoded.height);

    let color = bound_resolution(decoded, opts.max_dimension)?;
    let luma = luminance_map(&color);
    let displacement = blur_luma(&luma, opts.blur_radius, opts.blur_sigma)?;

    let color_png = encode_png(&color.data, color.width, color.height, image::ExtendedColorType::Rgba8)?;
    let displacement_png = encode_png(
        &displacement.data,
        displacement.width,
        displacement.height,
        image::ExtendedColorType::L8,
    )?;

    let id = ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed));
    let display_name = if display_name.is_empty() {
        "photo".to_string()
    } else {
        display_name.to_string()
    };
    tracing::debug!(id = id.0, width = color.width, height = color.height, "prepared image");

    Ok(PreparedImage {
        id,
        display_name,
        color_png: Arc::new(color_png),
        displacement_png: Arc::new(displacement_png),
        aspect,
        width: color.width,
        height: color.height,
    })
}

fn bound_resolution(src: RgbaBitmap, max_dimension: u32) -> DepthloopResult<RgbaBitmap> {
    let largest = src.width.max(src.height);
    if largest <= max_dimension {
        return Ok(src);
    }
    let scale = f64::from(max_dimension) / f64::from(largest);
    let nw = ((f64::from(src.width) * scale).round() as u32).max(1);
    let nh = ((f64::from(src.height) * scale).round() as u32).max(1);

    let img = image::RgbaImage::from_raw(src.width, src.height, src.data)
        .ok_or_else(|| DepthloopError::render("bitmap length does not match dimensions"))?;
    let resized = image::imageops::resize(&img, nw, nh, image::imageops::FilterType::Triangle);
    Ok(RgbaBitmap {
        width: nw,
        height: nh,
        data: resized.into_raw(),
    })
}

fn encode_png(
    data: &[u8],
    width: u32,
    height: u32,
    color: image::ExtendedColorType,
) -> DepthloopResult<Vec<u8>> {
    let mut png = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut png),
        data,
        width,
        height,
        color,
        image::ImageFormat::Png,
    )
    .context("encode plane as png")?;
    Ok(png)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/prepare.rs"]
mod tests;
