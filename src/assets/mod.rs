//! Image preparation: decoding, displacement-map derivation, resolution bounding.
//!
//! `prepare` is the single entry point; hosts call it off the render loop and hand
//! the resulting [`prepare::PreparedImage`] to the player.

/// Decode encoded image bytes into RGBA8 bitmaps.
pub mod decode;
/// Luminance-derived displacement maps and their blur.
pub mod depth;
/// The preparation pipeline producing [`prepare::PreparedImage`].
pub mod prepare;
