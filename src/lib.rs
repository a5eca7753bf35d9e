//! Depthloop turns a single photograph into a looping 3D parallax animation.
//!
//! The pipeline is deterministic end to end:
//!
//! - [`prepare`] an image: decode, bound the working resolution, derive a
//!   displacement map from pixel luminance
//! - Create a [`Player`] and install the [`PreparedImage`]
//! - Drive [`Player::tick`] to render frames of the motion cycle
//! - Start a capture to stream exactly one loop into a [`FrameSink`]
//!   (MP4/WebM through the system `ffmpeg`, or in-memory for tests)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding, displacement-map derivation and preparation.
pub mod assets;
/// Recording the animation into a video file.
pub mod capture;
/// The cyclic motion model (camera, mesh and light transforms per frame).
pub mod motion;
/// CPU rasterization backend and the per-frame render pipeline.
pub mod render;
pub(crate) mod scene;
/// The host-facing playback/capture session.
pub mod session;
/// Tunable animation parameters shared across renderer, recorder and host.
pub mod settings;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, RestartSignal};
pub use crate::foundation::error::{DepthloopError, DepthloopResult};

pub use crate::assets::prepare::{ImageId, PrepareOpts, PreparedImage, prepare};
pub use crate::capture::ffmpeg::{Codec, FfmpegSink, FfmpegSinkOpts};
pub use crate::capture::recorder::{CaptureStart, Recorder, VideoArtifact};
pub use crate::capture::sink::{FrameSink, InMemorySink, SharedMemorySink, SinkConfig};
pub use crate::motion::cycle::{FrameTransforms, MotionPhase, ORBIT_LIGHT_COUNT, compute_frame};
pub use crate::render::raster::FrameRGBA;
pub use crate::render::renderer::{SceneRenderer, SurfaceHandle};
pub use crate::session::player::{Player, PlayerOpts};
pub use crate::settings::{AnimationSettings, SettingKey, SettingsHandle};
