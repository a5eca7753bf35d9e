use crate::assets::prepare::PreparedImage;
use crate::capture::ffmpeg::{self, FfmpegSink, FfmpegSinkOpts};
use crate::capture::recorder::{CaptureStart, Recorder, VideoArtifact};
use crate::capture::sink::FrameSink;
use crate::foundation::core::{Canvas, Fps, RestartSignal};
use crate::foundation::error::{DepthloopError, DepthloopResult};
use crate::render::raster::FrameRGBA;
use crate::render::renderer::{SceneRenderer, SurfaceHandle};
use crate::scene::mesh::DEFAULT_SUBDIVISIONS;
use crate::settings::SettingsHandle;
use std::path::{Path, PathBuf};

/// Construction parameters for [`Player`].
#[derive(Clone, Copy, Debug)]
pub struct PlayerOpts {
    /// Render surface dimensions.
    pub canvas: Canvas,
    /// Plane mesh density, quads per axis.
    pub subdivisions: u32,
    /// Capture frame rate.
    pub fps: Fps,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1280,
                height: 720,
            },
            subdivisions: DEFAULT_SUBDIVISIONS,
            fps: Fps { num: 30, den: 1 },
        }
    }
}

/// The embedding surface of the crate.
///
/// Owns the renderer, the recorder and the shared settings. The host drives it
/// with [`tick`] at whatever cadence it likes, swaps photos with [`set_image`]
/// and records one loop with [`start_capture`]; everything else is internal.
///
/// [`tick`]: Player::tick
/// [`set_image`]: Player::set_image
/// [`start_capture`]: Player::start_capture
pub struct Player {
    renderer: SceneRenderer,
    recorder: Recorder,
    settings: SettingsHandle,
    restart: RestartSignal,
    active: Option<PreparedImage>,
    capture_fps: Fps,
}

impl Player {
    /// Create a player with default settings and an idle recorder.
    pub fn new(opts: PlayerOpts) -> Self {
        let settings = SettingsHandle::new();
        let restart = RestartSignal::new();
        Self {
            renderer: SceneRenderer::new(
                opts.canvas,
                settings.clone(),
                restart.clone(),
                opts.subdivisions,
            ),
            recorder: Recorder::new(),
            settings,
            restart,
            active: None,
            capture_fps: opts.fps,
        }
    }

    /// Clone of the shared settings handle. Writes apply from the next tick.
    pub fn settings(&self) -> SettingsHandle {
        self.settings.clone()
    }

    /// Clone of the restart signal; any holder can restart the loop.
    pub fn restart_signal(&self) -> RestartSignal {
        self.restart.clone()
    }

    /// Registers a hook that fires once, when the first image lands.
    pub fn on_surface_ready(&mut self, hook: impl FnOnce(SurfaceHandle) + Send + 'static) {
        self.renderer.on_surface_ready(hook);
    }

    /// Install `image` as the active scene, replacing any previous one.
    ///
    /// Replacing the image mid-capture aborts the capture first and discards the
    /// half-written file.
    pub fn set_image(&mut self, image: PreparedImage) -> DepthloopResult<()> {
        if self.recorder.is_recording() {
            tracing::warn!("image replaced mid-capture; capture aborted");
            self.recorder.cancel();
        }
        self.renderer.install_scene(&image)?;
        self.active = Some(image);
        Ok(())
    }

    /// Drop the active image; only the backdrop renders afterwards.
    ///
    /// Aborts a running capture the same way [`set_image`](Player::set_image)
    /// does.
    pub fn clear_image(&mut self) {
        if self.recorder.is_recording() {
            tracing::warn!("image cleared mid-capture; capture aborted");
            self.recorder.cancel();
        }
        self.renderer.clear_scene();
        self.active = None;
    }

    /// The image behind the active scene, if any.
    pub fn active_image(&self) -> Option<&PreparedImage> {
        self.active.as_ref()
    }

    /// Restart the loop from phase zero on the next tick.
    pub fn restart(&self) {
        self.restart.bump();
    }

    /// Start capturing one loop into a video file under `out_dir`.
    ///
    /// Picks the best codec the system ffmpeg offers, names the file
    /// `parallax.<container>`, restarts the loop so the video starts at phase
    /// zero, and records one full loop at the configured capture rate. Returns
    /// [`CaptureStart::AlreadyRecording`] without side effects when a capture is
    /// already running; fails when no image is loaded.
    pub fn start_capture(&mut self, out_dir: &Path) -> DepthloopResult<CaptureStart> {
        if self.recorder.is_recording() {
            tracing::warn!("capture already running; start ignored");
            return Ok(CaptureStart::AlreadyRecording);
        }
        if self.active.is_none() {
            return Err(DepthloopError::validation(
                "no image loaded; nothing to capture",
            ));
        }
        let codec = ffmpeg::select_codec(&ffmpeg::probe_encoders()?)?;
        let out_path = out_dir.join(format!("parallax.{}", codec.container_ext()));
        let sink = Box::new(FfmpegSink::new(FfmpegSinkOpts::new(&out_path, codec)));
        self.begin_capture(sink, Some(out_path))
    }

    /// Start capturing one loop into a caller-provided sink.
    ///
    /// Same restart and duration semantics as [`Player::start_capture`]; for
    /// hosts (and tests) that encode elsewhere.
    pub fn start_capture_with_sink(
        &mut self,
        sink: Box<dyn FrameSink>,
    ) -> DepthloopResult<CaptureStart> {
        if self.active.is_none() {
            return Err(DepthloopError::validation(
                "no image loaded; nothing to capture",
            ));
        }
        self.begin_capture(sink, None)
    }

    fn begin_capture(
        &mut self,
        sink: Box<dyn FrameSink>,
        out_path: Option<PathBuf>,
    ) -> DepthloopResult<CaptureStart> {
        let duration = self.settings.get().duration;
        let started = self.recorder.begin(
            self.renderer.canvas(),
            self.capture_fps,
            duration,
            sink,
            out_path,
        )?;
        if started == CaptureStart::Started {
            self.restart.bump();
        }
        Ok(started)
    }

    /// Cancel any running capture, discarding the partial file. No-op when idle.
    pub fn cancel_capture(&mut self) {
        self.recorder.cancel();
    }

    /// Whether a capture is running.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Capture progress as `(pushed, target)` frame counts, when recording.
    pub fn capture_progress(&self) -> Option<(u64, u64)> {
        self.recorder.progress()
    }

    /// Advance the animation by `dt` seconds and render the next frame.
    ///
    /// Feeds the running capture, if any, and returns the artifact on the tick
    /// that completes it. Capture failures are logged and end the capture;
    /// playback itself never stops.
    pub fn tick(&mut self, dt: f64) -> Option<VideoArtifact> {
        self.renderer.render_next(dt);
        match self.recorder.tick(dt, self.renderer.frame()) {
            Ok(done) => done,
            Err(e) => {
                tracing::warn!(error = %e, "capture aborted");
                None
            }
        }
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &FrameRGBA {
        self.renderer.frame()
    }

    /// Render surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.renderer.canvas()
    }

    /// Seconds of animation time since creation or the last restart.
    pub fn elapsed(&self) -> f64 {
        self.renderer.elapsed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/player.rs"]
mod tests;
