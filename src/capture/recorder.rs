use crate::capture::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{DepthloopError, DepthloopResult};
use crate::render::raster::FrameRGBA;
use std::path::{Path, PathBuf};

/// Outcome of [`Recorder::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureStart {
    /// A capture was started.
    Started,
    /// A capture was already running; the request was ignored.
    AlreadyRecording,
}

/// A finished capture.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoArtifact {
    /// Path of the encoded file, when the sink wrote one.
    pub path: Option<PathBuf>,
    /// Number of frames pushed.
    pub frames: u64,
    /// Captured timeline length in seconds.
    pub duration_secs: f64,
}

// Slack when comparing the accumulated clock against a frame boundary, so ticks
// of exactly 1/fps still land on their boundary after float accumulation.
const TICK_EPSILON: f64 = 1e-9;

struct ActiveCapture {
    sink: Box<dyn FrameSink>,
    out_path: Option<PathBuf>,
    fps: Fps,
    duration_secs: f64,
    target_frames: u64,
    pushed: u64,
    clock: f64,
}

/// Captures exactly one loop of rendered frames into a [`FrameSink`].
///
/// The recorder resamples the live render feed onto a fixed `1/fps` grid: every
/// tick adds that frame's wall-clock step, and the current frame is pushed once
/// per grid boundary the clock has crossed. A renderer that stalls therefore
/// duplicates frames instead of stretching the output timeline, and the file
/// always holds `round(duration * fps)` frames.
#[derive(Default)]
pub struct Recorder {
    active: Option<ActiveCapture>,
}

impl Recorder {
    /// Create an idle recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a capture is currently running.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Capture progress as `(pushed, target)` frame counts, when recording.
    pub fn progress(&self) -> Option<(u64, u64)> {
        self.active.as_ref().map(|a| (a.pushed, a.target_frames))
    }

    /// Start capturing one loop of `duration_secs` seconds at `fps`.
    ///
    /// Opens the sink against the canvas dimensions. A `begin` while a capture
    /// is already running is ignored, so a stray request can never tear down an
    /// in-flight file. `out_path` is only carried into the artifact and the
    /// failure cleanup; the sink itself decides where bytes go.
    pub fn begin(
        &mut self,
        canvas: Canvas,
        fps: Fps,
        duration_secs: f64,
        mut sink: Box<dyn FrameSink>,
        out_path: Option<PathBuf>,
    ) -> DepthloopResult<CaptureStart> {
        if self.active.is_some() {
            tracing::warn!("capture already running; begin ignored");
            return Ok(CaptureStart::AlreadyRecording);
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(DepthloopError::validation(
                "capture duration must be finite and positive",
            ));
        }

        let target_frames = fps.secs_to_frames_round(duration_secs).max(1);
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
        })?;
        self.active = Some(ActiveCapture {
            sink,
            out_path,
            fps,
            duration_secs,
            target_frames,
            pushed: 0,
            clock: 0.0,
        });
        tracing::info!(
            frames = target_frames,
            fps = fps.as_f64(),
            "capture started"
        );
        Ok(CaptureStart::Started)
    }

    /// Feed the freshly rendered frame and the wall-clock step that produced it.
    ///
    /// Returns the artifact on the tick that completes the capture. A sink error
    /// aborts the capture, removes the partial file and propagates. Idle ticks
    /// are no-ops.
    pub fn tick(&mut self, dt: f64, frame: &FrameRGBA) -> DepthloopResult<Option<VideoArtifact>> {
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };
        if dt.is_finite() && dt > 0.0 {
            active.clock += dt;
        }

        let frame_duration = active.fps.frame_duration_secs();
        let mut push_err = None;
        while active.pushed < active.target_frames
            && active.clock + TICK_EPSILON >= (active.pushed + 1) as f64 * frame_duration
        {
            match active.sink.push_frame(FrameIndex(active.pushed), frame) {
                Ok(()) => active.pushed += 1,
                Err(e) => {
                    push_err = Some(e);
                    break;
                }
            }
        }
        let done = active.pushed >= active.target_frames;

        if let Some(e) = push_err {
            self.abort_active();
            return Err(e);
        }
        if !done {
            return Ok(None);
        }

        let Some(mut finished) = self.active.take() else {
            return Ok(None);
        };
        if let Err(e) = finished.sink.end() {
            remove_partial(finished.out_path.as_deref());
            return Err(e);
        }
        let artifact = VideoArtifact {
            path: finished.out_path,
            frames: finished.pushed,
            duration_secs: finished.duration_secs,
        };
        tracing::info!(frames = artifact.frames, "capture finished");
        Ok(Some(artifact))
    }

    /// Cancel a running capture and discard its partial output. No-op when idle.
    pub fn cancel(&mut self) {
        if self.active.is_some() {
            tracing::warn!("capture cancelled");
            self.abort_active();
        }
    }

    fn abort_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            if let Err(e) = active.sink.end() {
                tracing::debug!(error = %e, "sink teardown during abort failed");
            }
            remove_partial(active.out_path.as_deref());
        }
    }
}

fn remove_partial(path: Option<&Path>) {
    if let Some(path) = path
        && path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial capture file");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
