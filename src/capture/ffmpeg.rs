use crate::capture::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{DepthloopError, DepthloopResult};
use crate::render::raster::FrameRGBA;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Video codec for capture output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    /// `libx264` into MP4.
    H264,
    /// `libopenh264` into MP4.
    OpenH264,
    /// ffmpeg's built-in `mpeg4` into MP4. Needs no external encoder library.
    Mpeg4,
    /// `libvpx-vp9` into WebM.
    Vp9,
}

impl Codec {
    /// All codecs in selection preference order.
    pub const PREFERENCE: [Codec; 4] = [Codec::H264, Codec::OpenH264, Codec::Mpeg4, Codec::Vp9];

    /// The ffmpeg encoder name passed to `-c:v`.
    pub fn encoder_name(self) -> &'static str {
        match self {
            Codec::H264 => "libx264",
            Codec::OpenH264 => "libopenh264",
            Codec::Mpeg4 => "mpeg4",
            Codec::Vp9 => "libvpx-vp9",
        }
    }

    /// File extension of the container this codec is written into.
    pub fn container_ext(self) -> &'static str {
        match self {
            Codec::Vp9 => "webm",
            _ => "mp4",
        }
    }

    fn is_mp4(self) -> bool {
        self.container_ext() == "mp4"
    }
}

/// Query the system ffmpeg for the video encoders it was built with.
pub fn probe_encoders() -> DepthloopResult<Vec<String>> {
    let out = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            DepthloopError::capture(format!(
                "failed to run ffmpeg -encoders (is it installed and on PATH?): {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(DepthloopError::capture(format!(
            "ffmpeg -encoders exited with status {}",
            out.status
        )));
    }
    Ok(parse_encoder_list(&String::from_utf8_lossy(&out.stdout)))
}

/// Pick the most preferred codec among the probed `encoders`.
pub fn select_codec(encoders: &[String]) -> DepthloopResult<Codec> {
    for codec in Codec::PREFERENCE {
        if encoders.iter().any(|name| name == codec.encoder_name()) {
            return Ok(codec);
        }
    }
    let wanted: Vec<&str> = Codec::PREFERENCE.iter().map(|c| c.encoder_name()).collect();
    Err(DepthloopError::unsupported_codec(format!(
        "this ffmpeg build has none of {}; {} video encoders probed",
        wanted.join(", "),
        encoders.len()
    )))
}

// `ffmpeg -encoders` prints a legend, a `------` rule, then one encoder per
// line: a flag column (`V` marks video) and the encoder name.
fn parse_encoder_list(output: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut past_rule = false;
    for line in output.lines() {
        let line = line.trim();
        if !past_rule {
            past_rule = line.starts_with("------");
            continue;
        }
        let mut cols = line.split_whitespace();
        if let (Some(flags), Some(name)) = (cols.next(), cols.next())
            && flags.starts_with('V')
        {
            names.push(name.to_string());
        }
    }
    names
}

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output video file path. Extension should match the codec's container.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Encoder handed to ffmpeg.
    pub codec: Codec,
}

impl FfmpegSinkOpts {
    /// Create options writing `out_path` with `codec`, overwriting by default.
    pub fn new(out_path: impl Into<PathBuf>, codec: Codec) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            codec,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to its stdin.
///
/// Frames arrive as opaque straight-alpha RGBA8 and are piped through unchanged;
/// ffmpeg handles the pixel format conversion and the container.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    frame_len: usize,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            frame_len: 0,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> DepthloopResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(DepthloopError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(DepthloopError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(DepthloopError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(DepthloopError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(DepthloopError::capture(
                "ffmpeg is required for video capture, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        // Input: raw opaque RGBA8 frames on stdin at the capture rate.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ]);

        // Output: selected encoder, yuv420p for broad player compatibility.
        cmd.args(["-an", "-c:v", self.opts.codec.encoder_name(), "-pix_fmt", "yuv420p"]);
        if self.opts.codec.is_mp4() {
            cmd.args(["-movflags", "+faststart"]);
        }
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            DepthloopError::capture(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DepthloopError::capture("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DepthloopError::capture("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.frame_len = (cfg.width * cfg.height * 4) as usize;
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DepthloopResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| DepthloopError::capture("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(DepthloopError::capture(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(DepthloopError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.frame_len {
            return Err(DepthloopError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DepthloopError::capture("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            DepthloopError::capture(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> DepthloopResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| DepthloopError::capture("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            DepthloopError::capture(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| DepthloopError::capture("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| DepthloopError::capture(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(DepthloopError::capture(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> DepthloopResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

// The spawn/stream/wait path needs a real ffmpeg binary and is covered by the
// capture integration tests; the unit tests below stick to the pure parts.
#[cfg(test)]
#[path = "../../tests/unit/capture/ffmpeg.rs"]
mod tests;
