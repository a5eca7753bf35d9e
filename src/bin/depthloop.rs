use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use depthloop::{
    AnimationSettings, Canvas, Fps, Player, PlayerOpts, PrepareOpts, PreparedImage, prepare,
};

#[derive(Parser, Debug)]
#[command(name = "depthloop", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture one animation loop as a video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the animation at one point in time as a PNG.
    Frame(FrameArgs),
    /// Export the displacement map derived from a photo as a PNG.
    Depth(DepthArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input photo (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory for the output video; the file is named `parallax.<container>`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Animation settings JSON file. Defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Capture frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output size as WIDTHxHEIGHT. Both must be even for video output.
    #[arg(long, default_value = "1280x720", value_parser = parse_size)]
    size: Canvas,

    /// Plane mesh density, quads per axis.
    #[arg(long)]
    subdivisions: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input photo (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Point in time to render, in seconds from the loop origin.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Animation settings JSON file. Defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output size as WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x720", value_parser = parse_size)]
    size: Canvas,

    /// Plane mesh density, quads per axis.
    #[arg(long)]
    subdivisions: Option<u32>,
}

#[derive(Parser, Debug)]
struct DepthArgs {
    /// Input photo (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path for the displacement map.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Depth(args) => cmd_depth(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let image = load_photo(&args.in_path)?;
    let fps = Fps::new(args.fps, 1)?;

    let defaults = PlayerOpts::default();
    let mut player = Player::new(PlayerOpts {
        canvas: args.size,
        subdivisions: args.subdivisions.unwrap_or(defaults.subdivisions),
        fps,
    });
    apply_settings(&player, args.settings.as_deref())?;
    player.set_image(image)?;
    player.start_capture(&args.out_dir)?;

    let dt = fps.frame_duration_secs();
    let artifact = loop {
        if let Some(artifact) = player.tick(dt) {
            break artifact;
        }
    };

    if let Some(path) = artifact.path.as_ref() {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let image = load_photo(&args.in_path)?;

    let defaults = PlayerOpts::default();
    let mut player = Player::new(PlayerOpts {
        canvas: args.size,
        subdivisions: args.subdivisions.unwrap_or(defaults.subdivisions),
        fps: defaults.fps,
    });
    apply_settings(&player, args.settings.as_deref())?;
    player.set_image(image)?;
    player.tick(args.at);

    let frame = player.frame();
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_depth(args: DepthArgs) -> anyhow::Result<()> {
    let image = load_photo(&args.in_path)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &*image.displacement_png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_photo(path: &Path) -> anyhow::Result<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(prepare(&bytes, &name, &PrepareOpts::default())?)
}

fn apply_settings(player: &Player, path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read settings '{}'", path.display()))?;
    let settings: AnimationSettings = serde_json::from_str(&text)
        .with_context(|| format!("parse settings '{}'", path.display()))?;
    player.settings().replace(settings)?;
    Ok(())
}

fn parse_size(s: &str) -> Result<Canvas, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| "size must look like 1280x720".to_string())?;
    let width: u32 = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let height: u32 = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Canvas::new(width, height).map_err(|e| e.to_string())
}
