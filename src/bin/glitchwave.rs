use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use glitchwave::{
    FfmpegSink, FfmpegSinkOpts, FrameIndex, PngSequenceSink, RenderSession, RenderSessionOpts,
    Scene,
};

#[derive(Parser, Debug)]
#[command(name = "glitchwave", version)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render every frame as a numbered PNG.
    Pngs(PngsArgs),
    /// Print the draw calls of one frame as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Font file for glyphs; block glyphs are drawn without one.
    #[arg(long)]
    font: Option<PathBuf>,
}

impl SceneArgs {
    fn open(&self) -> anyhow::Result<(Scene, RenderSession)> {
        let scene = Scene::from_path(&self.in_path)
            .with_context(|| format!("load scene '{}'", self.in_path.display()))?;
        let opts = RenderSessionOpts {
            font_path: self.font.clone(),
            ..RenderSessionOpts::default()
        };
        let sess = RenderSession::new(&scene, opts)?;
        Ok((scene, sess))
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct PngsArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory for `frame_00000.png`...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Pngs(args) => cmd_pngs(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (_, mut sess) = args.scene.open()?;
    let frame = sess.render_frame(FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    glitchwave::encode::png::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (scene, mut sess) = args.scene.open()?;
    if scene.has_resize_events() {
        anyhow::bail!("mp4 output needs a fixed frame size; use `pngs` for scenes with resize events");
    }

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        overwrite: args.overwrite,
        ..FfmpegSinkOpts::new(args.out.clone())
    });
    let stats = sess.render_range(scene.frame_range(), &mut sink)?;

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_rendered
    );
    Ok(())
}

fn cmd_pngs(args: PngsArgs) -> anyhow::Result<()> {
    let (scene, mut sess) = args.scene.open()?;
    let mut sink = PngSequenceSink::new(&args.out_dir);
    let stats = sess.render_range(scene.frame_range(), &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (_, sess) = args.scene.open()?;
    let summary = sess.inspect_frame(FrameIndex(args.frame))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
