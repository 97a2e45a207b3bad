use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "epicycle", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene to an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a scene to a numbered PNG sequence.
    Frames(FramesArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print or save the Fourier components of a path.
    Decompose(DecomposeArgs),
    /// Write the arc-length-uniform sample of a path as an SVG polyline.
    Sample(SampleArgs),
    /// Render the built-in three-needle scene to an MP4 video.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Pace frames at the scene's fps instead of rendering as fast as possible.
    #[arg(long)]
    realtime: bool,

    /// Ignore the scene's frame count and run until Ctrl-C.
    #[arg(long)]
    until_interrupt: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Ignore the scene's frame count and run until Ctrl-C.
    #[arg(long)]
    until_interrupt: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the frame geometry as JSON.
    #[arg(long)]
    dump_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SampleOpts {
    /// Path description: an SVG document or a file of SVG path data.
    #[arg(long)]
    path: PathBuf,

    /// Number of samples along the path.
    #[arg(long, default_value_t = 1000)]
    points: usize,

    /// Target window width.
    #[arg(long, default_value_t = 700.0)]
    width: f64,

    /// Target window height.
    #[arg(long, default_value_t = 500.0)]
    height: f64,
}

#[derive(Parser, Debug)]
struct DecomposeArgs {
    #[command(flatten)]
    sample: SampleOpts,

    /// Keep only the largest N components.
    #[arg(long)]
    max: Option<usize>,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    #[command(flatten)]
    sample: SampleOpts,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Decompose(args) => cmd_decompose(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn scene_dir(in_path: &Path) -> &Path {
    in_path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_scene(in_path: &Path) -> anyhow::Result<epicycle::Scene> {
    let cfg = epicycle::SceneConfig::from_json_file(in_path)
        .with_context(|| format!("load scene '{}'", in_path.display()))?;
    let scene = cfg
        .build(scene_dir(in_path))
        .with_context(|| format!("build scene '{}'", in_path.display()))?;
    Ok(scene)
}

/// Flag set by the first Ctrl-C. The run loop sees it at the next frame
/// boundary and finishes the output; a second Ctrl-C exits immediately.
fn interrupt_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::Relaxed) {
            std::process::exit(130);
        }
        eprintln!("interrupted, finishing output (Ctrl-C again to abort)");
    })
    .context("install Ctrl-C handler")?;
    Ok(flag)
}

fn scene_run_options(
    scene: &epicycle::Scene,
    pacing: epicycle::Pacing,
    until_interrupt: bool,
) -> epicycle::RunOptions {
    epicycle::RunOptions {
        dt: scene.dt,
        frames: (!until_interrupt).then_some(scene.frames),
        pacing,
    }
}

fn render_mp4(
    mut scene: epicycle::Scene,
    out: &Path,
    opts: &epicycle::RunOptions,
) -> anyhow::Result<()> {
    let cancel = interrupt_flag()?;
    let mut sink = epicycle::Mp4Sink::new(out, scene.viewport, scene.fps, scene.style)?;
    let stats = epicycle::run(&mut scene.animator, &mut sink, opts, &cancel)?;

    eprintln!("wrote {} ({} frames)", out.display(), stats.frames);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    let pacing = if args.realtime {
        epicycle::Pacing::Realtime(scene.fps)
    } else {
        epicycle::Pacing::Unpaced
    };
    let opts = scene_run_options(&scene, pacing, args.until_interrupt);
    render_mp4(scene, &args.out, &opts)
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    let opts = scene_run_options(&scene, epicycle::Pacing::Unpaced, args.until_interrupt);
    let cancel = interrupt_flag()?;
    let mut sink = epicycle::PngSequenceSink::new(&args.out_dir, scene.viewport, scene.style);
    epicycle::run(&mut scene.animator, &mut sink, &opts, &cancel)?;

    eprintln!("wrote {} frames to {}", sink.written(), args.out_dir.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    if args.frame >= scene.frames {
        anyhow::bail!(
            "frame {} is out of range (scene has {} frames)",
            args.frame,
            scene.frames
        );
    }

    epicycle::advance_to(&mut scene.animator, epicycle::FrameIndex(args.frame), scene.dt);
    let frame = scene.animator.render();

    if let Some(json_path) = &args.dump_json {
        epicycle::ensure_parent_dir(json_path)?;
        let f = std::fs::File::create(json_path)
            .with_context(|| format!("create '{}'", json_path.display()))?;
        serde_json::to_writer_pretty(f, &frame).with_context(|| "write frame JSON")?;
        eprintln!("wrote {}", json_path.display());
    }

    let rgba = epicycle::rasterize_frame(&frame, scene.viewport, &scene.style)?;
    epicycle::write_png(&args.out, &rgba, scene.style.background)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn sample_path(opts: &SampleOpts) -> anyhow::Result<epicycle::PathSample> {
    let path = epicycle::load_path(&opts.path)
        .with_context(|| format!("load path '{}'", opts.path.display()))?;
    let sample = epicycle::sample(&path, opts.points, opts.width, opts.height)?;
    Ok(sample)
}

fn cmd_decompose(args: DecomposeArgs) -> anyhow::Result<()> {
    let sample = sample_path(&args.sample)?;
    let mut components = epicycle::decompose(&sample);
    if let Some(max) = args.max {
        components = epicycle::truncate_components(components, max);
    }

    let json = serde_json::to_string_pretty(&components).with_context(|| "encode components")?;
    match &args.out {
        Some(out) => {
            epicycle::ensure_parent_dir(out)?;
            std::fs::write(out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {} ({} components)", out.display(), components.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let sample = sample_path(&args.sample)?;
    let viewport = epicycle::Viewport::new(
        args.sample.width.ceil() as u32,
        args.sample.height.ceil() as u32,
    )?;
    epicycle::write_path_svg(&args.out, &sample.to_bez_path(), viewport)?;

    eprintln!("wrote {} ({} points)", args.out.display(), sample.len());
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let scene = epicycle::SceneConfig::demo().build(Path::new("."))?;
    let opts = scene_run_options(&scene, epicycle::Pacing::Unpaced, false);
    render_mp4(scene, &args.out, &opts)
}
