use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "brewscroll", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a raw image export into the sequential `frame_{i}` layout.
    Prepare(PrepareArgs),
    /// Render the canvas at one scroll position as a PNG.
    Frame(FrameArgs),
    /// Scroll from top to bottom through the spring and write every distinct frame as a PNG.
    Scrub(ScrubArgs),
}

#[derive(Parser, Debug)]
struct PrepareArgs {
    /// Directory holding the raw export.
    #[arg(long)]
    src: PathBuf,

    /// Output directory for the renamed frames.
    #[arg(long)]
    dest: PathBuf,

    /// File extension to pick up, including the dot.
    #[arg(long, default_value = ".jpg")]
    ext: String,

    /// Substring a file name must contain to be picked up.
    #[arg(long, default_value = "frame")]
    marker: String,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Player config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the frame directory.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Override the frame count.
    #[arg(long)]
    count: Option<u32>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    seq: SequenceArgs,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    seq: SequenceArgs,

    /// Output directory for the PNGs.
    #[arg(long)]
    out_dir: PathBuf,

    /// Simulated ticks per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Upper bound on simulated ticks.
    #[arg(long, default_value_t = 1200)]
    max_ticks: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Prepare(args) => cmd_prepare(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
    }
}

fn cmd_prepare(args: PrepareArgs) -> anyhow::Result<()> {
    let opts = brewscroll::PrepareOpts {
        extension: args.ext,
        marker: args.marker,
        ..brewscroll::PrepareOpts::default()
    };
    let copies = brewscroll::prepare_sequence(&args.src, &args.dest, &opts)?;
    for copy in &copies {
        eprintln!(
            "copied {} -> {}",
            copy.source.display(),
            copy.dest.display()
        );
    }
    eprintln!("prepared {} frames in {}", copies.len(), args.dest.display());
    Ok(())
}

fn load_config(args: &SequenceArgs) -> anyhow::Result<brewscroll::PlayerConfig> {
    let mut cfg = match &args.config {
        Some(path) => brewscroll::PlayerConfig::from_json_path(path)?,
        None => brewscroll::PlayerConfig::default(),
    };
    if let Some(frames) = &args.frames {
        cfg.sequence.base = frames.clone();
    }
    if let Some(count) = args.count {
        cfg.sequence.frame_count = count;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn mount(
    args: &SequenceArgs,
    cfg: &brewscroll::PlayerConfig,
    scroll: &mut brewscroll::ScrollProgress,
) -> anyhow::Result<brewscroll::PlayerController> {
    let mut viewport = brewscroll::Signal::new(brewscroll::Viewport::new(args.width, args.height));
    let source = Arc::new(brewscroll::FsFrameSource::default());
    let mut player = brewscroll::PlayerController::mount(cfg, source, &mut viewport)?;

    let mut last_percent = None;
    player.wait_ready(scroll, |p| {
        let percent = p.percent();
        if last_percent != Some(percent) {
            last_percent = Some(percent);
            eprint!("\rloading {percent}%");
        }
    })?;
    eprintln!();

    if let Some(store) = player.store() {
        let failed = store.failed_indices();
        if !failed.is_empty() {
            eprintln!(
                "warning: {} of {} frames failed to load",
                failed.len(),
                store.len()
            );
        }
    }
    Ok(player)
}

fn write_png(path: &Path, canvas: &brewscroll::Canvas) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let frame = canvas.to_rgba();
    let data = unpremultiply(&frame.data);
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.len());
    for px in premul.chunks_exact(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        for &c in &px[..3] {
            out.push(((u32::from(c) * 255 + a / 2) / a).min(255) as u8);
        }
        out.push(px[3]);
    }
    out
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.seq)?;
    let mut scroll = brewscroll::ScrollProgress::new(cfg.spring);
    scroll.jump_to(args.progress);

    let player = mount(&args.seq, &cfg, &mut scroll)?;
    write_png(&args.out, player.canvas())?;

    let index = player.current_frame().map(|f| f.0).unwrap_or(0);
    eprintln!("wrote {} (frame {index})", args.out.display());
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be >= 1");
    }
    let cfg = load_config(&args.seq)?;
    let mut scroll = brewscroll::ScrollProgress::new(cfg.spring);
    let mut player = mount(&args.seq, &cfg, &mut scroll)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let dt = 1.0 / f64::from(args.fps);
    let mut last = None;
    let mut written = 0u32;
    scroll.set_raw(1.0);
    for _ in 0..args.max_ticks {
        scroll.tick(dt);
        player.pump(&mut scroll)?;

        let current = player.current_frame();
        if current != last {
            last = current;
            let index = current.map(|f| f.0).unwrap_or(0);
            let path = args
                .out_dir
                .join(format!("scrub_{written:04}_frame_{index}.png"));
            write_png(&path, player.canvas())?;
            written += 1;
        }
        if scroll.is_settled() {
            break;
        }
    }

    let stats = player.stats();
    eprintln!(
        "wrote {written} PNGs to {} (drawn={}, skipped={})",
        args.out_dir.display(),
        stats.renders_drawn,
        stats.renders_skipped
    );
    Ok(())
}
