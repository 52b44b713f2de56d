use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quadwarp", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace a region of a video with a warped image (requires `ffmpeg` and `ffprobe` on PATH).
    Replace(ReplaceArgs),
    /// Run a JSON job file.
    Job(JobArgs),
    /// Render one composited frame as a PNG.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Composite frames in parallel chunks.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per parallel chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

impl RunArgs {
    fn opts(&self) -> quadwarp::PipelineOpts {
        quadwarp::PipelineOpts {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            threads: self.threads,
            ..Default::default()
        }
    }
}

#[derive(Parser, Debug)]
struct ReplaceArgs {
    /// Input video.
    #[arg(long)]
    video: PathBuf,

    /// Overlay image.
    #[arg(long)]
    image: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Quad corners "x,y;x,y;x,y;x,y" (top-left, top-right, bottom-right, bottom-left).
    #[arg(long)]
    points: String,

    /// Time in seconds from which the overlay is shown.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input video.
    #[arg(long)]
    video: PathBuf,

    /// Overlay image.
    #[arg(long)]
    image: PathBuf,

    /// Quad corners "x,y;x,y;x,y;x,y" (top-left, top-right, bottom-right, bottom-left).
    #[arg(long)]
    points: String,

    /// Time in seconds from which the overlay is shown.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Replace(args) => cmd_replace(args),
        Command::Job(args) => cmd_job(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_logging(verbose: u8) {
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

fn parse_points(s: &str) -> anyhow::Result<Vec<[f64; 2]>> {
    s.split(';')
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .with_context(|| format!("point '{pair}' is not 'x,y'"))?;
            let x: f64 = x.trim().parse().with_context(|| format!("bad x in '{pair}'"))?;
            let y: f64 = y.trim().parse().with_context(|| format!("bad y in '{pair}'"))?;
            Ok([x, y])
        })
        .collect()
}

fn region_entry(points: &str, start: f64) -> anyhow::Result<quadwarp::RegionEntry> {
    Ok(quadwarp::RegionEntry {
        time_sec: start,
        points: parse_points(points).context("parse --points")?,
    })
}

fn cmd_replace(args: ReplaceArgs) -> anyhow::Result<()> {
    let job = quadwarp::ReplaceJob {
        video: args.video,
        image: args.image,
        output: args.out,
        regions: vec![region_entry(&args.points, args.start)?],
    };
    run_job(&job, &args.run.opts())
}

fn cmd_job(args: JobArgs) -> anyhow::Result<()> {
    let mut job = quadwarp::ReplaceJob::from_path(&args.in_path)?;
    let base = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    for p in [&mut job.video, &mut job.image, &mut job.output] {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    }
    run_job(&job, &args.run.opts())
}

fn run_job(job: &quadwarp::ReplaceJob, opts: &quadwarp::PipelineOpts) -> anyhow::Result<()> {
    let report = quadwarp::replace_region(job, opts)?;
    eprintln!(
        "wrote {} ({} frames, {:.2}s, {}x{} @ {} fps, overlay from frame {})",
        report.output_path.display(),
        report.stats.frames_written,
        report.duration_secs,
        report.width,
        report.height,
        report.fps,
        report.stats.start_frame.0
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let region = region_entry(&args.points, args.start)?.to_region()?;
    let frame = quadwarp::preview_frame(
        &args.video,
        &args.image,
        &region,
        quadwarp::FrameIndex(args.frame),
    )?;

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
