use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crosswatch::{
    AnnotatedFrameWriter, EngineConfig, FramePipeline, ImageSequence, LogSink, ReplayTracker,
    ViolationReport,
};

#[derive(Parser)]
#[command(name = "crosswatch")]
#[command(about = "Flag vehicles that enter a pedestrian crossing on a red light")]
struct Cli {
    /// Directory of video frames, processed in file-name order
    #[arg(value_name = "FRAMES_DIR")]
    frames_dir: PathBuf,

    /// Tracker output as JSON Lines, one record per frame
    #[arg(value_name = "DETECTIONS")]
    detections: PathBuf,

    /// TOML file with detection thresholds
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write annotated frames to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    annotate_out: Option<PathBuf>,

    /// Save zone search masks to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(format!("crosswatch={}", level))?)
        .init();

    let mut source = ImageSequence::open(&args.frames_dir)?;
    let mut tracker = ReplayTracker::load(&args.detections)?;

    let mut pipeline = FramePipeline::new(&config)
        .with_max_frames(args.max_frames)
        .with_sink(Box::new(LogSink));

    if let Some(dir) = args.annotate_out {
        pipeline = pipeline.with_sink(Box::new(AnnotatedFrameWriter::new(dir)?));
    }

    if let Some(dir) = args.debug_out {
        pipeline = pipeline.with_debug(dir)?;
    }

    let summary = pipeline.run(&mut source, &mut tracker)?;

    println!("\n=== Red-Light Crossing Results ===");
    println!("Frames processed: {}", summary.frames_processed);
    println!("Final signal: {}", summary.final_signal);
    println!("Total violators: {}", summary.violators.len());

    if !summary.violations.is_empty() {
        println!("\nViolations:");
        for violation in &summary.violations {
            println!(
                "  Vehicle {} (class {}) entered on red at frame {}",
                violation.id, violation.class_id, violation.frame_index
            );
        }
    }

    if let Some(path) = args.report {
        ViolationReport::from_summary(&summary)?.write(&path)?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}
