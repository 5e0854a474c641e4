use anyhow::Result;
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use crate::config::EngineConfig;
use crate::detection::zone::ZoneTrace;
use crate::detection::ViolationEngine;
use crate::models::{SignalColor, TrackId, Violation};
use crate::render::RenderSink;
use crate::source::FrameSource;
use crate::tracker::ObjectTracker;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub final_signal: SignalColor,
    pub violations: Vec<Violation>,
    pub violators: Vec<TrackId>,
}

/// Frame-synchronous driver: pulls a frame, asks the tracker for objects, runs
/// the engine, then hands the report to every sink before the next frame.
pub struct FramePipeline {
    engine: ViolationEngine,
    sinks: Vec<Box<dyn RenderSink>>,
    debug: Option<DebugConfig>,
    max_frames: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl FramePipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            engine: ViolationEngine::new(config),
            sinks: Vec::new(),
            debug: None,
            max_frames: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add an output sink
    pub fn with_sink(mut self, sink: Box<dyn RenderSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Save the zone search masks of every frame under `output_dir`.
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        prepare_output_dir(&output_dir)?;

        self.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    /// Stop after this many frames even if the source has more
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Flag checked between frames; setting it ends the run after the current frame
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        tracker: &mut dyn ObjectTracker,
    ) -> Result<RunSummary> {
        let mut frame_index: u64 = 0;
        let mut violations = Vec::new();

        loop {
            if self.stop.load(Ordering::Relaxed) {
                info!("Stop requested after {} frames", frame_index);
                break;
            }
            if self.max_frames.is_some_and(|max| frame_index >= max) {
                info!("Reached frame limit of {}", frame_index);
                break;
            }

            let Some(frame) = source.next_frame()? else {
                debug!("Frame source exhausted after {} frames", frame_index);
                break;
            };

            let objects = tracker.track(frame_index, &frame)?;

            let report = if self.debug.is_some() {
                let (report, trace) = self.engine.process_frame_traced(frame_index, &frame, &objects);
                self.save_debug_trace(frame_index, &trace)?;
                report
            } else {
                self.engine.process_frame(frame_index, &frame, &objects)
            };

            for sink in self.sinks.iter_mut() {
                sink.render(&frame, &report)?;
            }

            violations.extend(report.new_violations);
            frame_index += 1;
        }

        let state = self.engine.state();
        info!(
            "Processed {} frames, {} violators",
            frame_index,
            state.violator_count()
        );

        Ok(RunSummary {
            frames_processed: frame_index,
            final_signal: state.signal(),
            violations,
            violators: state.violators().iter().copied().collect(),
        })
    }

    fn save_debug_trace(&self, frame_index: u64, trace: &ZoneTrace) -> Result<()> {
        let Some(debug_config) = self.debug.as_ref() else {
            return Ok(());
        };

        let frame_dir = debug_config.output_dir.join(format!("{:06}", frame_index));
        std::fs::create_dir_all(&frame_dir)?;

        let stages: [(&str, &GrayImage); 4] = [
            ("01_grayscale", &trace.gray),
            ("02_threshold", &trace.binary),
            ("03_closing", &trace.closed),
            ("04_search_region", &trace.region),
        ];

        for (name, img) in stages {
            if img.width() == 0 || img.height() == 0 {
                continue;
            }
            let path = frame_dir.join(format!("{}.png", name));
            img.save(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        }

        debug!(
            "Debug: saved zone stages for frame {} (best area {:?})",
            frame_index, trace.best_area
        );

        Ok(())
    }
}

/// Create `dir` if missing; refuse to write into a directory that has files
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        let entries = std::fs::read_dir(dir)?;
        if entries.count() > 0 {
            return Err(anyhow::anyhow!(
                "Output directory is not empty: {}",
                dir.display()
            ));
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
