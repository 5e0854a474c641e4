use anyhow::{Context, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::info;
use crate::models::DetectedObject;

/// Detector plus tracker: boxes with class labels and identities that persist
/// across frames while the same physical object stays in view.
///
/// Implement this to connect a live model. Identities may vanish or come back
/// under a new id after occlusion; the engine tolerates both.
pub trait ObjectTracker {
    fn track(&mut self, frame_index: u64, frame: &RgbImage) -> Result<Vec<DetectedObject>>;
}

/// Tracker output for one frame, one JSON object per line in a replay file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDetections {
    pub frame: u64,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

/// Replays tracker output recorded ahead of time.
/// Frames without a record have no detections.
#[derive(Debug, Default)]
pub struct ReplayTracker {
    frames: HashMap<u64, Vec<DetectedObject>>,
}

impl ReplayTracker {
    /// Load a JSON Lines file. Blank lines are skipped; repeated frame numbers
    /// have their objects appended in file order.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open detections file {}", path.display()))?;
        let reader = std::io::BufReader::new(file);

        let mut records = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: FrameDetections = serde_json::from_str(&line).with_context(|| {
                format!("Invalid detections record at {}:{}", path.display(), line_no + 1)
            })?;
            records.push(record);
        }

        let tracker = Self::from_records(records);
        info!(
            "Loaded detections for {} frames from {}",
            tracker.frames.len(),
            path.display()
        );
        Ok(tracker)
    }

    pub fn from_records(records: Vec<FrameDetections>) -> Self {
        let mut frames: HashMap<u64, Vec<DetectedObject>> = HashMap::new();
        for record in records {
            frames.entry(record.frame).or_default().extend(record.objects);
        }
        Self { frames }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl ObjectTracker for ReplayTracker {
    fn track(&mut self, frame_index: u64, _frame: &RgbImage) -> Result<Vec<DetectedObject>> {
        Ok(self.frames.remove(&frame_index).unwrap_or_default())
    }
}
