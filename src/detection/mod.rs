pub mod preprocessing;
pub mod contours;
pub mod signal;
pub mod zone;
pub mod violation;

use image::RgbImage;
use tracing::{debug, warn};
use crate::config::{ClassConfig, EngineConfig};
use crate::models::{DetectedObject, ObjectRender, SignalColor, Violation, ZonePolygon};
use signal::SignalClassifier;
use violation::{EngineState, ViolationTracker};
use zone::{ZoneLocator, ZoneTrace};

/// Everything the engine concluded about one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame_index: u64,
    pub signal: SignalColor,
    pub zone: Option<ZonePolygon>,
    pub objects: Vec<ObjectRender>,
    pub new_violations: Vec<Violation>,
    pub violator_count: usize,
}

/// Main violation detection engine: signal, zone and per-object state per frame
pub struct ViolationEngine {
    classifier: SignalClassifier,
    locator: ZoneLocator,
    tracker: ViolationTracker,
    classes: ClassConfig,
    state: EngineState,
}

impl ViolationEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            classifier: SignalClassifier::new(config.signal.clone()),
            locator: ZoneLocator::new(config.zone.clone()),
            tracker: ViolationTracker::new(config.classes.clone(), config.violation.clone()),
            classes: config.classes.clone(),
            state: EngineState::new(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Run one frame through the engine
    pub fn process_frame(
        &mut self,
        frame_index: u64,
        frame: &RgbImage,
        objects: &[DetectedObject],
    ) -> FrameReport {
        let zone = self.locator.locate(frame);
        self.process_with_zone(frame_index, frame, zone, objects)
    }

    /// Same as `process_frame` but also returns the zone search stages
    pub fn process_frame_traced(
        &mut self,
        frame_index: u64,
        frame: &RgbImage,
        objects: &[DetectedObject],
    ) -> (FrameReport, ZoneTrace) {
        let trace = self.locator.trace(frame);
        let report = self.process_with_zone(frame_index, frame, trace.polygon, objects);
        (report, trace)
    }

    fn process_with_zone(
        &mut self,
        frame_index: u64,
        frame: &RgbImage,
        zone: Option<ZonePolygon>,
        objects: &[DetectedObject],
    ) -> FrameReport {
        self.update_signal(frame_index, frame, objects);

        if zone.is_none() {
            debug!("No crossing zone found in frame {}", frame_index);
        }

        let outcome = self
            .tracker
            .update(zone.as_ref(), frame_index, objects, &mut self.state);

        FrameReport {
            frame_index,
            signal: self.state.signal(),
            zone,
            objects: outcome.objects,
            new_violations: outcome.new_violations,
            violator_count: self.state.violator_count(),
        }
    }

    /// Classify every traffic light in the frame; the last one seen wins
    fn update_signal(&mut self, frame_index: u64, frame: &RgbImage, objects: &[DetectedObject]) {
        for light in objects.iter().filter(|o| self.classes.is_traffic_light(o.class_id)) {
            let (x, y, w, h) = light.bbox.clamped_region(frame.width(), frame.height());
            if w == 0 || h == 0 {
                warn!(
                    "Traffic light {} box {:?} is empty inside the {}x{} frame",
                    light.id,
                    light.bbox,
                    frame.width(),
                    frame.height()
                );
            }

            let region = image::imageops::crop_imm(frame, x, y, w, h).to_image();
            let color = self.classifier.classify(&region);

            if self.state.set_signal(color) {
                debug!("Signal changed to {} at frame {}", color, frame_index);
            }
        }
    }
}

impl Default for ViolationEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
