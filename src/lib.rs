pub mod config;
pub mod detection;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod source;
pub mod tracker;

pub use config::{ConfigError, EngineConfig};
pub use detection::{FrameReport, ViolationEngine};
pub use detection::signal::SignalClassifier;
pub use detection::violation::{EngineState, ViolationTracker, ZoneOccupancy, ZoneTransition};
pub use detection::zone::ZoneLocator;
pub use models::{
    BoundingBox, DetectedObject, ObjectRender, RenderStatus, SignalColor, TrackId, Violation,
    ZonePolygon,
};
pub use pipeline::{FramePipeline, RunSummary};
pub use render::{AnnotatedFrameWriter, LogSink, RenderSink};
pub use report::ViolationReport;
pub use source::{FrameSource, ImageSequence, InMemoryFrames};
pub use tracker::{FrameDetections, ObjectTracker, ReplayTracker};
