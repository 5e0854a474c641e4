#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from crosswatch for tests
pub use crosswatch::{
    BoundingBox, DetectedObject, EngineConfig, EngineState, RenderStatus, SignalColor, TrackId,
    ViolationTracker, ZonePolygon,
};
