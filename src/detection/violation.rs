use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};
use crate::config::{ClassConfig, ViolationConfig};
use crate::models::{
    DetectedObject, ObjectRender, RenderStatus, SignalColor, TrackId, Violation, ZonePolygon,
};

/// Where an object stands relative to the crossing zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneOccupancy {
    Outside,
    Inside,
}

/// Edge between two consecutive occupancy observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTransition {
    Entered,
    Remained,
    Left,
    StayedOutside,
}

impl ZoneOccupancy {
    /// Advance with this frame's containment result
    pub fn step(self, inside: bool) -> (ZoneOccupancy, ZoneTransition) {
        match (self, inside) {
            (ZoneOccupancy::Outside, true) => (ZoneOccupancy::Inside, ZoneTransition::Entered),
            (ZoneOccupancy::Inside, true) => (ZoneOccupancy::Inside, ZoneTransition::Remained),
            (ZoneOccupancy::Inside, false) => (ZoneOccupancy::Outside, ZoneTransition::Left),
            (ZoneOccupancy::Outside, false) => {
                (ZoneOccupancy::Outside, ZoneTransition::StayedOutside)
            }
        }
    }
}

/// Bookkeeping for an object currently inside the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneEntry {
    pub entered_at: u64,
    pub last_seen: u64,
}

/// Everything the engine remembers between frames
#[derive(Debug, Clone)]
pub struct EngineState {
    signal: SignalColor,
    entries: HashMap<TrackId, ZoneEntry>,
    violators: BTreeSet<TrackId>,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            signal: SignalColor::Green,
            entries: HashMap::new(),
            violators: BTreeSet::new(),
        }
    }

    pub fn signal(&self) -> SignalColor {
        self.signal
    }

    /// Overwrite the signal belief. Returns true when it changed.
    pub fn set_signal(&mut self, signal: SignalColor) -> bool {
        let changed = self.signal != signal;
        self.signal = signal;
        changed
    }

    pub fn occupancy(&self, id: TrackId) -> ZoneOccupancy {
        if self.entries.contains_key(&id) {
            ZoneOccupancy::Inside
        } else {
            ZoneOccupancy::Outside
        }
    }

    pub fn entry(&self, id: TrackId) -> Option<&ZoneEntry> {
        self.entries.get(&id)
    }

    pub fn entries(&self) -> &HashMap<TrackId, ZoneEntry> {
        &self.entries
    }

    pub fn violators(&self) -> &BTreeSet<TrackId> {
        &self.violators
    }

    pub fn is_violator(&self, id: TrackId) -> bool {
        self.violators.contains(&id)
    }

    pub fn violator_count(&self) -> usize {
        self.violators.len()
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one tracker update
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub objects: Vec<ObjectRender>,
    pub new_violations: Vec<Violation>,
    pub evicted: Vec<TrackId>,
}

/// Turns per-frame zone containment into entry events and flags entries made on red
#[derive(Debug, Clone)]
pub struct ViolationTracker {
    classes: ClassConfig,
    config: ViolationConfig,
}

impl ViolationTracker {
    pub fn new(classes: ClassConfig, config: ViolationConfig) -> Self {
        Self { classes, config }
    }

    pub fn update(
        &self,
        zone: Option<&ZonePolygon>,
        frame_index: u64,
        objects: &[DetectedObject],
        state: &mut EngineState,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        for object in objects.iter().filter(|o| self.classes.is_vehicle(o.class_id)) {
            if let Some(entry) = state.entries.get_mut(&object.id) {
                entry.last_seen = frame_index;
            }

            // No zone this frame means containment is unknown, not "outside"
            if let Some(zone) = zone {
                let inside = zone.contains(object.bbox.ground_point());
                let (_, transition) = state.occupancy(object.id).step(inside);
                self.apply(transition, object, frame_index, state, &mut outcome);
            }

            let status = if state.is_violator(object.id) {
                RenderStatus::Caught
            } else {
                RenderStatus::Tracked
            };
            outcome.objects.push(ObjectRender {
                id: object.id,
                class_id: object.class_id,
                bbox: object.bbox,
                status,
            });
        }

        if let Some(max_age) = self.config.stale_after_frames {
            outcome.evicted = evict_stale(state, frame_index, max_age);
        }

        outcome
    }

    fn apply(
        &self,
        transition: ZoneTransition,
        object: &DetectedObject,
        frame_index: u64,
        state: &mut EngineState,
        outcome: &mut FrameOutcome,
    ) {
        match transition {
            ZoneTransition::Entered => {
                state.entries.insert(
                    object.id,
                    ZoneEntry {
                        entered_at: frame_index,
                        last_seen: frame_index,
                    },
                );

                if state.signal == SignalColor::Red && state.violators.insert(object.id) {
                    info!(
                        "Vehicle {} entered the crossing on red at frame {}",
                        object.id, frame_index
                    );
                    outcome.new_violations.push(Violation {
                        id: object.id,
                        class_id: object.class_id,
                        frame_index,
                        bbox: object.bbox,
                    });
                } else {
                    debug!(
                        "Vehicle {} entered the crossing on {} at frame {}",
                        object.id, state.signal, frame_index
                    );
                }
            }
            ZoneTransition::Left => {
                state.entries.remove(&object.id);
                debug!("Vehicle {} left the crossing at frame {}", object.id, frame_index);
            }
            ZoneTransition::Remained | ZoneTransition::StayedOutside => {}
        }
    }
}

impl Default for ViolationTracker {
    fn default() -> Self {
        Self::new(ClassConfig::default(), ViolationConfig::default())
    }
}

fn evict_stale(state: &mut EngineState, frame_index: u64, max_age: u64) -> Vec<TrackId> {
    let stale: Vec<TrackId> = state
        .entries
        .iter()
        .filter(|(_, entry)| frame_index.saturating_sub(entry.last_seen) > max_age)
        .map(|(id, _)| *id)
        .collect();

    for id in &stale {
        state.entries.remove(id);
        debug!("Dropped stale crossing entry for vehicle {} at frame {}", id, frame_index);
    }

    stale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_transitions() {
        use ZoneOccupancy::*;
        use ZoneTransition::*;

        assert_eq!(Outside.step(true), (Inside, Entered));
        assert_eq!(Inside.step(true), (Inside, Remained));
        assert_eq!(Inside.step(false), (Outside, Left));
        assert_eq!(Outside.step(false), (Outside, StayedOutside));
    }

    #[test]
    fn fresh_state_starts_green_and_empty() {
        let state = EngineState::new();
        assert_eq!(state.signal(), SignalColor::Green);
        assert!(state.entries().is_empty());
        assert_eq!(state.violator_count(), 0);
    }
}
