use imageproc::geometry::contour_area;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identity assigned by the external tracker, stable while tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned box in frame coordinates, (x1, y1) top-left, (x2, y2) bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Bottom-centre of the box, where the vehicle meets the road plane
    pub fn ground_point(&self) -> (i32, i32) {
        let mid = (self.x1 as i64 + self.x2 as i64).div_euclid(2);
        (mid as i32, self.y2)
    }

    /// Clamp to a `width` x `height` frame and return (x, y, w, h) for cropping.
    /// Degenerate or fully out-of-frame boxes give a zero-sized region.
    pub fn clamped_region(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let clamp_x = |v: i32| v.clamp(0, width as i32) as u32;
        let clamp_y = |v: i32| v.clamp(0, height as i32) as u32;

        let x1 = clamp_x(self.x1);
        let y1 = clamp_y(self.y1);
        let x2 = clamp_x(self.x2);
        let y2 = clamp_y(self.y2);

        (x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }
}

/// One record of detector/tracker output for a single frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub id: TrackId,
    #[serde(rename = "class")]
    pub class_id: u32,
    #[serde(rename = "box", with = "bbox_array")]
    pub bbox: BoundingBox,
}

impl DetectedObject {
    pub fn new(id: u32, class_id: u32, bbox: BoundingBox) -> Self {
        Self {
            id: TrackId(id),
            class_id,
            bbox,
        }
    }
}

/// Boxes travel as `[x1, y1, x2, y2]`, the layout trackers usually emit
mod bbox_array {
    use super::BoundingBox;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bbox: &BoundingBox, s: S) -> Result<S::Ok, S::Error> {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BoundingBox, D::Error> {
        let [x1, y1, x2, y2] = <[i32; 4]>::deserialize(d)?;
        Ok(BoundingBox { x1, y1, x2, y2 })
    }
}

/// Engine belief about the traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalColor {
    Red,
    Yellow,
    #[default]
    Green,
    Unknown,
}

impl SignalColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalColor::Red => "RED",
            SignalColor::Yellow => "YELLOW",
            SignalColor::Green => "GREEN",
            SignalColor::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External contour of a foreground region, as an ordered loop of border pixels
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    /// Enclosed area. Thin one-pixel runs enclose nothing.
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }
}

/// Crossing zone for one frame: the 4 corners of a rotated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZonePolygon {
    pub corners: [(i32, i32); 4],
}

impl ZonePolygon {
    pub fn new(corners: [(i32, i32); 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle helper, corners in clockwise order
    pub fn from_rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            corners: [(x1, y1), (x2, y1), (x2, y2), (x1, y2)],
        }
    }

    /// Point-in-polygon test where points on an edge or corner count as inside
    pub fn contains(&self, point: (i32, i32)) -> bool {
        let (px, py) = (point.0 as i64, point.1 as i64);
        let n = self.corners.len();

        for i in 0..n {
            let (ax, ay) = self.corners[i];
            let (bx, by) = self.corners[(i + 1) % n];
            if on_segment((ax as i64, ay as i64), (bx as i64, by as i64), (px, py)) {
                return true;
            }
        }

        // Crossing-number test on the half-open edges
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.corners[i].0 as f64, self.corners[i].1 as f64);
            let (xj, yj) = (self.corners[j].0 as f64, self.corners[j].1 as f64);
            let (pxf, pyf) = (px as f64, py as f64);

            if (yi > pyf) != (yj > pyf) {
                let x_cross = (xj - xi) * (pyf - yi) / (yj - yi) + xi;
                if pxf < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }

    /// Smallest y coordinate among the corners
    pub fn top(&self) -> i32 {
        self.corners.iter().map(|c| c.1).min().unwrap_or(0)
    }

    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let xs = self.corners.iter().map(|c| c.0);
        let ys = self.corners.iter().map(|c| c.1);
        (
            xs.clone().min().unwrap_or(0),
            ys.clone().min().unwrap_or(0),
            xs.max().unwrap_or(0),
            ys.max().unwrap_or(0),
        )
    }
}

fn on_segment(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross != 0 {
        return false;
    }
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

/// Whether an object is drawn as a caught violator or just a tracked vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    Caught,
    Tracked,
}

/// Per-object render state derived after the tracker update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRender {
    pub id: TrackId,
    pub class_id: u32,
    pub bbox: BoundingBox,
    pub status: RenderStatus,
}

impl ObjectRender {
    pub fn is_caught(&self) -> bool {
        self.status == RenderStatus::Caught
    }
}

/// A vehicle that entered the crossing zone while the signal was red
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub id: TrackId,
    pub class_id: u32,
    pub frame_index: u64,
    pub bbox: BoundingBox,
}
