use image::{GrayImage, RgbImage};
use imageproc::geometry::min_area_rect;
use tracing::debug;
use crate::config::ZoneConfig;
use crate::detection::{contours, preprocessing};
use crate::models::ZonePolygon;

/// Intermediate masks from one zone search, for debug output
pub struct ZoneTrace {
    pub gray: GrayImage,
    pub binary: GrayImage,
    pub closed: GrayImage,
    pub region: GrayImage,
    /// Row where `region` starts in the full frame
    pub region_offset: u32,
    /// Area of the largest external contour in the region, if there was one
    pub best_area: Option<f64>,
    pub polygon: Option<ZonePolygon>,
}

/// Finds the pedestrian crossing as the largest bright, stripe-merged blob in
/// the lower part of the frame. Stateless: every frame is searched from scratch.
#[derive(Debug, Clone)]
pub struct ZoneLocator {
    config: ZoneConfig,
}

impl ZoneLocator {
    pub fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    pub fn locate(&self, frame: &RgbImage) -> Option<ZonePolygon> {
        self.trace(frame).polygon
    }

    /// Run the full search and keep every intermediate stage
    pub fn trace(&self, frame: &RgbImage) -> ZoneTrace {
        let gray = preprocessing::to_grayscale(frame);
        let binary = preprocessing::binarize(&gray, self.config.binary_threshold);
        let closed = preprocessing::close_rect(
            &binary,
            self.config.kernel_width,
            self.config.kernel_height,
        );
        let (region, region_offset) = preprocessing::lower_region(&closed, self.config.roi_start);

        let best = contours::largest_contour(contours::find_external_contours(&region));
        let best_area = best.as_ref().map(|c| c.area());

        let polygon = match best {
            Some(contour) if contour.area() > self.config.min_area => {
                let rect = min_area_rect(&contour.points);
                let offset = region_offset as i32;
                Some(ZonePolygon::new([
                    (rect[0].x, rect[0].y + offset),
                    (rect[1].x, rect[1].y + offset),
                    (rect[2].x, rect[2].y + offset),
                    (rect[3].x, rect[3].y + offset),
                ]))
            }
            Some(contour) => {
                debug!(
                    "Largest crossing candidate too small: area={:.0} (min {:.0})",
                    contour.area(),
                    self.config.min_area
                );
                None
            }
            None => None,
        };

        ZoneTrace {
            gray,
            binary,
            closed,
            region,
            region_offset,
            best_area,
            polygon,
        }
    }
}

impl Default for ZoneLocator {
    fn default() -> Self {
        Self::new(ZoneConfig::default())
    }
}
