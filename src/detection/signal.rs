use image::RgbImage;
use crate::config::{HsvBand, SignalConfig};
use crate::models::SignalColor;

/// Convert an 8-bit RGB pixel to HSV on the OpenCV scale.
/// Returns [H: 0-180, S: 0-255, V: 0-255].
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    [
        (h / 2.0).round().min(180.0) as u8,
        s.round() as u8,
        max as u8,
    ]
}

/// Pixel counts behind a classification, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorCounts {
    pub red: u32,
    pub yellow: u32,
}

/// Classifies a traffic-light crop by counting red and yellow pixels
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    config: SignalConfig,
}

impl SignalClassifier {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Red and yellow pixel counts for a region
    pub fn count_colors(&self, region: &RgbImage) -> ColorCounts {
        let mut counts = ColorCounts::default();

        for pixel in region.pixels() {
            let hsv = rgb_to_hsv(pixel.0);
            if in_any_band(&self.config.red_bands, hsv) {
                counts.red += 1;
            }
            if in_any_band(&self.config.yellow_bands, hsv) {
                counts.yellow += 1;
            }
        }

        counts
    }

    /// Red is checked before yellow; anything lit but neither is taken as green.
    /// An empty region cannot be judged and yields `Unknown`.
    pub fn classify(&self, region: &RgbImage) -> SignalColor {
        if region.width() == 0 || region.height() == 0 {
            return SignalColor::Unknown;
        }

        let counts = self.count_colors(region);
        if counts.red > self.config.min_pixels {
            SignalColor::Red
        } else if counts.yellow > self.config.min_pixels {
            SignalColor::Yellow
        } else {
            SignalColor::Green
        }
    }
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self::new(SignalConfig::default())
    }
}

fn in_any_band(bands: &[HsvBand], hsv: [u8; 3]) -> bool {
    bands.iter().any(|band| band.contains(hsv))
}
