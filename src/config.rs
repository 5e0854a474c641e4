use serde::Deserialize;
use std::path::Path;

/// Tunable thresholds for the whole engine. Every field has a default, so an
/// empty TOML file yields the reference configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub zone: ZoneConfig,
    #[serde(default)]
    pub classes: ClassConfig,
    #[serde(default)]
    pub violation: ViolationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inclusive HSV box on the OpenCV scale (H 0-180, S and V 0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HsvBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBand {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// A color wins only with strictly more matching pixels than this
    #[serde(default = "default_min_pixels")]
    pub min_pixels: u32,
    /// Red wraps the hue origin, so it is a union of bands
    #[serde(default = "default_red_bands")]
    pub red_bands: Vec<HsvBand>,
    #[serde(default = "default_yellow_bands")]
    pub yellow_bands: Vec<HsvBand>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_pixels: default_min_pixels(),
            red_bands: default_red_bands(),
            yellow_bands: default_yellow_bands(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    /// Gray levels strictly above this become foreground
    #[serde(default = "default_binary_threshold")]
    pub binary_threshold: u8,
    /// Closing kernel, wide and short to bridge gaps between stripes
    #[serde(default = "default_kernel_width")]
    pub kernel_width: u32,
    #[serde(default = "default_kernel_height")]
    pub kernel_height: u32,
    /// Fraction of frame height where the search region starts
    #[serde(default = "default_roi_start")]
    pub roi_start: f32,
    #[serde(default = "default_min_area")]
    pub min_area: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            binary_threshold: default_binary_threshold(),
            kernel_width: default_kernel_width(),
            kernel_height: default_kernel_height(),
            roi_start: default_roi_start(),
            min_area: default_min_area(),
        }
    }
}

/// Class ids in the tracker's taxonomy (COCO by default)
#[derive(Debug, Clone, Deserialize)]
pub struct ClassConfig {
    #[serde(default = "default_traffic_light_classes")]
    pub traffic_light: Vec<u32>,
    #[serde(default = "default_vehicle_classes")]
    pub vehicles: Vec<u32>,
}

impl ClassConfig {
    pub fn is_traffic_light(&self, class_id: u32) -> bool {
        self.traffic_light.contains(&class_id)
    }

    pub fn is_vehicle(&self, class_id: u32) -> bool {
        self.vehicles.contains(&class_id)
    }
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            traffic_light: default_traffic_light_classes(),
            vehicles: default_vehicle_classes(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViolationConfig {
    /// Drop entry state for ids the tracker has not reported for this many
    /// frames. `None` keeps entries until the object is seen outside the zone.
    #[serde(default)]
    pub stale_after_frames: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zone = &self.zone;
        if zone.kernel_width == 0 || zone.kernel_height == 0 {
            return Err(ConfigError::Invalid("zone kernel must be at least 1x1".into()));
        }
        if zone.kernel_width > 511 || zone.kernel_height > 511 {
            return Err(ConfigError::Invalid("zone kernel must fit in 511x511".into()));
        }
        if !(0.0..1.0).contains(&zone.roi_start) {
            return Err(ConfigError::Invalid(format!(
                "zone.roi_start must be in [0, 1), got {}",
                zone.roi_start
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// Default value functions
fn default_min_pixels() -> u32 {
    30
}
fn default_red_bands() -> Vec<HsvBand> {
    vec![
        HsvBand::new([0, 120, 70], [10, 255, 255]),
        HsvBand::new([160, 120, 70], [180, 255, 255]),
    ]
}
fn default_yellow_bands() -> Vec<HsvBand> {
    vec![HsvBand::new([15, 100, 100], [35, 255, 255])]
}
fn default_binary_threshold() -> u8 {
    150
}
fn default_kernel_width() -> u32 {
    80
}
fn default_kernel_height() -> u32 {
    20
}
fn default_roi_start() -> f32 {
    0.5
}
fn default_min_area() -> f64 {
    1000.0
}
fn default_traffic_light_classes() -> Vec<u32> {
    vec![9]
}
fn default_vehicle_classes() -> Vec<u32> {
    // car, motorcycle, bus, truck
    vec![2, 3, 5, 7]
}
fn default_log_level() -> String {
    "info".into()
}
