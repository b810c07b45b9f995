// THEORY:
// `LocatorConfig` collects every tunable of the locator in one place. The defaults
// are the values the robot runs with: a 720x720 window cut out of the middle of a
// 1280x720 frame, and an orange target whose hue range wraps around red. A TOML
// file only needs to name the fields it changes.

use std::fmt;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::core_modules::color_range::HsvRange;
use crate::core_modules::color_target::{ColorTarget, DEFAULT_MIN_AREA};
use crate::core_modules::optical_frame::{DEFAULT_SENSOR_SIZE, OpticalFrame};
use crate::error::{LocatorError, LocatorResult};

/// Half-open pixel window `[x_min, x_max) x [y_min, y_max)` cut from each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CropWindow {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl Default for CropWindow {
    fn default() -> Self {
        Self {
            x_min: 280,
            x_max: 1000,
            y_min: 0,
            y_max: 720,
        }
    }
}

impl fmt::Display for CropWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x {}..{}, y {}..{}",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

impl CropWindow {
    /// Clamps the window to a frame like array slicing does. Returns
    /// `(x, y, width, height)`, or `None` if nothing of the window is left.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x_min = self.x_min.min(frame_width);
        let x_max = self.x_max.min(frame_width);
        let y_min = self.y_min.min(frame_height);
        let y_max = self.y_max.min(frame_height);

        if x_max <= x_min || y_max <= y_min {
            return None;
        }
        Some((x_min, y_min, x_max - x_min, y_max - y_min))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub name: String,
    pub hsv_min: [u8; 3],
    pub hsv_max: [u8; 3],
    pub min_area: i64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            name: String::from("orange"),
            hsv_min: [247, 97, 185],
            hsv_max: [12, 228, 255],
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl TargetConfig {
    pub fn to_target(&self) -> ColorTarget {
        ColorTarget::new(
            self.name.clone(),
            HsvRange::from_triples(self.hsv_min, self.hsv_max),
            self.min_area,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub crop: CropWindow,
    /// Side of the square sensor window used for recentering.
    pub sensor_size: u32,
    /// Optical-axis offset from the window center, in pixels.
    pub offset_x: f64,
    pub offset_y: f64,
    pub target: TargetConfig,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            crop: CropWindow::default(),
            sensor_size: DEFAULT_SENSOR_SIZE,
            offset_x: 0.0,
            offset_y: 0.0,
            target: TargetConfig::default(),
        }
    }
}

impl LocatorConfig {
    pub fn load(path: impl AsRef<Path>) -> LocatorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LocatorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading locator config from {}", path.display());
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> LocatorResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LocatorResult<()> {
        if self.crop.x_max <= self.crop.x_min || self.crop.y_max <= self.crop.y_min {
            return Err(LocatorError::InvalidConfig(format!(
                "crop window {} is empty",
                self.crop
            )));
        }
        if self.sensor_size == 0 {
            return Err(LocatorError::InvalidConfig(String::from(
                "sensor_size must be positive",
            )));
        }

        let [_, sat_min, val_min] = self.target.hsv_min;
        let [_, sat_max, val_max] = self.target.hsv_max;
        if sat_min > sat_max || val_min > val_max {
            return Err(LocatorError::InvalidConfig(format!(
                "target {}: saturation and value minimums must not exceed maximums",
                self.target.name
            )));
        }
        if self.target.min_area < 0 {
            return Err(LocatorError::InvalidConfig(format!(
                "target {}: min_area must not be negative",
                self.target.name
            )));
        }
        Ok(())
    }

    pub fn optical_frame(&self) -> OpticalFrame {
        OpticalFrame::new(self.sensor_size, self.offset_x, self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = LocatorConfig::from_toml("").unwrap();
        assert_eq!(config, LocatorConfig::default());
        assert!(config.target.to_target().range.wraps_hue());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = LocatorConfig::from_toml(
            r#"
            offset_x = 4.5

            [target]
            name = "green"
            hsv_min = [60, 80, 80]
            hsv_max = [110, 255, 255]
            "#,
        )
        .unwrap();

        assert_eq!(config.offset_x, 4.5);
        assert_eq!(config.offset_y, 0.0);
        assert_eq!(config.crop, CropWindow::default());
        assert_eq!(config.target.name, "green");
        assert_eq!(config.target.min_area, DEFAULT_MIN_AREA);
        assert!(!config.target.to_target().range.wraps_hue());
    }

    #[test]
    fn inverted_crop_is_rejected() {
        let result = LocatorConfig::from_toml(
            r#"
            [crop]
            x_min = 500
            x_max = 100
            y_min = 0
            y_max = 720
            "#,
        );
        assert!(matches!(result, Err(LocatorError::InvalidConfig(_))));
    }

    #[test]
    fn inverted_saturation_is_rejected() {
        let mut config = LocatorConfig::default();
        config.target.hsv_min = [0, 200, 0];
        config.target.hsv_max = [20, 100, 255];
        assert!(matches!(config.validate(), Err(LocatorError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = LocatorConfig::from_toml("sensor_size = \"wide\"");
        assert!(matches!(result, Err(LocatorError::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = LocatorConfig::load("/nonexistent/locator.toml");
        assert!(matches!(result, Err(LocatorError::ConfigRead { .. })));
    }

    #[test]
    fn crop_clamps_like_slicing() {
        let crop = CropWindow::default();
        assert_eq!(crop.clamp_to(1280, 720), Some((280, 0, 720, 720)));
        assert_eq!(crop.clamp_to(640, 480), Some((280, 0, 360, 480)));
        assert_eq!(crop.clamp_to(200, 480), None);
    }
}
