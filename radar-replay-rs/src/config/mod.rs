//! Configuration types for the replay viewer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Scalar field that drives marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorBy {
    /// Single fixed color for every point.
    None,
    /// Radial velocity, diverging scale.
    #[default]
    Velocity,
    /// Return intensity, sequential scale.
    Intensity,
}

impl ColorBy {
    /// Plotly color scale name for this mode.
    pub fn color_scale(self) -> Option<&'static str> {
        match self {
            ColorBy::None => None,
            ColorBy::Velocity => Some("RdBu_r"),
            ColorBy::Intensity => Some("Viridis"),
        }
    }

    /// Colorbar label for this mode.
    pub fn colorbar_title(self) -> Option<&'static str> {
        match self {
            ColorBy::None => None,
            ColorBy::Velocity => Some("Velocity (m/s)"),
            ColorBy::Intensity => Some("Intensity"),
        }
    }
}

/// Physical mounting of the radar sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarMountConfig {
    /// Mount height above the floor in meters
    #[serde(default = "default_height_m")]
    pub height_m: f64,

    /// Half-angle of the field-of-view cone in degrees
    #[serde(default = "default_fov_half_angle_deg")]
    pub fov_half_angle_deg: f64,

    /// Headroom added above the mount on the height axis
    #[serde(default = "default_height_margin_m")]
    pub height_margin_m: f64,
}

fn default_height_m() -> f64 {
    2.7
}

fn default_fov_half_angle_deg() -> f64 {
    60.0
}

fn default_height_margin_m() -> f64 {
    0.1
}

impl Default for RadarMountConfig {
    fn default() -> Self {
        Self {
            height_m: default_height_m(),
            fov_half_angle_deg: default_fov_half_angle_deg(),
            height_margin_m: default_height_margin_m(),
        }
    }
}

impl RadarMountConfig {
    /// Symmetric limit of both horizontal axes: the floor footprint of the
    /// field-of-view cone, rounded up to a whole meter.
    pub fn horizontal_limit(&self) -> f64 {
        (self.height_m * self.fov_half_angle_deg.to_radians().tan()).ceil()
    }

    /// Upper limit of the height axis.
    pub fn vertical_limit(&self) -> f64 {
        self.height_m + self.height_margin_m
    }
}

/// Figure appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Which point attribute colors the markers
    #[serde(default)]
    pub color_by: ColorBy,

    /// Marker diameter in pixels
    #[serde(default = "default_marker_size")]
    pub marker_size: u32,

    /// Figure width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Figure height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Script URL the generated page loads plotly.js from
    #[serde(default = "default_plotly_js_url")]
    pub plotly_js_url: String,
}

fn default_marker_size() -> u32 {
    4
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

fn default_plotly_js_url() -> String {
    "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_by: ColorBy::default(),
            marker_size: default_marker_size(),
            width: default_width(),
            height: default_height(),
            plotly_js_url: default_plotly_js_url(),
        }
    }
}

/// Main viewer configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub radar: RadarMountConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl ViewerConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ViewerConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that would produce a degenerate scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let radar = &self.radar;
        if !radar.height_m.is_finite() || radar.height_m <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "radar height must be a positive finite value, got {}",
                radar.height_m
            )));
        }
        let half_angle = radar.fov_half_angle_deg;
        if !half_angle.is_finite() || half_angle <= 0.0 || half_angle >= 90.0 {
            return Err(ConfigError::Invalid(format!(
                "field-of-view half-angle must lie in (0, 90) degrees, got {}",
                half_angle
            )));
        }
        if !radar.height_margin_m.is_finite() || radar.height_margin_m < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "height margin must be finite and not negative, got {}",
                radar.height_margin_m
            )));
        }
        if self.display.marker_size == 0 {
            return Err(ConfigError::Invalid("marker size must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_viewer_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.radar.height_m, 2.7);
        assert_eq!(config.display.color_by, ColorBy::Velocity);
        assert_eq!(config.display.width, 1200);
        assert_eq!(config.display.height, 800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_axis_limits_for_default_mount() {
        let radar = RadarMountConfig::default();
        // 2.7 * tan(60°) = 4.676..., rounded up
        assert_eq!(radar.horizontal_limit(), 5.0);
        assert!((radar.vertical_limit() - 2.8).abs() < 1e-12);
    }

    #[test]
    fn test_axis_limits_follow_height() {
        let radar = RadarMountConfig {
            height_m: 1.0,
            ..RadarMountConfig::default()
        };
        assert_eq!(radar.horizontal_limit(), 2.0);
        assert!((radar.vertical_limit() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_color_by_labels() {
        assert_eq!(ColorBy::Velocity.color_scale(), Some("RdBu_r"));
        assert_eq!(ColorBy::Intensity.color_scale(), Some("Viridis"));
        assert_eq!(ColorBy::None.color_scale(), None);
        assert_eq!(ColorBy::Velocity.colorbar_title(), Some("Velocity (m/s)"));
        assert_eq!(ColorBy::None.colorbar_title(), None);
    }

    #[test]
    fn test_from_yaml_partial_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "radar:").unwrap();
        writeln!(file, "  height_m: 3.0").unwrap();
        writeln!(file, "display:").unwrap();
        writeln!(file, "  color_by: intensity").unwrap();
        file.flush().unwrap();

        let config = ViewerConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.radar.height_m, 3.0);
        assert_eq!(config.radar.fov_half_angle_deg, 60.0);
        assert_eq!(config.display.color_by, ColorBy::Intensity);
        assert_eq!(config.display.marker_size, 4);
    }

    #[test]
    fn test_from_yaml_rejects_invalid_height() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "radar:").unwrap();
        writeln!(file, "  height_m: -1.0").unwrap();
        file.flush().unwrap();

        let result = ViewerConfig::from_yaml(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.yaml");
        let mut config = ViewerConfig::default();
        config.display.color_by = ColorBy::None;

        config.to_yaml(&path).unwrap();
        let loaded = ViewerConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.display.color_by, ColorBy::None);
        assert_eq!(loaded.radar.height_m, config.radar.height_m);
    }

    #[test]
    fn test_validate_rejects_flat_cone() {
        let mut config = ViewerConfig::default();
        config.radar.fov_half_angle_deg = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_mount() {
        let mut config = ViewerConfig::default();
        config.radar.height_m = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.radar.height_m = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ViewerConfig::default();
        config.radar.height_margin_m = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.radar.height_margin_m = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ViewerConfig::default();
        config.radar.fov_half_angle_deg = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/viewer.example.yaml");
        let config = ViewerConfig::from_yaml(path).unwrap();
        let defaults = ViewerConfig::default();

        assert_eq!(config.radar.height_m, defaults.radar.height_m);
        assert_eq!(config.radar.fov_half_angle_deg, defaults.radar.fov_half_angle_deg);
        assert_eq!(config.radar.height_margin_m, defaults.radar.height_margin_m);
        assert_eq!(config.display.color_by, defaults.display.color_by);
        assert_eq!(config.display.plotly_js_url, defaults.display.plotly_js_url);
    }
}
