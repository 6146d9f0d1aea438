use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Display tuning loaded from an optional TOML file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Config schema version; only version 1 is accepted.
    pub version: u32,
    /// Initial window width in pixels.
    pub window_width: i32,
    /// Initial window height in pixels.
    pub window_height: i32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Mouse-look sensitivity in radians per pixel of cursor travel.
    pub mouse_sensitivity: f32,
    /// Inverts the vertical look axis.
    pub invert_y: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            window_width: 1280,
            window_height: 720,
            fov_degrees: 70.0,
            mouse_sensitivity: 0.0025,
            invert_y: false,
        }
    }
}

impl DisplayConfig {
    /// Loads display settings from the TOML file at the provided path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read display config at {}", path.display()))?;
        Self::from_toml(&contents)
    }

    /// Parses display settings from TOML contents.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse display config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(self) -> Result<()> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported display config version {}; expected {}",
                self.version,
                SUPPORTED_CONFIG_VERSION
            );
        }
        if self.window_width <= 0 || self.window_height <= 0 {
            bail!(
                "window dimensions must be positive (received {}x{})",
                self.window_width,
                self.window_height
            );
        }
        if !(30.0..=120.0).contains(&self.fov_degrees) {
            bail!(
                "field of view must lie within 30..=120 degrees (received {})",
                self.fov_degrees
            );
        }
        if self.mouse_sensitivity <= 0.0 {
            bail!(
                "mouse sensitivity must be positive (received {})",
                self.mouse_sensitivity
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_contents_fall_back_to_defaults() {
        let config = DisplayConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config, DisplayConfig::default());
    }

    #[test]
    fn partial_contents_keep_unlisted_defaults() {
        let config = DisplayConfig::from_toml("mouse_sensitivity = 0.004\ninvert_y = true\n")
            .expect("partial config should parse");
        assert!((config.mouse_sensitivity - 0.004).abs() < f32::EPSILON);
        assert!(config.invert_y);
        assert_eq!(config.window_width, DisplayConfig::default().window_width);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let result = DisplayConfig::from_toml("version = 2\n");
        assert!(result.is_err(), "future config versions must be rejected");
    }

    #[test]
    fn out_of_range_fov_is_rejected() {
        let result = DisplayConfig::from_toml("fov_degrees = 179.0\n");
        assert!(result.is_err(), "extreme field of view must be rejected");
    }

    #[test]
    fn non_positive_sensitivity_is_rejected() {
        let result = DisplayConfig::from_toml("mouse_sensitivity = 0.0\n");
        assert!(result.is_err(), "zero sensitivity must be rejected");
    }
}
