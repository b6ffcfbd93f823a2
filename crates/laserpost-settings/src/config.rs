//! Post-processor configuration
//!
//! `PostConfig` lists every option the encoder recognizes. It is resolved
//! once when a job starts and is read-only for the rest of the job.
//! Supports JSON and TOML file formats.

pub use laserpost_core::units::MeasurementSystem;
use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Laser command strings, one per cutting mode plus the off command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerCommands {
    /// Laser-on command for through cuts
    pub through: String,
    /// Laser-on command for etching
    pub etch: String,
    /// Laser-on command for vaporize engraving
    pub vaporize: String,
    /// Laser-off command
    pub off: String,
}

impl Default for PowerCommands {
    fn default() -> Self {
        Self {
            through: "M4 S1000".to_string(),
            etch: "M4 S250".to_string(),
            vaporize: "M4 S600".to_string(),
            off: "M5".to_string(),
        }
    }
}

/// Complete post-processor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Output units (G21 / G20)
    pub units: MeasurementSystem,
    /// Declare the starting position as work zero (G92 X0 Y0 Z0)
    pub set_position_xy: bool,
    /// Run the homing cycle before the first section
    pub home_at_start: bool,
    /// Run the homing cycle at job close
    pub home_at_end: bool,
    /// Absolute X to move to at job close
    pub finish_x: Option<f64>,
    /// Absolute Y to move to at job close
    pub finish_y: Option<f64>,
    /// Feed rate written on XY rapid moves
    pub rapid_feed: f64,
    /// Feed rate written on Z rapid moves
    pub rapid_z_feed: f64,
    /// Chord tolerance for arcs that are approximated by line segments
    pub tolerance: f64,
    /// Laser power commands
    pub power: PowerCommands,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            units: MeasurementSystem::Metric,
            set_position_xy: true,
            home_at_start: false,
            home_at_end: false,
            finish_x: None,
            finish_y: None,
            rapid_feed: 3000.0,
            rapid_z_feed: 600.0,
            tolerance: 0.01,
            power: PowerCommands::default(),
        }
    }
}

impl PostConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/laserpost/post.toml`)
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("laserpost").join("post.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(unsupported_format(path).into());
        };

        config.validate()?;
        debug!(path = %path.display(), "loaded post configuration");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(unsupported_format(path).into());
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        positive("rapid_feed", self.rapid_feed)?;
        positive("rapid_z_feed", self.rapid_z_feed)?;
        positive("tolerance", self.tolerance)?;

        for (key, value) in [("finish_x", self.finish_x), ("finish_y", self.finish_y)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(out_of_range(key, v));
                }
            }
        }

        let commands = [
            ("power.through", &self.power.through),
            ("power.etch", &self.power.etch),
            ("power.vaporize", &self.power.vaporize),
            ("power.off", &self.power.off),
        ];
        for (key, command) in commands {
            if command.trim().is_empty() {
                return Err(ConfigError::EmptyCommand(key.to_string()));
            }
        }

        Ok(())
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn unsupported_format(path: &Path) -> ConfigError {
    ConfigError::UnsupportedFormat(
        path.extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(none)".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.units, MeasurementSystem::Metric);
        assert_eq!(config.power.off, "M5");
        assert!(config.finish_x.is_none());
    }

    #[test]
    fn test_rejects_non_positive_feed() {
        let mut config = PostConfig::default();
        config.rapid_feed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "rapid_feed"
        ));

        let mut config = PostConfig::default();
        config.rapid_z_feed = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_power_command() {
        let mut config = PostConfig::default();
        config.power.etch = "   ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCommand(ref key)) if key == "power.etch"
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PostConfig = toml::from_str(
            r#"
            units = "imperial"
            finish_x = 12.5

            [power]
            etch = "M3 S80"
            "#,
        )
        .unwrap();

        assert_eq!(config.units, MeasurementSystem::Imperial);
        assert_eq!(config.finish_x, Some(12.5));
        assert_eq!(config.finish_y, None);
        assert_eq!(config.power.etch, "M3 S80");
        assert_eq!(config.power.through, "M4 S1000");
        assert_eq!(config.rapid_feed, 3000.0);
    }
}
