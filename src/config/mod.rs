//! Configuration file support.
//!
//! Settings are read from `~/.config/chalkboard/config.toml`. Every field has
//! a default, so a missing file or a partial file both work. Out-of-range
//! values are clamped with a warning rather than rejected.

pub mod keybindings;
pub mod types;

pub use keybindings::{Action, KeyBinding, KeybindingsConfig, lookup_action};
pub use types::{
    CanvasConfig, DrawingConfig, OpacityRange, PerformanceConfig, SaveConfig, TouchConfig,
    UiConfig,
};

use crate::draw::HexColor;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "#ffff00"
/// brush_size = 9.0
///
/// [drawing.opacity]
/// min = 0.3
/// max = 0.5
///
/// [canvas]
/// background_color = "#1b1b1b"
///
/// [save]
/// directory = "~/Pictures/Chalkboard"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Chalk color, tool sizes and grain
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Board color and speckle texture
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Notice timings and resize debounce
    #[serde(default)]
    pub ui: UiConfig,

    /// Queue tuning
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Touch input
    #[serde(default)]
    pub touch: TouchConfig,

    /// Image export
    #[serde(default)]
    pub save: SaveConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `brush_size`: 1.0 - 20.0
    /// - `eraser_size`: 20.0 - 100.0
    /// - `texture_intensity`: 0 - 10
    /// - `opacity.min` / `opacity.max`: 0.0 - 1.0, min <= max
    /// - `texture_opacity`: 0.0 - 1.0
    /// - colors: `#rrggbb`, falling back to the defaults
    pub fn validate_and_clamp(&mut self) {
        if !(1.0..=20.0).contains(&self.drawing.brush_size) {
            warn!(
                "Invalid brush_size {:.1}, clamping to 1.0-20.0 range",
                self.drawing.brush_size
            );
            self.drawing.brush_size = clamp_or(self.drawing.brush_size, 1.0, 20.0, 7.0);
        }

        if !(20.0..=100.0).contains(&self.drawing.eraser_size) {
            warn!(
                "Invalid eraser_size {:.1}, clamping to 20.0-100.0 range",
                self.drawing.eraser_size
            );
            self.drawing.eraser_size = clamp_or(self.drawing.eraser_size, 20.0, 100.0, 50.0);
        }

        if self.drawing.texture_intensity > 10 {
            warn!(
                "Invalid texture_intensity {}, clamping to 0-10 range",
                self.drawing.texture_intensity
            );
            self.drawing.texture_intensity = 10;
        }

        let opacity = &mut self.drawing.opacity;
        for (name, value) in [("min", &mut opacity.min), ("max", &mut opacity.max)] {
            if !(0.0..=1.0).contains(value) {
                warn!("Invalid opacity.{} {:.3}, clamping to 0.0-1.0", name, value);
                *value = clamp_or(*value, 0.0, 1.0, 0.5);
            }
        }
        if opacity.min > opacity.max {
            warn!(
                "opacity.min {:.3} exceeds opacity.max {:.3}, swapping",
                opacity.min, opacity.max
            );
            std::mem::swap(&mut opacity.min, &mut opacity.max);
        }

        if !(0.0..=1.0).contains(&self.canvas.texture_opacity) {
            warn!(
                "Invalid texture_opacity {:.3}, clamping to 0.0-1.0",
                self.canvas.texture_opacity
            );
            self.canvas.texture_opacity = clamp_or(self.canvas.texture_opacity, 0.0, 1.0, 0.02);
        }

        if HexColor::parse(&self.drawing.default_color).is_err() {
            warn!(
                "Invalid default_color '{}', falling back to '{}'",
                self.drawing.default_color,
                types::default_chalk_color()
            );
            self.drawing.default_color = types::default_chalk_color();
        }

        if HexColor::parse(&self.canvas.background_color).is_err() {
            warn!(
                "Invalid background_color '{}', falling back to '{}'",
                self.canvas.background_color,
                types::default_background_color()
            );
            self.canvas.background_color = types::default_background_color();
        }

        if self.save.filename_prefix.trim().is_empty() {
            warn!(
                "Empty filename_prefix, falling back to '{}'",
                types::default_filename_prefix()
            );
            self.save.filename_prefix = types::default_filename_prefix();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("chalkboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses TOML without touching the filesystem. Values are not clamped.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Serializes to TOML, as printed by `--print-default-config`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Clamps finite values into range; non-finite values become `fallback`.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
