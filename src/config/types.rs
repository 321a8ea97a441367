//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Chalk appearance and tool sizes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default chalk color as a `#rrggbb` hex triplet
    #[serde(default = "default_chalk_color")]
    pub default_color: String,

    /// Chalk line width in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_brush_size")]
    pub brush_size: f64,

    /// Eraser diameter in pixels (valid range: 20.0 - 100.0)
    #[serde(default = "default_eraser_size")]
    pub eraser_size: f64,

    /// Grain particles stamped per texture step (valid range: 0 - 10)
    #[serde(default = "default_texture_intensity")]
    pub texture_intensity: u32,

    /// Per-segment opacity range
    #[serde(default)]
    pub opacity: OpacityRange,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_chalk_color(),
            brush_size: default_brush_size(),
            eraser_size: default_eraser_size(),
            texture_intensity: default_texture_intensity(),
            opacity: OpacityRange::default(),
        }
    }
}

/// Range each chalk segment's opacity is sampled from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct OpacityRange {
    #[serde(default = "default_opacity_min")]
    pub min: f64,
    #[serde(default = "default_opacity_max")]
    pub max: f64,
}

impl Default for OpacityRange {
    fn default() -> Self {
        Self {
            min: default_opacity_min(),
            max: default_opacity_max(),
        }
    }
}

/// Board surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Board color as a `#rrggbb` hex triplet
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Scatter faint speckles over the board color
    #[serde(default = "default_true")]
    pub texture_enabled: bool,

    /// Maximum opacity of a single speckle (0.0 - 1.0)
    #[serde(default = "default_texture_opacity")]
    pub texture_opacity: f64,

    /// Number of speckles painted per background pass
    #[serde(default = "default_texture_density")]
    pub texture_density: u32,

    /// Keep drawn content when the surface is resized
    #[serde(default = "default_true")]
    pub preserve_on_resize: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            texture_enabled: true,
            texture_opacity: default_texture_opacity(),
            texture_density: default_texture_density(),
            preserve_on_resize: true,
        }
    }
}

/// Timings for transient UI notices and resize coalescing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UiConfig {
    /// Show the controls help shortly after startup
    #[serde(default = "default_true")]
    pub show_help_on_start: bool,

    /// Delay before the startup help appears (ms)
    #[serde(default = "default_help_delay_ms")]
    pub help_delay_ms: u64,

    /// How long the startup help stays up (ms)
    #[serde(default = "default_help_duration_ms")]
    pub help_duration_ms: u64,

    /// How long help stays up after toggling it with a key (ms)
    #[serde(default = "default_help_toggle_duration_ms")]
    pub help_toggle_duration_ms: u64,

    /// How long save notices stay up (ms)
    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,

    /// Quiet period after the last resize request before resizing (ms)
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help_on_start: true,
            help_delay_ms: default_help_delay_ms(),
            help_duration_ms: default_help_duration_ms(),
            help_toggle_duration_ms: default_help_toggle_duration_ms(),
            notification_duration_ms: default_notification_duration_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }
}

/// Performance tuning options.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceConfig {
    /// Queue length between frames above which a debug message is logged.
    /// Points are never dropped.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_queue_size: default_max_queue_size(),
        }
    }
}

/// Touch input settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TouchConfig {
    /// Accept single-finger touch strokes
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Image export settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveConfig {
    /// Directory exported images are written to (`~` is expanded)
    #[serde(default = "default_save_directory")]
    pub directory: String,

    /// Filename prefix, e.g. `chalkboard` gives `chalkboard_<millis>.png`
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// Append a millisecond timestamp to the filename
    #[serde(default = "default_true")]
    pub include_timestamp: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: default_save_directory(),
            filename_prefix: default_filename_prefix(),
            include_timestamp: true,
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

pub(crate) fn default_chalk_color() -> String {
    "#ffffff".to_string()
}

fn default_brush_size() -> f64 {
    7.0
}

fn default_eraser_size() -> f64 {
    50.0
}

fn default_texture_intensity() -> u32 {
    3
}

fn default_opacity_min() -> f64 {
    0.4
}

fn default_opacity_max() -> f64 {
    0.6
}

pub(crate) fn default_background_color() -> String {
    "#0a3d0a".to_string()
}

fn default_true() -> bool {
    true
}

fn default_texture_opacity() -> f64 {
    0.02
}

fn default_texture_density() -> u32 {
    100
}

fn default_help_delay_ms() -> u64 {
    500
}

fn default_help_duration_ms() -> u64 {
    3000
}

fn default_help_toggle_duration_ms() -> u64 {
    5000
}

fn default_notification_duration_ms() -> u64 {
    2000
}

fn default_resize_debounce_ms() -> u64 {
    100
}

fn default_max_queue_size() -> usize {
    50
}

fn default_save_directory() -> String {
    "~/Pictures/Chalkboard".to_string()
}

pub(crate) fn default_filename_prefix() -> String {
    "chalkboard".to_string()
}
