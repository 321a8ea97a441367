//! Flattening the board to a PNG and writing it to disk.

use crate::config::SaveConfig;
use crate::draw::Surface;
use cairo::{Context, Format, ImageSurface};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while exporting the board.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] cairo::IoError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Where and under which name exported images are written.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub directory: PathBuf,
    pub filename_prefix: String,
    pub include_timestamp: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Chalkboard"),
            filename_prefix: "chalkboard".to_string(),
            include_timestamp: true,
        }
    }
}

impl From<&SaveConfig> for ExportConfig {
    fn from(config: &SaveConfig) -> Self {
        Self {
            directory: expand_tilde(&config.directory),
            filename_prefix: config.filename_prefix.clone(),
            include_timestamp: config.include_timestamp,
        }
    }
}

/// Paints the board onto an opaque copy of its background color.
///
/// Eraser holes are transparent in the live surface; here they show the flat
/// background color.
pub fn flatten(surface: &Surface) -> Result<ImageSurface, ExportError> {
    let flat = ImageSurface::create(Format::ARgb32, surface.width(), surface.height())?;
    {
        let ctx = Context::new(&flat)?;
        surface.background().color.to_color(1.0).set_source(&ctx);
        ctx.paint()?;
        ctx.set_source_surface(surface.image(), 0.0, 0.0)?;
        ctx.paint()?;
    }
    Ok(flat)
}

/// Encodes an image surface as PNG bytes.
pub fn encode_png(image: &ImageSurface) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image.write_to_png(&mut bytes)?;
    Ok(bytes)
}

/// Flattens and encodes in one step.
pub fn export_png(surface: &Surface) -> Result<Vec<u8>, ExportError> {
    encode_png(&flatten(surface)?)
}

/// Builds `"{prefix}_{millis}.png"`, or `"{prefix}.png"` without a timestamp.
pub fn export_filename(prefix: &str, include_timestamp: bool, millis: i64) -> String {
    if include_timestamp {
        format!("{}_{}.png", prefix, millis)
    } else {
        format!("{}.png", prefix)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    Ok(directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf()))
}

/// Writes encoded image bytes into the configured directory.
///
/// # Returns
/// Path to the saved file
pub fn save_image(bytes: &[u8], config: &ExportConfig, millis: i64) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.directory)?;
    let filename = export_filename(&config.filename_prefix, config.include_timestamp, millis);
    let file_path = directory.join(filename);

    log::info!(
        "Saving drawing to: {} ({} bytes)",
        file_path.display(),
        bytes.len()
    );

    fs::write(&file_path, bytes)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&file_path, Permissions::from_mode(0o600))?;
    }

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
