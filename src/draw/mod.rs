//! Rasterization primitives (Cairo-based).
//!
//! - [`HexColor`] / [`Color`]: config-facing hex triplets and Cairo RGBA
//! - [`Surface`]: the pixel buffer with its background and resize handling
//! - [`StrokeRenderer`]: chalk segments, start dots and the eraser

pub mod color;
pub mod point;
pub mod stroke;
pub mod surface;

pub use color::{Color, ColorError, HexColor, hex_to_rgba};
pub use point::Point;
pub use stroke::{ChalkStyle, StrokeMode, StrokeRenderer, StrokeState};
pub use surface::{Background, LineStyle, Rgba8, Surface, SurfaceError};
