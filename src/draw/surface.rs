//! Drawing surface: pixel buffer, background fill and resize reconciliation.
//!
//! The surface is a single ARGB32 Cairo image. The background (slate color plus
//! a sparse speckle texture) is painted into the same buffer as the chalk, so
//! erasing punches through both and leaves real transparency behind. Export
//! flattens that transparency back onto a flat background.

use super::color::{ColorError, HexColor};
use crate::config::CanvasConfig;
use cairo::{Context, Format, ImageSurface, LineCap, LineJoin, Operator};
use log::debug;
use rand::Rng;
use thiserror::Error;

/// Errors raised by surface allocation and pixel access.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface pixels unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("pixel ({x}, {y}) is outside the surface")]
    OutOfBounds { x: i32, y: i32 },
}

/// Background fill settings applied on creation, resize and clear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    /// Solid board color painted first.
    pub color: HexColor,
    /// Whether the speckle texture is drawn over the fill.
    pub texture_enabled: bool,
    /// Number of speckles per application.
    pub texture_density: u32,
    /// Upper bound for a single speckle's opacity.
    pub texture_opacity: f64,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: super::color::SLATE_GREEN,
            texture_enabled: true,
            texture_density: 100,
            texture_opacity: 0.02,
        }
    }
}

impl TryFrom<&CanvasConfig> for Background {
    type Error = ColorError;

    fn try_from(config: &CanvasConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            color: HexColor::parse(&config.background_color)?,
            texture_enabled: config.texture_enabled,
            texture_density: config.texture_density,
            texture_opacity: config.texture_opacity,
        })
    }
}

/// Line defaults that Cairo contexts on this surface start with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// One unpremultiplied pixel read back from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Owns the pixel buffer that every stroke and erase mutates in place.
pub struct Surface {
    buffer: ImageSurface,
    width: i32,
    height: i32,
    background: Background,
    line_style: LineStyle,
    preserve_on_resize: bool,
}

impl Surface {
    /// Allocates a surface and paints the background into it.
    pub fn new<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        background: Background,
        rng: &mut R,
    ) -> Result<Self, SurfaceError> {
        check_size(width, height)?;

        let mut surface = Self {
            buffer: ImageSurface::create(Format::ARgb32, width, height)?,
            width,
            height,
            background,
            line_style: LineStyle::default(),
            preserve_on_resize: true,
        };
        surface.apply_background(rng)?;
        Ok(surface)
    }

    /// Controls whether [`Surface::resize`] restores the previous pixels.
    pub fn set_preserve_on_resize(&mut self, preserve: bool) {
        self.preserve_on_resize = preserve;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.line_style = style;
    }

    /// Read-only access to the underlying Cairo image.
    pub fn image(&self) -> &ImageSurface {
        &self.buffer
    }

    /// Creates a drawing context with this surface's line defaults applied.
    ///
    /// Contexts must be dropped before [`Surface::pixel`] can borrow the data.
    pub fn context(&self) -> Result<Context, SurfaceError> {
        let ctx = Context::new(&self.buffer)?;
        ctx.set_line_cap(self.line_style.cap);
        ctx.set_line_join(self.line_style.join);
        Ok(ctx)
    }

    /// Paints the board color and a fresh random speckle over the whole buffer.
    pub fn apply_background<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        paint_background(&ctx, &self.background, self.width, self.height, rng);
        Ok(())
    }

    /// Resizes the buffer while keeping drawn pixels where they were.
    ///
    /// The old pixels are copied back verbatim with the `Source` operator, so
    /// eraser holes stay transparent instead of picking up the new background.
    /// Anything beyond a smaller new size is cropped.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        width: i32,
        height: i32,
        rng: &mut R,
    ) -> Result<(), SurfaceError> {
        check_size(width, height)?;

        let resized = ImageSurface::create(Format::ARgb32, width, height)?;
        let previous = std::mem::replace(&mut self.buffer, resized);
        let (old_width, old_height) = (self.width, self.height);

        self.width = width;
        self.height = height;
        // Geometry changes reset context state in the host; mirror that here.
        self.line_style = LineStyle::default();

        self.apply_background(rng)?;

        if self.preserve_on_resize {
            let ctx = self.context()?;
            ctx.set_operator(Operator::Source);
            ctx.set_source_surface(&previous, 0.0, 0.0)?;
            ctx.rectangle(0.0, 0.0, old_width as f64, old_height as f64);
            ctx.fill()?;
        }

        debug!(
            "Resized surface {}x{} -> {}x{} (content preserved: {})",
            old_width, old_height, width, height, self.preserve_on_resize
        );
        Ok(())
    }

    /// Wipes every stroke and repaints the background. Irreversible.
    pub fn clear<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SurfaceError> {
        {
            let ctx = self.context()?;
            ctx.set_operator(Operator::Clear);
            ctx.paint()?;
        }
        self.apply_background(rng)
    }

    /// Reads a single pixel, converting from Cairo's premultiplied layout.
    pub fn pixel(&mut self, x: i32, y: i32) -> Result<Rgba8, SurfaceError> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Err(SurfaceError::OutOfBounds { x, y });
        }

        let stride = self.buffer.stride() as usize;
        let data = self.buffer.data()?;
        let offset = y as usize * stride + x as usize * 4;
        let raw = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);

        Ok(unpremultiply(raw))
    }
}

/// Fills the board color, then scatters low-opacity white speckles.
pub fn paint_background<R: Rng + ?Sized>(
    ctx: &Context,
    background: &Background,
    width: i32,
    height: i32,
    rng: &mut R,
) {
    let _ = ctx.save();
    ctx.set_operator(Operator::Over);

    background.color.to_color(1.0).set_source(ctx);
    ctx.rectangle(0.0, 0.0, width as f64, height as f64);
    let _ = ctx.fill();

    if background.texture_enabled {
        for _ in 0..background.texture_density {
            let x = rng.random::<f64>() * width as f64;
            let y = rng.random::<f64>() * height as f64;
            let size = rng.random::<f64>() * 3.0;
            let alpha = rng.random::<f64>() * background.texture_opacity;

            ctx.set_source_rgba(1.0, 1.0, 1.0, alpha);
            ctx.rectangle(x, y, size, size);
            let _ = ctx.fill();
        }
    }

    let _ = ctx.restore();
}

fn check_size(width: i32, height: i32) -> Result<(), SurfaceError> {
    if width <= 0 || height <= 0 {
        return Err(SurfaceError::InvalidSize { width, height });
    }
    Ok(())
}

fn unpremultiply(argb: u32) -> Rgba8 {
    let a = (argb >> 24) as u8;
    if a == 0 {
        return Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        };
    }

    let channel = |shift: u32| {
        let premultiplied = (argb >> shift) & 0xff;
        ((premultiplied * 255 + a as u32 / 2) / a as u32).min(255) as u8
    };

    Rgba8 {
        r: channel(16),
        g: channel(8),
        b: channel(0),
        a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plain_background() -> Background {
        Background {
            texture_enabled: false,
            ..Background::default()
        }
    }

    fn punch_hole(surface: &Surface, x: f64, y: f64, radius: f64) {
        let ctx = surface.context().unwrap();
        ctx.set_operator(Operator::DestOut);
        ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
        ctx.fill().unwrap();
    }

    #[test]
    fn new_surface_is_filled_with_background() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut surface = Surface::new(20, 10, plain_background(), &mut rng).unwrap();

        let pixel = surface.pixel(5, 5).unwrap();
        assert_eq!(
            pixel,
            Rgba8 {
                r: 0x0a,
                g: 0x3d,
                b: 0x0a,
                a: 255
            }
        );
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            Surface::new(0, 10, plain_background(), &mut rng),
            Err(SurfaceError::InvalidSize { width: 0, height: 10 })
        ));

        let mut surface = Surface::new(4, 4, plain_background(), &mut rng).unwrap();
        assert!(surface.resize(4, -1, &mut rng).is_err());
        assert_eq!((surface.width(), surface.height()), (4, 4));
    }

    #[test]
    fn resize_keeps_holes_transparent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut surface = Surface::new(40, 40, plain_background(), &mut rng).unwrap();
        punch_hole(&surface, 20.0, 20.0, 8.0);
        assert_eq!(surface.pixel(20, 20).unwrap().a, 0);

        surface.resize(80, 60, &mut rng).unwrap();

        assert_eq!((surface.width(), surface.height()), (80, 60));
        assert_eq!(surface.pixel(20, 20).unwrap().a, 0);
        assert_eq!(surface.pixel(70, 50).unwrap().a, 255);
    }

    #[test]
    fn resize_without_preserve_drops_content() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut surface = Surface::new(40, 40, plain_background(), &mut rng).unwrap();
        surface.set_preserve_on_resize(false);
        punch_hole(&surface, 20.0, 20.0, 8.0);

        surface.resize(40, 40, &mut rng).unwrap();
        assert_eq!(surface.pixel(20, 20).unwrap().a, 255);
    }

    #[test]
    fn resize_resets_line_style() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut surface = Surface::new(10, 10, plain_background(), &mut rng).unwrap();
        surface.set_line_style(LineStyle {
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        });

        surface.resize(12, 12, &mut rng).unwrap();
        assert_eq!(surface.line_style(), LineStyle::default());
    }

    #[test]
    fn clear_restores_opaque_background() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut surface = Surface::new(30, 30, plain_background(), &mut rng).unwrap();
        punch_hole(&surface, 15.0, 15.0, 6.0);

        surface.clear(&mut rng).unwrap();
        assert_eq!(surface.pixel(15, 15).unwrap().a, 255);
    }

    #[test]
    fn pixel_out_of_bounds_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut surface = Surface::new(5, 5, plain_background(), &mut rng).unwrap();
        assert!(matches!(
            surface.pixel(5, 0),
            Err(SurfaceError::OutOfBounds { x: 5, y: 0 })
        ));
    }

    #[test]
    fn unpremultiply_recovers_channels() {
        // 50% white, premultiplied.
        let pixel = unpremultiply(0x80_80_80_80);
        assert_eq!(pixel.a, 0x80);
        assert_eq!(pixel.r, 255);
    }
}
