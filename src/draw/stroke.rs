//! Chalk stroke rasterization and the subtractive eraser.

use super::color::{HexColor, CHALK_WHITE};
use super::point::Point;
use super::surface::{Surface, SurfaceError};
use crate::config::DrawingConfig;
use cairo::Operator;
use rand::Rng;
use std::f64::consts::TAU;

/// Distance between texture-pass steps along a segment, in pixels.
const TEXTURE_STEP: f64 = 2.0;

/// Opacity of the dot placed when a stroke starts.
const DOT_OPACITY: f64 = 0.6;

/// Upper bound for a single grain particle's opacity.
const PARTICLE_MAX_OPACITY: f64 = 0.1;

/// What the single tracked stroke is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Idle,
    Drawing,
    Erasing,
}

/// Mutable per-session stroke record.
///
/// `is_erasing` doubles as the eraser toggle: it survives between gestures
/// and is read when each queued point is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeState {
    pub last: Point,
    pub is_drawing: bool,
    pub is_erasing: bool,
    pub color: HexColor,
    pub brush_size: f64,
    pub eraser_size: f64,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self {
            last: Point::default(),
            is_drawing: false,
            is_erasing: false,
            color: CHALK_WHITE,
            brush_size: 7.0,
            eraser_size: 50.0,
        }
    }
}

impl StrokeState {
    pub fn mode(&self) -> StrokeMode {
        match (self.is_drawing, self.is_erasing) {
            (false, _) => StrokeMode::Idle,
            (true, false) => StrokeMode::Drawing,
            (true, true) => StrokeMode::Erasing,
        }
    }

    /// Marks a stroke as started at `at`.
    pub fn begin(&mut self, at: Point) {
        self.is_drawing = true;
        self.last = at;
    }

    pub fn end(&mut self) {
        self.is_drawing = false;
    }
}

/// Look of the chalk line: opacity range and grain density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChalkStyle {
    pub opacity_min: f64,
    pub opacity_max: f64,
    /// Particles stamped per texture step.
    pub texture_intensity: u32,
}

impl Default for ChalkStyle {
    fn default() -> Self {
        Self {
            opacity_min: 0.4,
            opacity_max: 0.6,
            texture_intensity: 3,
        }
    }
}

impl From<&DrawingConfig> for ChalkStyle {
    fn from(config: &DrawingConfig) -> Self {
        Self {
            opacity_min: config.opacity.min,
            opacity_max: config.opacity.max,
            texture_intensity: config.texture_intensity,
        }
    }
}

impl ChalkStyle {
    /// Samples a segment opacity from `[opacity_min, opacity_max)`.
    pub fn sample_opacity<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.opacity_min + rng.random::<f64>() * (self.opacity_max - self.opacity_min)
    }
}

/// Rasterizes queued points onto a [`Surface`].
///
/// Owns the [`StrokeState`]; every draw or erase advances `last` so the next
/// queued point chains onto the path.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    state: StrokeState,
    style: ChalkStyle,
}

impl StrokeRenderer {
    pub fn new(state: StrokeState, style: ChalkStyle) -> Self {
        Self { state, style }
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StrokeState {
        &mut self.state
    }

    pub fn style(&self) -> &ChalkStyle {
        &self.style
    }

    /// Draws or erases up to `to`, depending on the eraser flag.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        surface: &Surface,
        to: Point,
        rng: &mut R,
    ) -> Result<(), SurfaceError> {
        if self.state.is_erasing {
            self.erase(surface, to)
        } else {
            self.draw(surface, to, rng)
        }
    }

    /// Strokes a grainy chalk segment from the last position to `to`.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        surface: &Surface,
        to: Point,
        rng: &mut R,
    ) -> Result<(), SurfaceError> {
        let ctx = surface.context()?;
        let from = self.state.last;

        let opacity = self.style.sample_opacity(rng);
        self.state.color.to_color(opacity).set_source(&ctx);
        ctx.set_line_width(self.state.brush_size);
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        let _ = ctx.stroke();

        self.texture_pass(&ctx, from, to, rng);

        self.state.last = to;
        Ok(())
    }

    /// Fills a solid dot so a tap without motion still leaves a mark.
    pub fn draw_dot(&self, surface: &Surface, at: Point) -> Result<(), SurfaceError> {
        let ctx = surface.context()?;
        self.state.color.to_color(DOT_OPACITY).set_source(&ctx);
        ctx.arc(at.x, at.y, self.state.brush_size / 2.0, 0.0, TAU);
        let _ = ctx.fill();
        Ok(())
    }

    /// Clears a circle of diameter `eraser_size` to full transparency.
    pub fn erase(&mut self, surface: &Surface, at: Point) -> Result<(), SurfaceError> {
        let ctx = surface.context()?;

        let _ = ctx.save();
        ctx.set_operator(Operator::DestOut);
        ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
        ctx.arc(at.x, at.y, self.state.eraser_size / 2.0, 0.0, TAU);
        let _ = ctx.fill();
        let _ = ctx.restore();

        self.state.last = at;
        Ok(())
    }

    /// Stamps small square grains along the segment.
    fn texture_pass<R: Rng + ?Sized>(
        &self,
        ctx: &cairo::Context,
        from: Point,
        to: Point,
        rng: &mut R,
    ) {
        let steps = (from.distance_to(to) / TEXTURE_STEP).ceil() as u32;
        let brush = self.state.brush_size;

        for i in 0..steps {
            let at = from.lerp(to, i as f64 / steps as f64);

            for _ in 0..self.style.texture_intensity {
                let offset_x = (rng.random::<f64>() - 0.5) * brush;
                let offset_y = (rng.random::<f64>() - 0.5) * brush;
                let size = rng.random::<f64>() * 2.0 + 1.0;
                let alpha = rng.random::<f64>() * PARTICLE_MAX_OPACITY;

                self.state.color.to_color(alpha).set_source(ctx);
                ctx.rectangle(at.x + offset_x, at.y + offset_y, size, size);
                let _ = ctx.fill();
            }
        }
    }
}
