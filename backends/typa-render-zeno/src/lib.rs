//! Zeno Renderer - glyph outlines to coverage, primitives to pixels
//!
//! Two jobs share the zeno scan converter here:
//!
//! - [`GlyphRasterizer`] turns one glyph outline (pixels, y up) into a
//!   [`GlyphBitmap`] after the text affine and pen origin are applied.
//!   Placement follows the classic bitmap-glyph convention: `left` is the
//!   first column right of the origin and `top` the first row above it.
//! - [`ZenoDrawingEngine`] executes the drawing primitives that carry text
//!   decorations, undercolor boxes and stroked outlines.

mod drawing;

pub use drawing::ZenoDrawingEngine;

use typa_core::compose::{GlyphBitmap, PixelMode};
use typa_core::path::PathCommand;
use typa_core::types::{AffineMatrix, Point};
use zeno::{Command, Fill, Format, Mask, Origin, Transform};

/// Coverage at or above this level sets a bit in mono output
const MONO_THRESHOLD: u8 = 128;

/// Output format of [`GlyphRasterizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    /// 256 coverage levels per pixel
    #[default]
    Gray,
    /// One bit per pixel, packed most significant bit first
    Mono,
}

/// Converts [`PathCommand`]s to zeno commands
pub(crate) fn to_zeno(commands: &[PathCommand]) -> Vec<Command> {
    let p = |pt: Point| zeno::Point::new(pt.x as f32, pt.y as f32);
    commands
        .iter()
        .map(|command| match *command {
            PathCommand::MoveTo(to) => Command::MoveTo(p(to)),
            PathCommand::LineTo(to) => Command::LineTo(p(to)),
            PathCommand::QuadTo(c, to) => Command::QuadTo(p(c), p(to)),
            PathCommand::CubicTo(c1, c2, to) => Command::CurveTo(p(c1), p(c2), p(to)),
            PathCommand::Close => Command::Close,
        })
        .collect()
}

/// Rasterizes glyph outlines under the text affine
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphRasterizer {
    mode: RasterMode,
}

impl GlyphRasterizer {
    pub fn new(mode: RasterMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RasterMode {
        self.mode
    }

    /// Renders `outline` transformed by the linear part of `matrix` and
    /// then moved to `origin`
    ///
    /// The outline and origin are y-up, as font outlines are. The matrix
    /// uses the drawing convention, so its shear terms are negated for the
    /// y-up space, the same way `(sx, -ry, -rx, sy)` maps a caption's
    /// rotation onto glyph space.
    pub fn rasterize(
        &self,
        outline: &[PathCommand],
        matrix: &AffineMatrix,
        origin: Point,
    ) -> GlyphBitmap {
        if typa_core::path::control_bounds(outline).is_none() {
            return self.empty_bitmap();
        }
        let commands = to_zeno(outline);
        let transform = Transform::new(
            matrix.sx as f32,
            -matrix.rx as f32,
            -matrix.ry as f32,
            matrix.sy as f32,
            origin.x as f32,
            origin.y as f32,
        );

        let (coverage, placement) = Mask::new(&commands)
            .style(Fill::NonZero)
            .format(Format::Alpha)
            .origin(Origin::BottomLeft)
            .transform(Some(transform))
            .render();

        if placement.width == 0 || placement.height == 0 {
            return self.empty_bitmap();
        }

        let width = placement.width as usize;
        let (pitch, buffer) = match self.mode {
            RasterMode::Gray => (width, coverage),
            RasterMode::Mono => {
                let pitch = width.div_ceil(8);
                (pitch, pack_mono(&coverage, width, pitch))
            },
        };

        // A sized-to-fit y-up mask reports its bottom edge as `top`; rows
        // are still stored top first
        GlyphBitmap {
            left: placement.left,
            top: placement.top + placement.height as i32,
            width: placement.width,
            rows: placement.height,
            pitch,
            mode: self.pixel_mode(),
            buffer,
        }
    }

    fn empty_bitmap(&self) -> GlyphBitmap {
        GlyphBitmap {
            left: 0,
            top: 0,
            width: 0,
            rows: 0,
            pitch: 0,
            mode: self.pixel_mode(),
            buffer: Vec::new(),
        }
    }

    fn pixel_mode(&self) -> PixelMode {
        match self.mode {
            RasterMode::Gray => PixelMode::Gray { num_grays: 256 },
            RasterMode::Mono => PixelMode::Mono,
        }
    }
}

/// Packs 8-bit coverage rows into 1-bit rows
fn pack_mono(coverage: &[u8], width: usize, pitch: usize) -> Vec<u8> {
    let rows = coverage.len() / width.max(1);
    let mut packed = vec![0u8; rows * pitch];
    for (y, row) in coverage.chunks_exact(width).enumerate() {
        for (x, &level) in row.iter().enumerate() {
            if level >= MONO_THRESHOLD {
                packed[y * pitch + (x >> 3)] |= 0x80 >> (x & 7);
            }
        }
    }
    packed
}
