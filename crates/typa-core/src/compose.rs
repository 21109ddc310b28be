//! Blending glyph coverage into a canvas
//!
//! Coverage comes in as a grayscale or 1-bit bitmap. Each row lands on the
//! canvas through one acquire/sync pair. A row that fails to sync is
//! counted and skipped; the rest of the bitmap is still written.

use crate::canvas::{Canvas, Paint, Pixel};
use crate::error::{RenderError, Result};
use crate::types::Point;

/// How coverage values are stored in a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    /// One byte per pixel, `0..num_grays`
    Gray { num_grays: u16 },
    /// One bit per pixel, most significant bit first
    Mono,
}

/// A rasterized glyph, positioned relative to its pen origin
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    /// Columns from the origin to the first bitmap column
    pub left: i32,
    /// Rows from the origin up to the first bitmap row
    pub top: i32,
    pub width: u32,
    pub rows: u32,
    /// Bytes per row
    pub pitch: usize,
    pub mode: PixelMode,
    pub buffer: Vec<u8>,
}

impl GlyphBitmap {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }

    /// Coverage at bitmap pixel `(x, y)` in `0.0..=1.0`
    pub fn coverage(&self, x: u32, y: u32) -> f64 {
        let row = y as usize * self.pitch;
        match self.mode {
            PixelMode::Gray { num_grays } => {
                let level = self.buffer.get(row + x as usize).copied().unwrap_or(0);
                level as f64 / (num_grays.max(2) - 1) as f64
            },
            PixelMode::Mono => {
                let byte = self.buffer.get(row + (x >> 3) as usize).copied().unwrap_or(0);
                if byte & (1 << (!x & 7)) == 0 {
                    0.0
                } else {
                    1.0
                }
            },
        }
    }
}

/// What a glyph's coverage does to the destination
#[derive(Debug, Clone, Copy)]
pub enum Blend<'a> {
    /// Paint composited over the destination
    Fill(&'a Paint),
    /// Only destination alpha changes; builds a text mask
    AlphaOnly,
}

/// Writes glyph bitmaps into a canvas
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    antialias: bool,
}

impl Compositor {
    pub fn new(antialias: bool) -> Self {
        Self { antialias }
    }

    /// Blends `bitmap` with its top-left pixel at `point`
    ///
    /// Returns `RenderError::PartialWrite` if any row failed to sync.
    pub fn composite(
        &self,
        canvas: &mut dyn Canvas,
        bitmap: &GlyphBitmap,
        point: Point,
        blend: Blend<'_>,
    ) -> Result<()> {
        let canvas_width = canvas.width() as i64;
        let canvas_height = canvas.height() as i64;
        let mut failed_rows = 0;

        let x_start = (point.x - 0.5).ceil() as i64;
        let first = x_start.max(0);
        let last = (x_start + bitmap.width as i64).min(canvas_width);
        if first >= last {
            return Ok(());
        }

        for y in 0..bitmap.rows {
            let y_offset = (point.y + y as f64 - 0.5).ceil() as i64;
            if y_offset < 0 || y_offset >= canvas_height {
                continue;
            }
            let window = canvas.acquire_row(first as u32, y_offset as u32, (last - first) as u32);
            let mut row = match window {
                Ok(row) => row,
                Err(err) => {
                    log::debug!("acquire of row {} failed: {}", y_offset, err);
                    failed_rows += 1;
                    continue;
                },
            };

            for (i, dst) in row.iter_mut().enumerate() {
                let x_offset = first + i as i64;
                let x = (x_offset - x_start) as u32;
                let mut opacity = bitmap.coverage(x, y);
                if !self.antialias {
                    opacity = if opacity >= 0.5 { 1.0 } else { 0.0 };
                }
                match blend {
                    Blend::Fill(paint) => {
                        let color = paint.sample(x_offset, y_offset);
                        *dst = over(color, opacity * color.a as f64, *dst);
                    },
                    Blend::AlphaOnly => {
                        dst.a = mask_alpha(opacity, *dst) as f32;
                    },
                }
            }

            if let Err(err) = canvas.sync_row(first as u32, y_offset as u32, &row) {
                log::debug!("sync of row {} failed: {}", y_offset, err);
                failed_rows += 1;
            }
        }

        if failed_rows > 0 {
            return Err(RenderError::PartialWrite { rows: failed_rows }.into());
        }
        Ok(())
    }
}

/// Premultiplied source-over with source alpha `sa`
pub fn over(src: Pixel, sa: f64, dst: Pixel) -> Pixel {
    let da = dst.a as f64;
    let gamma = sa + da - sa * da;
    if gamma <= f64::EPSILON {
        return dst;
    }
    let blend = |s: f32, d: f32| ((sa * s as f64 + da * d as f64 * (1.0 - sa)) / gamma) as f32;
    Pixel {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        a: gamma.clamp(0.0, 1.0) as f32,
    }
}

/// Alpha for mask building: the complement of the union of coverage and
/// destination transparency
fn mask_alpha(coverage: f64, dst: Pixel) -> f64 {
    let sa = coverage;
    let da = 1.0 - dst.a as f64;
    1.0 - (sa + da - sa * da).clamp(0.0, 1.0)
}
