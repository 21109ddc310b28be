//! PostScript fallback: text drawn by an external interpreter
//!
//! When the font reference names a PostScript font (`^Name`), the text is
//! written out as a tiny one-page program, rasterized by an interpreter
//! (Ghostscript by default) and composited back as an alpha mask in the
//! fill color. Metrics are synthesized from the point size since the
//! interpreter only hands back pixels.

mod interpreter;
mod program;

pub use interpreter::{Ghostscript, Interpreter};
pub use program::{build as build_program, escape_text, Program, DEFAULT_FONT};

use image::GrayImage;
use typa_core::attrs::DrawAttributes;
use typa_core::canvas::Canvas;
use typa_core::compose::{Blend, Compositor, GlyphBitmap, PixelMode};
use typa_core::error::{Result, TypaError};
use typa_core::types::{Bounds, Density, Point, TypeMetric};

/// Renders text through a PostScript interpreter
pub struct PostscriptRenderer {
    interpreter: Box<dyn Interpreter>,
}

impl PostscriptRenderer {
    /// A renderer using the configured Ghostscript
    pub fn new() -> Self {
        Self::with_interpreter(Box::new(Ghostscript::from_env()))
    }

    pub fn with_interpreter(interpreter: Box<dyn Interpreter>) -> Self {
        Self { interpreter }
    }

    pub fn interpreter_name(&self) -> &str {
        self.interpreter.name()
    }

    /// Metrics of `attrs.text` without touching any canvas
    pub fn measure(&self, attrs: &DrawAttributes) -> Result<TypeMetric> {
        let (_, metrics) = self.rasterize(attrs)?;
        Ok(metrics)
    }

    /// Draws `attrs.text` with its baseline start at `offset`
    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
    ) -> Result<TypeMetric> {
        let (mask, metrics) = self.rasterize(attrs)?;
        if !attrs.render || attrs.fill.is_transparent() {
            return Ok(metrics);
        }

        let (width, rows) = mask.dimensions();
        let bitmap = GlyphBitmap {
            left: 0,
            top: 0,
            width,
            rows,
            pitch: width as usize,
            mode: PixelMode::Gray { num_grays: 256 },
            buffer: mask.into_raw(),
        };
        let at = Point::new(
            (offset.x - 0.5).ceil(),
            (offset.y - (metrics.ascent + metrics.descent) - 0.5).ceil(),
        );
        Compositor::new(attrs.text_antialias).composite(
            canvas,
            &bitmap,
            at,
            Blend::Fill(&attrs.fill),
        )?;
        Ok(metrics)
    }

    /// Runs the program and returns the ink mask with its metrics
    fn rasterize(&self, attrs: &DrawAttributes) -> Result<(GrayImage, TypeMetric)> {
        let text = attrs
            .text
            .as_deref()
            .ok_or_else(|| TypaError::InvalidAttribute("text is not set".to_string()))?;
        let program = program::build(attrs, text);
        let resolution = attrs.resolution();
        log::debug!(
            "PostScript text `{}` in {} at {}pt via {}",
            text,
            program::font_name(attrs),
            attrs.pointsize,
            self.interpreter.name()
        );

        let mut page = self.interpreter.rasterize(
            &program.source,
            program.page_size(),
            resolution,
            attrs.text_antialias,
        )?;
        image::imageops::invert(&mut page);

        let expansion = attrs.affine.expansion();
        let mask = if program.identity {
            crop_to_ink(&page, &program, attrs.pointsize * expansion, resolution)
        } else {
            page
        };

        let ppem = resolution.y / Density::DEFAULT_RESOLUTION * expansion * attrs.pointsize;
        let descent = ppem / -5.0;
        let width = if expansion > 0.0 {
            f64::from(mask.width()) / expansion
        } else {
            0.0
        };
        let metrics = TypeMetric {
            pixels_per_em: Point::new(ppem, ppem),
            ascent: ppem,
            descent,
            width,
            height: 1.152 * ppem,
            max_advance: ppem,
            bounds: Bounds {
                x1: 0.0,
                y1: descent,
                x2: ppem + descent,
                y2: ppem + descent,
            },
            origin: Point::default(),
            underline_position: -2.0,
            underline_thickness: 1.0,
        };
        Ok((mask, metrics))
    }
}

impl Default for PostscriptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Crops an upright page to the ink columns and one line of text rows
fn crop_to_ink(page: &GrayImage, program: &Program, size: f64, resolution: Density) -> GrayImage {
    let Some((x0, x1)) = ink_columns(page) else {
        return GrayImage::new(0, 0);
    };
    let scale = resolution.y / Density::DEFAULT_RESOLUTION;
    let height = (scale * size + 0.5).max(0.0) as i64;
    let y = (scale * program.extent.y / 8.0 - 0.5).ceil() as i64;

    let top = y.clamp(0, i64::from(page.height()));
    let bottom = (y + height).clamp(top, i64::from(page.height()));
    image::imageops::crop_imm(page, x0, top as u32, x1 - x0, (bottom - top) as u32).to_image()
}

/// First and one-past-last columns holding any ink
fn ink_columns(page: &GrayImage) -> Option<(u32, u32)> {
    let mut columns: Option<(u32, u32)> = None;
    for (x, _, pixel) in page.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        columns = Some(match columns {
            Some((first, last)) => (first.min(x), last.max(x + 1)),
            None => (x, x + 1),
        });
    }
    columns
}
