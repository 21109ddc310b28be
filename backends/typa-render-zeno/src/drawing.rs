//! Primitive execution on top of zeno masks
//!
//! Each primitive becomes one or two coverage masks (fill, then stroke)
//! that go through the same compositor as glyphs, so patterns, alpha and
//! partial-write reporting behave identically for text and decorations.

use typa_core::attrs::DrawAttributes;
use typa_core::canvas::{Canvas, Paint};
use typa_core::compose::{Blend, Compositor, GlyphBitmap, PixelMode};
use typa_core::error::Result;
use typa_core::path::PathCommand;
use typa_core::primitive::Primitive;
use typa_core::traits::DrawingEngine;
use typa_core::types::{AffineMatrix, Color, LineJoin, Point};
use zeno::{Cap, Command, Fill, Format, Join, Mask, Origin, Stroke, Style, Transform};

use crate::to_zeno;

/// A [`DrawingEngine`] rasterizing primitives with zeno
#[derive(Debug, Clone, Copy)]
pub struct ZenoDrawingEngine {
    antialias: bool,
}

impl ZenoDrawingEngine {
    pub fn new() -> Self {
        Self { antialias: true }
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    /// Fills the path with `attrs.fill`, then strokes it with `attrs.stroke`
    fn fill_and_stroke(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        commands: &[Command],
    ) -> Result<()> {
        let transform = affine_transform(&attrs.affine);
        if !attrs.fill.is_transparent() {
            self.paint(
                canvas,
                commands,
                Style::Fill(Fill::NonZero),
                transform,
                &attrs.fill,
            )?;
        }
        if !attrs.stroke.is_transparent() && attrs.stroke_width > 0.0 {
            let mut stroke = Stroke::new(attrs.stroke_width as f32);
            stroke.join(join(attrs.linejoin));
            self.paint(canvas, commands, stroke.into(), transform, &attrs.stroke)?;
        }
        Ok(())
    }

    fn paint(
        &self,
        canvas: &mut dyn Canvas,
        commands: &[Command],
        style: Style<'_>,
        transform: Transform,
        paint: &Paint,
    ) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let (coverage, placement) = Mask::new(commands)
            .style(style)
            .format(Format::Alpha)
            .origin(Origin::TopLeft)
            .transform(Some(transform))
            .render();
        if placement.width == 0 || placement.height == 0 {
            return Ok(());
        }

        let bitmap = GlyphBitmap {
            left: placement.left,
            top: placement.top,
            width: placement.width,
            rows: placement.height,
            pitch: placement.width as usize,
            mode: PixelMode::Gray { num_grays: 256 },
            buffer: coverage,
        };
        let at = Point::new(f64::from(placement.left), f64::from(placement.top));
        Compositor::new(self.antialias).composite(canvas, &bitmap, at, Blend::Fill(paint))
    }
}

impl Default for ZenoDrawingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The drawing affine `x' = sx*x + ry*y + tx`, `y' = rx*x + sy*y + ty`
fn affine_transform(m: &AffineMatrix) -> Transform {
    Transform::new(
        m.sx as f32,
        m.rx as f32,
        m.ry as f32,
        m.sy as f32,
        m.tx as f32,
        m.ty as f32,
    )
}

fn join(linejoin: LineJoin) -> Join {
    match linejoin {
        LineJoin::Miter => Join::Miter,
        LineJoin::Round => Join::Round,
        LineJoin::Bevel => Join::Bevel,
    }
}

fn rectangle(from: Point, to: Point) -> Vec<PathCommand> {
    vec![
        PathCommand::MoveTo(from),
        PathCommand::LineTo(Point::new(to.x, from.y)),
        PathCommand::LineTo(to),
        PathCommand::LineTo(Point::new(from.x, to.y)),
        PathCommand::Close,
    ]
}

impl DrawingEngine for ZenoDrawingEngine {
    fn draw_primitive(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        primitive: &str,
    ) -> Result<()> {
        let primitive: Primitive = primitive.parse()?;
        log::debug!("ZenoDrawingEngine: {}", primitive);

        match primitive {
            Primitive::Path(commands) => {
                self.fill_and_stroke(canvas, attrs, &to_zeno(&commands))
            },
            Primitive::Rectangle { from, to } => {
                self.fill_and_stroke(canvas, attrs, &to_zeno(&rectangle(from, to)))
            },
            Primitive::Line {
                stroke,
                stroke_width,
                from,
                to,
            } => {
                if stroke == Color::transparent() || stroke_width <= 0.0 {
                    return Ok(());
                }
                let commands = to_zeno(&[PathCommand::MoveTo(from), PathCommand::LineTo(to)]);
                let mut style = Stroke::new(stroke_width as f32);
                style.cap(Cap::Butt);
                self.paint(
                    canvas,
                    &commands,
                    style.into(),
                    affine_transform(&attrs.affine),
                    &Paint::Solid(stroke),
                )
            },
        }
    }
}
