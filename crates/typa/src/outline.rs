//! The outline engine: shape, walk the pen, rasterize, composite
//!
//! A line is laid out once into [`LineLayout`]. Measuring stops there;
//! rendering then replays the placed glyphs onto the canvas. Pen positions
//! are kept in 26.6 fixed point throughout the walk and only converted to
//! pixels for the returned metrics.

use std::sync::Arc;

use typa_core::attrs::DrawAttributes;
use typa_core::canvas::{Canvas, Paint};
use typa_core::compose::{Blend, Compositor};
use typa_core::diagnostics::Diagnostics;
use typa_core::error::{Result, TypaError};
use typa_core::path::{control_bounds, PathCommand};
use typa_core::primitive::Primitive;
use typa_core::traits::{DrawingEngine, FontRef, Shaper};
use typa_core::types::{
    Bounds, FontEncoding, GlyphId, Hinting, LineJoin, Point, ShapingParams, ShapingResult,
};
use typa_core::{F26Dot6, TypeMetric};
use typa_render_zeno::{GlyphRasterizer, RasterMode};
use typa_shape_none::NoneShaper;

use crate::dispatch::OutlineFace;

/// One glyph ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub glyph_id: GlyphId,
    /// Pen origin plus the shaper's offsets, 26.6, y up
    pub origin: (F26Dot6, F26Dot6),
    /// Pen x before the shaper's offset
    pub pen_x: F26Dot6,
    /// Outline in pixels relative to `origin`, y up
    pub outline: Vec<PathCommand>,
}

/// A shaped and measured line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub glyphs: Vec<PlacedGlyph>,
    pub metrics: TypeMetric,
}

/// Pixels per em as the engine sets them, whole pixels on each axis
pub fn pixels_per_em(attrs: &DrawAttributes) -> (f64, f64) {
    let (x, y) = attrs.pixels_per_em();
    (x.round().max(0.0), y.round().max(0.0))
}

/// Outline loading mode for the attributes
pub fn hinting(attrs: &DrawAttributes) -> Hinting {
    if !attrs.hinting {
        Hinting::None
    } else if attrs.text_antialias {
        Hinting::Light
    } else {
        Hinting::Mono
    }
}

/// Face-wide metrics at the attributes' size, before any glyph is walked
pub fn face_metrics(font: &dyn FontRef, attrs: &DrawAttributes) -> TypeMetric {
    let (ppem_x, ppem_y) = pixels_per_em(attrs);
    let upem = f64::from(font.units_per_em().max(1));
    let face = font.face_metrics();
    let (scale_x, scale_y) = (ppem_x / upem, ppem_y / upem);
    let scaled = |value: f32, scale: f64| F26Dot6::from_f64_round(f64::from(value) * scale);

    let ascent = scaled(face.ascender, scale_y).ceil().to_f64();
    let descent = scaled(face.descender, scale_y).floor().to_f64();
    TypeMetric {
        pixels_per_em: Point::new(ppem_x, ppem_y),
        ascent,
        descent,
        width: 0.0,
        height: (f64::from(face.line_height) * scale_y).round(),
        max_advance: (f64::from(face.max_advance) * scale_x).round(),
        bounds: Bounds {
            x1: 0.0,
            y1: descent,
            x2: ascent + descent,
            y2: ascent + descent,
        },
        origin: Point::default(),
        underline_position: f64::from(face.underline_position) * scale_x,
        underline_thickness: f64::from(face.underline_thickness) * scale_x,
    }
}

/// Shapes `text`, falling back to per-character layout
///
/// Faces addressed through a legacy character map skip the shaper: it
/// only understands Unicode.
fn shape(
    shaper: &dyn Shaper,
    face: &OutlineFace,
    font: Arc<dyn FontRef>,
    text: &str,
    params: &ShapingParams,
) -> Result<ShapingResult> {
    if face.encoding == FontEncoding::Unicode {
        match shaper.shape(text, Arc::clone(&font), params) {
            Ok(shaped) => return Ok(shaped),
            Err(err) => {
                log::warn!(
                    "{} shaper failed on `{}`: {}; using per-character layout",
                    shaper.name(),
                    face.name,
                    err
                );
            },
        }
    }
    NoneShaper::new().shape(text, font, params)
}

/// Loads an outline at `ppem_x`, stretched vertically for unequal densities
fn load_outline(
    font: &dyn FontRef,
    glyph_id: GlyphId,
    ppem: (f64, f64),
    hinting: Hinting,
) -> Option<Vec<PathCommand>> {
    let outline = font.outline(glyph_id, ppem.0 as f32, hinting)?;
    if ppem.0 <= 0.0 || ppem.0 == ppem.1 {
        return Some(outline);
    }
    let stretch = ppem.1 / ppem.0;
    Some(
        outline
            .into_iter()
            .map(|cmd| cmd.map_points(|p| Point::new(p.x, p.y * stretch)))
            .collect(),
    )
}

/// Ink box of an outline in 26.6, all zero for a glyph without ink
fn ink_box(outline: &[PathCommand]) -> [F26Dot6; 4] {
    match control_bounds(outline) {
        Some((min, max)) => [
            F26Dot6::from_f64_round(min.x),
            F26Dot6::from_f64_round(min.y),
            F26Dot6::from_f64_round(max.x),
            F26Dot6::from_f64_round(max.y),
        ],
        None => [F26Dot6::ZERO; 4],
    }
}

/// Shapes and measures one line of text
pub fn layout_line(
    shaper: &dyn Shaper,
    face: &OutlineFace,
    attrs: &DrawAttributes,
    text: &str,
) -> Result<LineLayout> {
    let font = face.mapped_font();
    let mut metrics = face_metrics(font.as_ref(), attrs);
    if text.is_empty() {
        return Ok(LineLayout {
            glyphs: Vec::new(),
            metrics,
        });
    }

    let ppem = (metrics.pixels_per_em.x, metrics.pixels_per_em.y);
    let params = ShapingParams {
        ppem: ppem.0 as f32,
        point_size: Some(attrs.pointsize as f32),
        direction: attrs.direction,
        features: attrs
            .features
            .as_deref()
            .map(ShapingParams::parse_features)
            .unwrap_or_default(),
        language: None,
    };
    let shaped = shape(shaper, face, Arc::clone(&font), text, &params)?;
    log::debug!(
        "Laying out {} glyphs of `{}` in `{}` at {}ppem",
        shaped.glyphs.len(),
        text,
        face.name,
        ppem.0
    );

    let hinting = hinting(attrs);
    let policy = attrs.bounds_policy;
    let missing = font.glyph_id(' ').unwrap_or(0);
    let kerning = F26Dot6::from_f64(attrs.kerning);
    let interword = F26Dot6::from_f64(attrs.interword_spacing);

    let b = metrics.bounds;
    let mut bounds = [b.x1, b.y1, b.x2, b.y2].map(F26Dot6::from_f64_round);
    let mut pen_x = F26Dot6::ZERO;
    let pen_y = F26Dot6::ZERO;
    let mut width = F26Dot6::ZERO;
    let mut last_glyph: GlyphId = 0;
    let mut previous: Option<char> = None;
    let mut glyphs = Vec::with_capacity(shaped.glyphs.len());
    let count = shaped.glyphs.len();

    for (i, info) in shaped.glyphs.iter().enumerate() {
        let glyph_id = if info.index == 0 { missing } else { info.index };
        if glyph_id != 0 && last_glyph != 0 {
            pen_x += kerning;
        }
        let glyph_pen = pen_x;
        let origin = (pen_x + info.x_offset, pen_y + info.y_offset);

        let Some(outline) = load_outline(font.as_ref(), glyph_id, ppem, hinting) else {
            log::warn!("Glyph {} of `{}` has no loadable outline", glyph_id, face.name);
            continue;
        };

        let ink = ink_box(&outline);
        let first = i == 0;
        for (edge, value) in ink.into_iter().enumerate() {
            let better = if edge < 2 {
                value < bounds[edge]
            } else {
                value > bounds[edge]
            };
            if (first || better) && policy.admits(value) {
                bounds[edge] = value;
            }
        }

        let ch = text.get(info.cluster..).and_then(|rest| rest.chars().next());
        let is_space = ch.is_some_and(char::is_whitespace);
        let after_space = previous.is_some_and(char::is_whitespace);
        if !interword.is_zero() && is_space && !after_space {
            pen_x += interword;
        } else if i + 1 == count {
            pen_x += info.x_advance.max(ink[2]);
        } else {
            pen_x += info.x_advance;
        }
        width = width.max(pen_x);

        last_glyph = glyph_id;
        previous = ch;
        glyphs.push(PlacedGlyph {
            glyph_id,
            origin,
            pen_x: glyph_pen,
            outline,
        });
    }

    metrics.bounds = Bounds {
        x1: bounds[0].to_f64(),
        y1: bounds[1].to_f64(),
        x2: bounds[2].to_f64(),
        y2: bounds[3].to_f64(),
    };
    metrics.origin = Point::new(pen_x.to_f64(), pen_y.to_f64());
    metrics.width = width.ceil().to_f64();
    Ok(LineLayout { glyphs, metrics })
}

/// A glyph outline in drawing space relative to the line's baseline start
fn pen_frame_path(outline: &[PathCommand], origin: (F26Dot6, F26Dot6)) -> Vec<PathCommand> {
    let (ox, oy) = (origin.0.to_f64(), origin.1.to_f64());
    outline
        .iter()
        .map(|cmd| cmd.map_points(|p| Point::new(ox + p.x, -oy - p.y)))
        .collect()
}

/// Attributes for stroking glyph outlines at `offset`
fn stroke_attributes(attrs: &DrawAttributes, offset: Point) -> DrawAttributes {
    let mut stroke = attrs.clone();
    stroke.linejoin = LineJoin::Round;
    stroke.affine.tx = offset.x;
    stroke.affine.ty = offset.y;
    stroke.fill = Paint::transparent();
    stroke
}

/// Draws a laid-out line with its baseline start at `offset`
///
/// A failed glyph is recorded and the remaining glyphs are still filled,
/// but no outline is stroked after the first failure. The last failure is
/// returned once the line is done.
pub fn render_line(
    layout: &LineLayout,
    canvas: &mut dyn Canvas,
    attrs: &DrawAttributes,
    offset: Point,
    drawing: &dyn DrawingEngine,
    diagnostics: &mut Diagnostics,
) -> Result<TypeMetric> {
    if !attrs.render {
        return Ok(layout.metrics);
    }

    let mode = if attrs.text_antialias {
        RasterMode::Gray
    } else {
        RasterMode::Mono
    };
    let rasterizer = GlyphRasterizer::new(mode);
    let compositor = Compositor::new(attrs.text_antialias);
    let blend = if attrs.is_transparent_fill() {
        Blend::AlphaOnly
    } else {
        Blend::Fill(&attrs.fill)
    };
    let stroke = (!attrs.stroke.is_transparent()).then(|| stroke_attributes(attrs, offset));
    let a = &attrs.affine;

    let mut failure: Option<TypaError> = None;
    for glyph in &layout.glyphs {
        let (ox, oy) = (glyph.origin.0.to_f64(), glyph.origin.1.to_f64());
        let y = -a.rx * ox + a.sy * oy;
        let (bitmap, pen_shift) = match mode {
            RasterMode::Gray => {
                let origin = Point::new(a.sx * ox - a.ry * oy, y);
                (rasterizer.rasterize(&glyph.outline, a, origin), 0.0)
            },
            RasterMode::Mono => {
                // Mono glyphs are placed relative to the pen, which is added
                // back in pixels when compositing
                let shift = (glyph.origin.0 - glyph.pen_x).to_f64();
                let origin = Point::new(a.sx * shift - a.ry * oy, y);
                (rasterizer.rasterize(&glyph.outline, a, origin), glyph.pen_x.to_f64())
            },
        };

        if !bitmap.is_empty() {
            let at = Point::new(
                offset.x + f64::from(bitmap.left) + pen_shift,
                offset.y - f64::from(bitmap.top),
            );
            if let Err(err) = compositor.composite(canvas, &bitmap, at, blend) {
                diagnostics.error_from(&err);
                failure = Some(err);
            }
        }

        if failure.is_some() {
            continue;
        }
        if let Some(stroke) = &stroke {
            let path = pen_frame_path(&glyph.outline, glyph.origin);
            if path.is_empty() {
                continue;
            }
            let primitive = Primitive::Path(path).to_string();
            if let Err(err) = drawing.draw_primitive(canvas, stroke, &primitive) {
                diagnostics.error_from(&err);
                failure = Some(err);
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(layout.metrics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use typa_core::canvas::{Pixel, PixelBuffer};
    use typa_core::error::RenderError;
    use typa_core::types::{BoundsPolicy, Color, Density, FaceMetrics};
    use typa_render_zeno::ZenoDrawingEngine;

    /// 1000 upem, 500 advance, a 400x700 box per glyph, empty space
    struct BoxFont;

    impl FontRef for BoxFont {
        fn data(&self) -> &[u8] {
            &[]
        }
        fn units_per_em(&self) -> u16 {
            1000
        }
        fn glyph_id(&self, ch: char) -> Option<GlyphId> {
            match ch {
                ' ' => Some(1),
                'A'..='Z' | 'a'..='z' => Some(u32::from(ch)),
                _ => None,
            }
        }
        fn advance_width(&self, _glyph_id: GlyphId) -> f32 {
            500.0
        }
        fn face_metrics(&self) -> FaceMetrics {
            FaceMetrics {
                ascender: 800.0,
                descender: -200.0,
                line_height: 1200.0,
                max_advance: 500.0,
                underline_position: -100.0,
                underline_thickness: 50.0,
            }
        }
        fn outline(&self, glyph_id: GlyphId, ppem: f32, _: Hinting) -> Option<Vec<PathCommand>> {
            if glyph_id == 1 {
                return Some(Vec::new());
            }
            let s = f64::from(ppem) / 1000.0;
            let (x0, x1, y1) = (50.0 * s, 450.0 * s, 700.0 * s);
            Some(vec![
                PathCommand::MoveTo(Point::new(x0, 0.0)),
                PathCommand::LineTo(Point::new(x1, 0.0)),
                PathCommand::LineTo(Point::new(x1, y1)),
                PathCommand::LineTo(Point::new(x0, y1)),
                PathCommand::Close,
            ])
        }
    }

    fn face() -> OutlineFace {
        OutlineFace {
            font: Arc::new(BoxFont),
            encoding: FontEncoding::Unicode,
            name: "box".into(),
        }
    }

    fn attrs() -> DrawAttributes {
        DrawAttributes::new().with_pointsize(20.0)
    }

    #[test]
    fn test_face_metrics_are_grid_fitted() {
        let m = face_metrics(&BoxFont, &attrs());
        assert_eq!(m.pixels_per_em, Point::new(20.0, 20.0));
        assert_eq!((m.ascent, m.descent), (16.0, -4.0));
        assert_eq!(m.height, 24.0);
        assert_eq!(m.max_advance, 10.0);
        assert_eq!((m.underline_position, m.underline_thickness), (-2.0, 1.0));
        assert_eq!(m.bounds, Bounds { x1: 0.0, y1: -4.0, x2: 12.0, y2: 12.0 });
    }

    #[test]
    fn test_empty_text_has_face_metrics_only() {
        let layout = layout_line(&NoneShaper::new(), &face(), &attrs(), "").unwrap();
        assert!(layout.glyphs.is_empty());
        assert_eq!(layout.metrics.width, 0.0);
        assert_eq!(layout.metrics.ascent, 16.0);
    }

    #[test]
    fn test_pen_walk_advances_and_measures() {
        let layout = layout_line(&NoneShaper::new(), &face(), &attrs(), "AB").unwrap();
        assert_eq!(layout.glyphs.len(), 2);
        assert_eq!(layout.glyphs[1].origin.0, F26Dot6::from_int(10));
        assert_eq!(layout.metrics.width, 20.0);
        assert_eq!(layout.metrics.origin, Point::new(20.0, 0.0));
        assert_eq!(layout.metrics.bounds.x1, 1.0);
        assert_eq!(layout.metrics.bounds.x2, 9.0);
        assert_eq!(layout.metrics.bounds.y2, 14.0);
    }

    #[test]
    fn test_skip_zero_keeps_face_bottom() {
        // Boxes sit on the baseline: a zero bottom never replaces the
        // face descent unless bounds are exact
        let layout = layout_line(&NoneShaper::new(), &face(), &attrs(), "A").unwrap();
        assert_eq!(layout.metrics.bounds.y1, -4.0);

        let mut exact = attrs();
        exact.bounds_policy = BoundsPolicy::Exact;
        let layout = layout_line(&NoneShaper::new(), &face(), &exact, "A").unwrap();
        assert_eq!(layout.metrics.bounds.y1, 0.0);
    }

    #[test]
    fn test_kerning_and_interword_spacing() {
        let mut spaced = attrs();
        spaced.kerning = 2.0;
        let layout = layout_line(&NoneShaper::new(), &face(), &spaced, "AB").unwrap();
        assert_eq!(layout.metrics.width, 22.0);

        let mut words = attrs();
        words.interword_spacing = 30.0;
        let layout = layout_line(&NoneShaper::new(), &face(), &words, "A B").unwrap();
        assert_eq!(layout.glyphs[2].origin.0, F26Dot6::from_int(40));
    }

    #[test]
    fn test_missing_glyph_becomes_space() {
        let layout = layout_line(&NoneShaper::new(), &face(), &attrs(), "A?").unwrap();
        assert_eq!(layout.glyphs[1].glyph_id, 1);
        assert!(layout.glyphs[1].outline.is_empty());
    }

    #[test]
    fn test_render_paints_glyph_boxes() {
        let layout = layout_line(&NoneShaper::new(), &face(), &attrs(), "A").unwrap();
        let mut canvas = PixelBuffer::new(30, 30, Color::white());
        let mut diagnostics = Diagnostics::new();
        render_line(
            &layout,
            &mut canvas,
            &attrs(),
            Point::new(5.0, 20.0),
            &ZenoDrawingEngine::new(),
            &mut diagnostics,
        )
        .unwrap();

        let at = |x, y| canvas.get(x, y).unwrap_or_default().to_color();
        // Box spans x 1..9 and 14 rows above the baseline
        assert_eq!(at(10, 15), Color::black());
        assert_eq!(at(5, 15), Color::white());
        assert_eq!(at(10, 21), Color::white());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_render_false_touches_nothing() {
        let layout = layout_line(&NoneShaper::new(), &face(), &attrs(), "A").unwrap();
        let mut canvas = PixelBuffer::new(30, 30, Color::white());
        let before = canvas.clone();
        let mut metrics_only = attrs();
        metrics_only.render = false;
        render_line(
            &layout,
            &mut canvas,
            &metrics_only,
            Point::new(5.0, 20.0),
            &ZenoDrawingEngine::new(),
            &mut Diagnostics::new(),
        )
        .unwrap();
        assert_eq!(canvas, before);
    }

    /// Keeps every primitive it is asked to draw
    #[derive(Default)]
    struct RecordingEngine {
        primitives: Mutex<Vec<String>>,
    }

    impl DrawingEngine for RecordingEngine {
        fn draw_primitive(
            &self,
            _canvas: &mut dyn Canvas,
            _attrs: &DrawAttributes,
            primitive: &str,
        ) -> Result<()> {
            self.primitives.lock().push(primitive.to_string());
            Ok(())
        }
    }

    /// Refuses to sync one row
    struct FlakyCanvas {
        inner: PixelBuffer,
        bad_row: u32,
    }

    impl Canvas for FlakyCanvas {
        fn width(&self) -> u32 {
            self.inner.width()
        }
        fn height(&self) -> u32 {
            self.inner.height()
        }
        fn acquire_row(&mut self, x: u32, y: u32, width: u32) -> Result<Vec<Pixel>> {
            self.inner.acquire_row(x, y, width)
        }
        fn sync_row(&mut self, x: u32, y: u32, pixels: &[Pixel]) -> Result<()> {
            if y == self.bad_row {
                return Err(RenderError::SyncFailed { y: y as i64 }.into());
            }
            self.inner.sync_row(x, y, pixels)
        }
    }

    fn stroked() -> DrawAttributes {
        let mut a = attrs();
        a.stroke = Paint::Solid(Color::rgb(255, 0, 0));
        a
    }

    #[test]
    fn test_each_glyph_gets_one_stroke_path() {
        let layout = layout_line(&NoneShaper::new(), &face(), &stroked(), "A B").unwrap();
        let engine = RecordingEngine::default();
        let mut canvas = PixelBuffer::new(40, 30, Color::white());
        render_line(
            &layout,
            &mut canvas,
            &stroked(),
            Point::new(5.0, 20.0),
            &engine,
            &mut Diagnostics::new(),
        )
        .unwrap();

        // The space has no outline and is not stroked
        let primitives = engine.primitives.lock();
        assert_eq!(primitives.len(), 2);
        assert!(primitives.iter().all(|p| p.starts_with("path")));
    }

    #[test]
    fn test_failed_glyph_stops_stroking_but_keeps_filling() {
        let layout = layout_line(&NoneShaper::new(), &face(), &stroked(), "AB").unwrap();
        let engine = RecordingEngine::default();
        let mut canvas = FlakyCanvas {
            inner: PixelBuffer::new(40, 30, Color::white()),
            bad_row: 15,
        };
        let mut diagnostics = Diagnostics::new();

        let err = render_line(
            &layout,
            &mut canvas,
            &stroked(),
            Point::new(5.0, 20.0),
            &engine,
            &mut diagnostics,
        )
        .unwrap_err();

        assert_eq!(err.tag(), "UnableToAnnotateImage");
        assert!(engine.primitives.lock().is_empty());
        // B is still filled around the row that failed
        let at = |x, y| canvas.inner.get(x, y).unwrap_or_default().to_color();
        assert_eq!(at(20, 10), Color::black());
        assert_eq!(at(20, 15), Color::white());
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_mono_pen_keeps_fractional_position() {
        let mut mono = attrs();
        mono.text_antialias = false;
        mono.kerning = 0.75;
        let layout = layout_line(&NoneShaper::new(), &face(), &mono, "AB").unwrap();
        assert_eq!(layout.glyphs[1].pen_x, F26Dot6::from_raw(688));
        let mut canvas = PixelBuffer::new(40, 30, Color::white());
        render_line(
            &layout,
            &mut canvas,
            &mono,
            Point::new(5.0, 20.0),
            &ZenoDrawingEngine::new(),
            &mut Diagnostics::new(),
        )
        .unwrap();

        // B starts at 5 + 1 + 10.75, which lands on column 17
        let at = |x, y| canvas.get(x, y).unwrap_or_default().to_color();
        assert_eq!(at(13, 15), Color::black());
        assert_eq!(at(16, 15), Color::white());
        assert_eq!(at(17, 15), Color::black());
        assert_eq!(at(24, 15), Color::black());
        assert_eq!(at(25, 15), Color::white());
    }

    /// Shapes per character and keeps the parameters it was given
    #[derive(Default)]
    struct SpyShaper {
        seen: Mutex<Option<ShapingParams>>,
    }

    impl Shaper for SpyShaper {
        fn name(&self) -> &'static str {
            "spy"
        }
        fn supports_bidi(&self) -> bool {
            false
        }
        fn shape(
            &self,
            text: &str,
            font: Arc<dyn FontRef>,
            params: &ShapingParams,
        ) -> Result<ShapingResult> {
            *self.seen.lock() = Some(params.clone());
            NoneShaper::new().shape(text, font, params)
        }
    }

    #[test]
    fn test_shaper_gets_points_and_pixels_apart() {
        let mut dense = attrs();
        dense.density = Some(Density { x: 144.0, y: 144.0 });
        let shaper = SpyShaper::default();
        layout_line(&shaper, &face(), &dense, "A").unwrap();

        let seen = shaper.seen.lock().clone().unwrap();
        assert_eq!(seen.ppem, 40.0);
        assert_eq!(seen.point_size, Some(20.0));
    }

    #[test]
    fn test_stroke_path_is_in_pen_frame() {
        let outline = vec![PathCommand::MoveTo(Point::new(1.0, 2.0))];
        let path = pen_frame_path(&outline, (F26Dot6::from_int(10), F26Dot6::ZERO));
        assert_eq!(path, vec![PathCommand::MoveTo(Point::new(11.0, -2.0))]);
    }

    #[test]
    fn test_hinting_follows_antialias() {
        let mut a = attrs();
        assert_eq!(hinting(&a), Hinting::Light);
        a.text_antialias = false;
        assert_eq!(hinting(&a), Hinting::Mono);
        a.hinting = false;
        assert_eq!(hinting(&a), Hinting::None);
    }
}
