// this_file: crates/typa/tests/annotate.rs

mod common;

use std::sync::Arc;

use common::{annotator, annotator_with_limits, mock_attrs};
use typa::core::config::Limits;
use typa::core::error::RenderError;
use typa::core::traits::LegacyFontBackend;
use typa::core::Pixel;
use typa::types::{Decoration, Direction, Gravity};
use typa::{Canvas, Color, Diagnostics, DrawAttributes, Paint, PixelBuffer, Point, TypeMetric};

fn color_at(canvas: &PixelBuffer, x: u32, y: u32) -> Color {
    canvas.get(x, y).unwrap().to_color()
}

/// Leftmost and rightmost columns holding a non-white pixel
fn ink_columns(canvas: &PixelBuffer) -> Option<(u32, u32)> {
    let mut columns: Option<(u32, u32)> = None;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if color_at(canvas, x, y) != Color::white() {
                columns = Some(match columns {
                    Some((first, last)) => (first.min(x), last.max(x)),
                    None => (x, x),
                });
            }
        }
    }
    columns
}

#[test]
fn test_empty_text_is_a_no_op() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(40, 20, Color::white());
    let before = canvas.clone();
    let mut diagnostics = Diagnostics::new();

    annotator
        .annotate(&mut canvas, &mock_attrs(""), &mut diagnostics)
        .unwrap();

    assert_eq!(canvas, before);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_text_is_invalid() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(40, 20, Color::white());
    let attrs = DrawAttributes::new().with_font("Mock Regular");

    let err = annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap_err();
    assert_eq!(err.tag(), "InvalidArgument");
}

#[test]
fn test_north_west_draws_glyph_boxes() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(100, 40, Color::white());
    let mut attrs = mock_attrs("AB");
    attrs.gravity = Gravity::NorthWest;
    let mut diagnostics = Diagnostics::new();

    annotator.annotate(&mut canvas, &attrs, &mut diagnostics).unwrap();

    // Baseline at the ascent (16); boxes cover x 1..9 and 11..19, rows 2..16
    assert_eq!(color_at(&canvas, 5, 10), Color::black());
    assert_eq!(color_at(&canvas, 15, 10), Color::black());
    assert_eq!(color_at(&canvas, 10, 10), Color::white());
    assert_eq!(color_at(&canvas, 5, 18), Color::white());
    assert_eq!(color_at(&canvas, 50, 10), Color::white());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_render_false_leaves_canvas_alone() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(100, 40, Color::white());
    let before = canvas.clone();
    let mut attrs = mock_attrs("AB\nCD");
    attrs.gravity = Gravity::NorthWest;
    attrs.render = false;
    attrs.undercolor = Color::rgb(255, 0, 0);
    attrs.stroke = Paint::Solid(Color::rgb(0, 0, 255));

    for decoration in [Decoration::Underline, Decoration::Overline, Decoration::LineThrough] {
        attrs.decorate = decoration;
        annotator
            .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(canvas, before, "{:?} touched the canvas", decoration);
    }
}

fn is_reddish(color: Color) -> bool {
    i32::from(color.r) - i32::from(color.g) > 60
}

#[test]
fn test_stroke_outlines_the_filled_glyph() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(40, 40, Color::white());
    let mut attrs = mock_attrs("A");
    attrs.gravity = Gravity::NorthWest;
    attrs.stroke = Paint::Solid(Color::rgb(255, 0, 0));

    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();

    // Fill covers x 1..9 and rows 2..16; the stroke follows the same edges
    assert_eq!(color_at(&canvas, 5, 10), Color::black());
    assert!((0..=2).any(|x| is_reddish(color_at(&canvas, x, 10))));
    assert!((8..=10).any(|x| is_reddish(color_at(&canvas, x, 10))));
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if is_reddish(color_at(&canvas, x, y)) {
                assert!(x <= 10 && (1..=17).contains(&y), "stray stroke at {},{}", x, y);
            }
        }
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

    fn acquire_row(&mut self, x: u32, y: u32, width: u32) -> typa::Result<Vec<Pixel>> {
        self.inner.acquire_row(x, y, width)
    }

    fn sync_row(&mut self, x: u32, y: u32, pixels: &[Pixel]) -> typa::Result<()> {
        if y == self.bad_row {
            return Err(RenderError::SyncFailed { y: i64::from(y) }.into());
        }
        self.inner.sync_row(x, y, pixels)
    }
}

#[test]
fn test_partial_write_skips_remaining_lines() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = FlakyCanvas {
        inner: PixelBuffer::new(60, 60, Color::white()),
        bad_row: 10,
    };
    let mut attrs = mock_attrs("AB\nCD");
    attrs.gravity = Gravity::NorthWest;
    let mut diagnostics = Diagnostics::new();

    let err = annotator
        .annotate(&mut canvas, &attrs, &mut diagnostics)
        .unwrap_err();

    assert_eq!(err.tag(), "UnableToAnnotateImage");
    assert!(diagnostics.contains("UnableToAnnotateImage"));
    // Both glyphs of the first line land apart from the bad row
    assert_eq!(canvas.inner.get(5, 5).unwrap().to_color(), Color::black());
    assert_eq!(canvas.inner.get(15, 5).unwrap().to_color(), Color::black());
    assert_eq!(canvas.inner.get(5, 10).unwrap().to_color(), Color::white());
    // The second line, baseline 36, is never drawn
    assert_eq!(canvas.inner.get(5, 30).unwrap().to_color(), Color::white());
}

#[test]
fn test_fallback_layout_keeps_logical_order_for_rtl() {
    let annotator = annotator(&["Mock"]);
    assert_eq!(annotator.shaper_name(), "none");
    let mut ltr = mock_attrs("AV");
    ltr.direction = Direction::LeftToRight;
    let mut rtl = ltr.clone();
    rtl.direction = Direction::RightToLeft;

    // The kerning pair is applied with its sign flipped
    let measure = |attrs: &DrawAttributes| {
        annotator
            .measure(attrs, &mut Diagnostics::new())
            .unwrap()
            .width
    };
    assert_eq!(measure(&ltr), 18.0);
    assert_eq!(measure(&rtl), 22.0);

    // No reordering: A still comes first, V is pushed right by the pair
    let mut canvas = PixelBuffer::new(60, 30, Color::white());
    rtl.gravity = Gravity::NorthWest;
    annotator
        .annotate(&mut canvas, &rtl, &mut Diagnostics::new())
        .unwrap();
    assert_eq!(color_at(&canvas, 5, 10), Color::black());
    assert_eq!(color_at(&canvas, 11, 10), Color::white());
    assert_eq!(color_at(&canvas, 15, 10), Color::black());
}

#[test]
fn test_transparent_paint_only_touches_alpha() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(100, 40, Color::white());
    let before = canvas.clone();
    let mut attrs = mock_attrs("AB");
    attrs.gravity = Gravity::NorthWest;
    attrs.fill = Paint::transparent();

    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();

    for (after, was) in canvas.pixels().iter().zip(before.pixels()) {
        assert_eq!((after.r, after.g, after.b), (was.r, was.g, was.b));
    }
    assert_eq!(canvas.get(5, 10).unwrap().a, 0.0);
    assert_eq!(canvas.get(50, 10).unwrap().a, 1.0);
}

#[test]
fn test_center_gravity_centers_ink() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(100, 40, Color::white());
    let mut attrs = mock_attrs("AB");
    attrs.gravity = Gravity::Center;

    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();

    let (first, last) = ink_columns(&canvas).unwrap();
    let middle = f64::from(first + last) / 2.0;
    assert!((middle - 50.0).abs() <= 2.0, "ink spans {}..{}", first, last);
}

#[test]
fn test_skipped_empty_lines_keep_their_slot() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(60, 80, Color::white());
    let mut attrs = mock_attrs("A\n\nB");
    attrs.gravity = Gravity::NorthWest;

    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();

    // Line pitch is 20: baselines at 16 and 56
    assert_eq!(color_at(&canvas, 5, 10), Color::black());
    assert_eq!(color_at(&canvas, 5, 30), Color::white());
    assert_eq!(color_at(&canvas, 5, 50), Color::black());
}

#[test]
fn test_undercolor_fills_line_box() {
    let annotator = annotator(&["Mock"]);
    let mut canvas = PixelBuffer::new(100, 40, Color::white());
    let mut attrs = mock_attrs("AB");
    attrs.gravity = Gravity::NorthWest;
    attrs.undercolor = Color::rgb(255, 0, 0);

    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();

    assert_eq!(color_at(&canvas, 10, 1), Color::rgb(255, 0, 0));
    assert_eq!(color_at(&canvas, 5, 10), Color::black());
    assert_eq!(color_at(&canvas, 30, 1), Color::white());
}

#[test]
fn test_decorations_land_where_expected() {
    let annotator = annotator(&["Mock"]);
    let inked = |decoration: Decoration, rows: std::ops::RangeInclusive<u32>| {
        let mut canvas = PixelBuffer::new(100, 40, Color::white());
        let mut attrs = mock_attrs("AB");
        attrs.gravity = Gravity::NorthWest;
        attrs.decorate = decoration;
        annotator
            .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
            .unwrap();
        // Column 10 sits between the two glyph boxes
        rows.into_iter()
            .any(|y| color_at(&canvas, 10, y) != Color::white())
    };

    assert!(!inked(Decoration::None, 0..=39));
    // Underline position is -2px: the line runs along y = 18
    assert!(inked(Decoration::Underline, 17..=18));
    assert!(inked(Decoration::LineThrough, 10..=11));
    assert!(!inked(Decoration::Underline, 0..=15));
}

#[test]
fn test_measure_is_idempotent_and_pure() {
    let annotator = annotator(&["Mock"]);
    let attrs = mock_attrs("AB");
    let mut diagnostics = Diagnostics::new();

    let first = annotator.measure(&attrs, &mut diagnostics).unwrap();
    let second = annotator.measure(&attrs, &mut diagnostics).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.width, 20.0);
    assert_eq!((first.ascent, first.descent), (16.0, -4.0));
    assert_eq!(first.pixels_per_em, Point::new(20.0, 20.0));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_measure_without_text_has_zero_width() {
    let annotator = annotator(&["Mock"]);
    let attrs = DrawAttributes::new().with_font("Mock Regular").with_pointsize(20.0);
    let metrics = annotator.measure(&attrs, &mut Diagnostics::new()).unwrap();
    assert_eq!(metrics.width, 0.0);
    assert_eq!(metrics.ascent, 16.0);
}

#[test]
fn test_kerning_pair_tightens_width() {
    let annotator = annotator(&["Mock"]);
    let metrics = annotator
        .measure(&mock_attrs("AV"), &mut Diagnostics::new())
        .unwrap();
    assert_eq!(metrics.width, 18.0);
}

#[test]
fn test_multiline_reports_widest_line() {
    let annotator = annotator(&["Mock"]);
    let block = annotator
        .measure_multiline(&mock_attrs("Hi\nBye"), &mut Diagnostics::new())
        .unwrap();

    assert_eq!(block.lines, 2);
    assert_eq!(block.metrics.width, 30.0);
    assert_eq!(block.metrics.height, 40.0);
}

#[test]
fn test_multiline_rejects_empty_text() {
    let annotator = annotator(&["Mock"]);
    let err = annotator
        .measure_multiline(&mock_attrs(""), &mut Diagnostics::new())
        .unwrap_err();
    assert_eq!(err.tag(), "InvalidArgument");
}

#[test]
fn test_multiline_respects_height_limit() {
    let annotator = annotator_with_limits(&["Mock"], Arc::new(Limits::new(1000.0, 30.0)));
    let mut diagnostics = Diagnostics::new();

    let err = annotator
        .measure_multiline(&mock_attrs("Hi\nBye"), &mut diagnostics)
        .unwrap_err();

    assert_eq!(err.tag(), "WidthOrHeightExceedsLimit");
    assert!(diagnostics.contains("WidthOrHeightExceedsLimit"));
}

#[test]
fn test_multiline_respects_width_limit() {
    let annotator = annotator_with_limits(&["Mock"], Arc::new(Limits::new(25.0, 1000.0)));
    let err = annotator
        .measure_multiline(&mock_attrs("Hi\nBye"), &mut Diagnostics::new())
        .unwrap_err();
    assert_eq!(err.tag(), "WidthOrHeightExceedsLimit");
}

#[test]
fn test_unknown_name_falls_back_with_warning() {
    let annotator = annotator(&["Sans"]);
    let mut diagnostics = Diagnostics::new();
    let attrs = mock_attrs("AB").with_font("No Such Face");

    let metrics = annotator.measure(&attrs, &mut diagnostics).unwrap();

    assert_eq!(metrics.width, 20.0);
    assert!(diagnostics.contains("UnableToReadFont"));
}

#[test]
fn test_family_list_walks_to_first_match() {
    let annotator = annotator(&["Mock", "Other"]);
    let mut attrs = mock_attrs("AB");
    attrs.font = Default::default();
    attrs.set_family("Missing, Other");
    let mut diagnostics = Diagnostics::new();

    annotator.measure(&attrs, &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty());
}

#[test]
fn test_no_faces_is_no_usable_font() {
    let annotator = annotator(&[]);
    let mut diagnostics = Diagnostics::new();

    let err = annotator
        .measure(&mock_attrs("AB"), &mut diagnostics)
        .unwrap_err();

    assert_eq!(err.tag(), "NoUsableFont");
    assert!(diagnostics.contains("NoUsableFont"));
}

#[test]
fn test_legacy_font_without_engine_warns() {
    let annotator = annotator(&["Mock"]);
    let mut diagnostics = Diagnostics::new();
    let attrs = mock_attrs("AB").with_font("-misc-fixed-medium-r-normal--13-*");

    let err = annotator.measure(&attrs, &mut diagnostics).unwrap_err();

    assert_eq!(err.tag(), "DelegateLibrarySupportNotBuiltIn");
    assert!(diagnostics.contains("DelegateLibrarySupportNotBuiltIn"));
}

/// Reports a fixed width and fills the pixel at the pen start
struct FixedEngine;

impl LegacyFontBackend for FixedEngine {
    fn name(&self) -> &str {
        "fixed"
    }

    fn measure(&mut self, _attrs: &DrawAttributes) -> typa::Result<TypeMetric> {
        Ok(TypeMetric {
            ascent: 10.0,
            descent: -3.0,
            width: 42.0,
            ..Default::default()
        })
    }

    fn render(
        &mut self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
    ) -> typa::Result<TypeMetric> {
        let mut row = canvas.acquire_row(offset.x as u32, offset.y as u32, 1)?;
        row[0] = Color::black().into();
        canvas.sync_row(offset.x as u32, offset.y as u32, &row)?;
        self.measure(attrs)
    }
}

#[test]
fn test_installed_legacy_engine_is_used() {
    let annotator = annotator(&["Mock"]);
    annotator
        .registry()
        .install_legacy_backend(Box::new(FixedEngine));
    let mut attrs = mock_attrs("AB").with_font("-misc-fixed-medium-r-normal--13-*");
    attrs.gravity = Gravity::NorthWest;

    let metrics = annotator.measure(&attrs, &mut Diagnostics::new()).unwrap();
    assert_eq!(metrics.width, 42.0);

    let mut canvas = PixelBuffer::new(60, 20, Color::white());
    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();
    assert_eq!(color_at(&canvas, 0, 10), Color::black());

    assert!(annotator.registry().shutdown().is_some());
}

#[test]
fn test_legacy_engine_not_asked_to_draw_without_render() {
    let annotator = annotator(&["Mock"]);
    annotator
        .registry()
        .install_legacy_backend(Box::new(FixedEngine));
    let mut attrs = mock_attrs("AB").with_font("-misc-fixed-medium-r-normal--13-*");
    attrs.gravity = Gravity::NorthWest;
    attrs.render = false;

    let mut canvas = PixelBuffer::new(60, 20, Color::white());
    let before = canvas.clone();
    annotator
        .annotate(&mut canvas, &attrs, &mut Diagnostics::new())
        .unwrap();
    assert_eq!(canvas, before);
}

#[cfg(feature = "postscript")]
mod postscript {
    use super::*;
    use image::GrayImage;
    use typa::core::types::Density;
    use typa::postscript::{Interpreter, PostscriptRenderer};

    /// Paints a 10x10 black block on a white page
    struct BlockInterpreter;

    impl Interpreter for BlockInterpreter {
        fn name(&self) -> &str {
            "block"
        }

        fn rasterize(
            &self,
            _program: &str,
            page: (u32, u32),
            _density: Density,
            _antialias: bool,
        ) -> typa::Result<GrayImage> {
            Ok(GrayImage::from_fn(page.0, page.1, |x, y| {
                if (2..12).contains(&x) && (3..13).contains(&y) {
                    image::Luma([0])
                } else {
                    image::Luma([255])
                }
            }))
        }
    }

    fn annotator() -> typa::Annotator {
        typa::Annotator::builder()
            .shaper(Arc::new(typa::shape_none::NoneShaper::new()))
            .resolver(Arc::new(common::MockResolver::new(&["Mock"])))
            .postscript(PostscriptRenderer::with_interpreter(Box::new(BlockInterpreter)))
            .build()
    }

    #[test]
    fn test_postscript_font_goes_to_interpreter() {
        let attrs = DrawAttributes::new()
            .with_text("Hi")
            .with_font("^Courier")
            .with_pointsize(10.0);
        let mut diagnostics = Diagnostics::new();

        let metrics = annotator().measure(&attrs, &mut diagnostics).unwrap();

        assert_eq!(metrics.ascent, 10.0);
        assert_eq!(metrics.width, 10.0);
        assert!(diagnostics.is_empty());
    }
}
