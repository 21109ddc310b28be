//! The annotator: multi-line text onto a canvas
//!
//! Each call splits the text into lines, measures them, places them with
//! the gravity table, then draws the undercolor box, decorations and glyphs
//! in that order. Which engine draws the glyphs is decided per call by the
//! font reference.

use std::sync::Arc;

use typa_core::attrs::DrawAttributes;
use typa_core::canvas::{Canvas, Paint};
use typa_core::config;
use typa_core::diagnostics::Diagnostics;
use typa_core::error::{ResourceLimitError, Result, TypaError};
use typa_core::primitive::Primitive;
use typa_core::traits::{DrawingEngine, FontResolver, LegacyFontBackend, ResourceLimits, Shaper};
use typa_core::types::{Decoration, Gravity, Point, ResourceKind};
use typa_core::TypeMetric;
use typa_render_zeno::ZenoDrawingEngine;

use crate::dispatch::{self, Backend};
use crate::layout::{self, Frame, LineSlot};
use crate::outline::{self, LineLayout};
use crate::registry::BackendRegistry;

#[cfg(feature = "postscript")]
use typa_render_ps::PostscriptRenderer;

/// Widest-line metrics of a text block and its line count
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MultilineMetrics {
    /// The widest line, with `height` covering the whole block
    pub metrics: TypeMetric,
    pub lines: usize,
}

/// Splits text into lines on `\n`, dropping a trailing `\r` from each
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// A line ready for its engine; outline fonts come already laid out
enum PreparedLine {
    Outline(LineLayout),
    Legacy,
    Postscript,
}

/// Measures and draws text through the configured engines
///
/// ```ignore
/// use typa::{Annotator, DrawAttributes, Diagnostics, PixelBuffer, Color};
///
/// let annotator = Annotator::builder().build();
/// let mut canvas = PixelBuffer::new(200, 50, Color::white());
/// let mut attrs = DrawAttributes::new().with_text("Hello").with_font("DejaVu Sans");
/// attrs.gravity = "center".parse()?;
/// annotator.annotate(&mut canvas, &attrs, &mut Diagnostics::new())?;
/// ```
pub struct Annotator {
    shaper: Arc<dyn Shaper>,
    resolver: Option<Arc<dyn FontResolver>>,
    drawing: Arc<dyn DrawingEngine>,
    limits: Arc<dyn ResourceLimits>,
    registry: Arc<BackendRegistry>,
    #[cfg(feature = "postscript")]
    postscript: Arc<PostscriptRenderer>,
}

impl Annotator {
    pub fn builder() -> AnnotatorBuilder {
        AnnotatorBuilder::new()
    }

    /// An annotator with every default collaborator
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    pub fn shaper_name(&self) -> &'static str {
        self.shaper.name()
    }

    /// Draws `attrs.text` onto `canvas`
    ///
    /// Empty text succeeds without touching the canvas, as does any text
    /// with `render` off. The first line that
    /// fails to render ends the call with its error; lines already drawn
    /// stay drawn.
    pub fn annotate(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let text = attrs
            .text
            .as_deref()
            .ok_or_else(|| TypaError::InvalidAttribute("text is not set".to_string()))?;
        if text.is_empty() {
            return Ok(());
        }

        let lines = split_lines(text);
        let frame = Frame::new(attrs.geometry.as_ref(), (canvas.width(), canvas.height()));
        let mut line_attrs = attrs.clone();
        let mut metrics = TypeMetric::default();

        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            line_attrs.set_text(*line);

            if metrics.width == 0.0 || attrs.gravity != Gravity::NorthWest {
                metrics = self.measure_line(&line_attrs.for_metrics(), diagnostics)?;
            }
            let height = metrics.line_height(attrs.interline_spacing);
            let slot = LineSlot {
                index,
                count: lines.len(),
            };
            let offset = layout::line_offset(
                &frame,
                &attrs.affine,
                attrs.gravity,
                attrs.align,
                &metrics,
                height,
                slot,
            );
            log::debug!(
                "Line {} `{}` at ({}, {}), {}px wide",
                index,
                line,
                offset.x,
                offset.y,
                metrics.width
            );

            if attrs.render {
                if !attrs.undercolor.is_transparent() {
                    self.draw_undercolor(canvas, attrs, offset, &metrics, height, diagnostics);
                }
                if matches!(attrs.decorate, Decoration::Overline | Decoration::Underline) {
                    self.draw_decoration(canvas, attrs, offset, &metrics, height, diagnostics);
                }
            }

            metrics = self.render_line(canvas, &line_attrs, offset, diagnostics)?;

            if attrs.render && attrs.decorate == Decoration::LineThrough {
                self.draw_decoration(canvas, attrs, offset, &metrics, height, diagnostics);
            }
        }
        Ok(())
    }

    /// Single-line metrics of `attrs.text`; nothing is drawn
    pub fn measure(
        &self,
        attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        let mut metrics_attrs = attrs.for_metrics();
        metrics_attrs.text.get_or_insert_with(String::new);
        let metrics = self.measure_line(&metrics_attrs, diagnostics)?;
        log::debug!(
            "Metrics: text: {}; width: {}; height: {}; ascent: {}; descent: {}; \
             max advance: {}; bounds: {},{} {},{}; origin: {},{}; pixels per em: {},{}; \
             underline position: {}; underline thickness: {}",
            metrics_attrs.text.as_deref().unwrap_or_default(),
            metrics.width,
            metrics.height,
            metrics.ascent,
            metrics.descent,
            metrics.max_advance,
            metrics.bounds.x1,
            metrics.bounds.y1,
            metrics.bounds.x2,
            metrics.bounds.y2,
            metrics.origin.x,
            metrics.origin.y,
            metrics.pixels_per_em.x,
            metrics.pixels_per_em.y,
            metrics.underline_position,
            metrics.underline_thickness
        );
        Ok(metrics)
    }

    /// Widest-line metrics and total height of a multi-line block
    ///
    /// The block height is reserved against the resource limits before any
    /// further line is measured, and each line's width as it comes.
    pub fn measure_multiline(
        &self,
        attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<MultilineMetrics> {
        let text = attrs.text.as_deref().unwrap_or_default();
        if text.is_empty() {
            return Err(TypaError::InvalidAttribute("text is empty".to_string()));
        }

        let lines = split_lines(text);
        let mut line_attrs = attrs.for_metrics();
        line_attrs.set_text(lines[0]);
        let mut widest = self.measure_line(&line_attrs, diagnostics)?;

        let count = lines.len() as f64;
        let height = count * (widest.ascent - widest.descent + 0.5).trunc()
            + (count - 1.0) * attrs.interline_spacing;
        self.reserve(ResourceKind::Height, height.abs(), diagnostics)?;

        for line in &lines[1..] {
            line_attrs.set_text(*line);
            let metrics = self.measure_line(&line_attrs, diagnostics)?;
            self.reserve(ResourceKind::Width, metrics.width.abs(), diagnostics)?;
            if metrics.width > widest.width {
                widest = metrics;
            }
        }

        widest.height = height;
        Ok(MultilineMetrics {
            metrics: widest,
            lines: lines.len(),
        })
    }

    fn reserve(&self, kind: ResourceKind, amount: f64, diagnostics: &mut Diagnostics) -> Result<()> {
        if self.limits.try_reserve(kind, amount) {
            return Ok(());
        }
        let err: TypaError = ResourceLimitError::WidthOrHeightExceedsLimit {
            kind: kind.as_str(),
            amount,
        }
        .into();
        diagnostics.warn_from(&err);
        Err(err)
    }

    /// Resolves the engine for a line and lays it out when it is an
    /// outline font
    fn prepare_line(
        &self,
        attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<PreparedLine> {
        let text = attrs.text.as_deref().unwrap_or_default();
        Ok(
            match dispatch::resolve_backend(self.resolver.as_deref(), attrs, diagnostics)? {
                Backend::Outline(face) => PreparedLine::Outline(outline::layout_line(
                    self.shaper.as_ref(),
                    &face,
                    attrs,
                    text,
                )?),
                Backend::Legacy => PreparedLine::Legacy,
                Backend::Postscript => PreparedLine::Postscript,
            },
        )
    }

    /// Metrics of one line through the engine the font picks
    pub(crate) fn measure_line(
        &self,
        attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        match self.prepare_line(attrs, diagnostics)? {
            PreparedLine::Outline(line) => Ok(line.metrics),
            PreparedLine::Legacy => self.with_legacy(diagnostics, |engine| engine.measure(attrs)),
            PreparedLine::Postscript => self.measure_postscript(attrs, diagnostics),
        }
    }

    /// Draws one line with its baseline start at `offset`
    fn render_line(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        match self.prepare_line(attrs, diagnostics)? {
            PreparedLine::Outline(line) => outline::render_line(
                &line,
                canvas,
                attrs,
                offset,
                self.drawing.as_ref(),
                diagnostics,
            ),
            PreparedLine::Legacy if !attrs.render => {
                self.with_legacy(diagnostics, |engine| engine.measure(attrs))
            },
            PreparedLine::Legacy => {
                self.with_legacy(diagnostics, |engine| engine.render(canvas, attrs, offset))
            },
            PreparedLine::Postscript => self.render_postscript(canvas, attrs, offset, diagnostics),
        }
    }

    fn with_legacy<R>(
        &self,
        diagnostics: &mut Diagnostics,
        f: impl FnOnce(&mut dyn LegacyFontBackend) -> Result<R>,
    ) -> Result<R> {
        self.registry.with_legacy(f).map_err(|err| {
            diagnostics.warn_from(&err);
            err
        })
    }

    #[cfg(feature = "postscript")]
    fn measure_postscript(
        &self,
        attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        self.postscript.measure(attrs).map_err(|err| {
            diagnostics.warn_from(&err);
            err
        })
    }

    #[cfg(feature = "postscript")]
    fn render_postscript(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        self.postscript.render(canvas, attrs, offset).map_err(|err| {
            diagnostics.warn_from(&err);
            err
        })
    }

    #[cfg(not(feature = "postscript"))]
    fn measure_postscript(
        &self,
        _attrs: &DrawAttributes,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        let err: TypaError =
            typa_core::error::RenderError::BackendUnavailable("PostScript interpreter".into())
                .into();
        diagnostics.warn_from(&err);
        Err(err)
    }

    #[cfg(not(feature = "postscript"))]
    fn render_postscript(
        &self,
        _canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        _offset: Point,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeMetric> {
        self.measure_postscript(attrs, diagnostics)
    }

    /// Fills the box behind a line with the undercolor
    fn draw_undercolor(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
        metrics: &TypeMetric,
        height: f64,
        diagnostics: &mut Diagnostics,
    ) {
        let mut boxed = DrawAttributes::new();
        boxed.fill = Paint::Solid(attrs.undercolor);
        boxed.affine = attrs.affine;
        let origin = layout::undercolor_origin(&attrs.affine, offset, metrics);
        boxed.affine.tx = origin.x;
        boxed.affine.ty = origin.y;
        let primitive = Primitive::Rectangle {
            from: Point::default(),
            to: Point::new(metrics.origin.x, height),
        };
        if let Err(err) = self
            .drawing
            .draw_primitive(canvas, &boxed, &primitive.to_string())
        {
            diagnostics.warn_from(&err);
        }
    }

    /// Draws the requested decoration line across a line's width
    fn draw_decoration(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
        metrics: &TypeMetric,
        height: f64,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(origin) =
            layout::decoration_origin(attrs.decorate, &attrs.affine, offset, metrics, height)
        else {
            return;
        };
        let mut decorated = attrs.clone();
        decorated.affine.tx = origin.x;
        decorated.affine.ty = origin.y;
        let stroke = if attrs.stroke.is_transparent() {
            attrs.fill.color()
        } else {
            attrs.stroke.color()
        };
        let primitive = Primitive::Line {
            stroke,
            stroke_width: metrics.underline_thickness,
            from: Point::default(),
            to: Point::new(metrics.width, 0.0),
        };
        if let Err(err) = self
            .drawing
            .draw_primitive(canvas, &decorated, &primitive.to_string())
        {
            diagnostics.warn_from(&err);
        }
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles an [`Annotator`], filling in defaults for anything unset
///
/// ```ignore
/// let annotator = Annotator::builder()
///     .shaper(Arc::new(NoneShaper::new()))
///     .resolver(Arc::new(FontDatabase::from_dirs(&["/opt/fonts"])))
///     .limits(Arc::new(Limits::new(4096.0, 4096.0)))
///     .build();
/// ```
pub struct AnnotatorBuilder {
    shaper: Option<Arc<dyn Shaper>>,
    resolver: Option<Arc<dyn FontResolver>>,
    drawing: Option<Arc<dyn DrawingEngine>>,
    limits: Option<Arc<dyn ResourceLimits>>,
    registry: Option<Arc<BackendRegistry>>,
    #[cfg(feature = "postscript")]
    postscript: Option<Arc<PostscriptRenderer>>,
}

impl AnnotatorBuilder {
    pub fn new() -> Self {
        Self {
            shaper: None,
            resolver: None,
            drawing: None,
            limits: None,
            registry: None,
            #[cfg(feature = "postscript")]
            postscript: None,
        }
    }

    /// Who turns text into glyphs; harfrust when built in
    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Where family and name lookups go; the font path scan by default
    pub fn resolver(mut self, resolver: Arc<dyn FontResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Who draws undercolor boxes, decorations and stroked outlines
    pub fn drawing(mut self, drawing: Arc<dyn DrawingEngine>) -> Self {
        self.drawing = Some(drawing);
        self
    }

    /// Budget for multi-line blocks; the configured limits by default
    pub fn limits(mut self, limits: Arc<dyn ResourceLimits>) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Registry holding the legacy engine; the process-wide one by default
    pub fn registry(mut self, registry: Arc<BackendRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[cfg(feature = "postscript")]
    pub fn postscript(mut self, renderer: PostscriptRenderer) -> Self {
        self.postscript = Some(Arc::new(renderer));
        self
    }

    pub fn build(self) -> Annotator {
        let shaper = self.shaper.unwrap_or_else(default_shaper);
        log::debug!("Annotator using the {} shaper", shaper.name());
        Annotator {
            shaper,
            resolver: self.resolver.or_else(default_resolver),
            drawing: self
                .drawing
                .unwrap_or_else(|| Arc::new(ZenoDrawingEngine::new())),
            limits: self
                .limits
                .unwrap_or_else(|| Arc::new(config::global().limits)),
            registry: self.registry.unwrap_or_else(BackendRegistry::global),
            #[cfg(feature = "postscript")]
            postscript: self
                .postscript
                .unwrap_or_else(|| Arc::new(PostscriptRenderer::new())),
        }
    }
}

impl Default for AnnotatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "shaping-hr")]
fn default_shaper() -> Arc<dyn Shaper> {
    Arc::new(typa_shape_hr::HarfrustShaper::new())
}

#[cfg(not(feature = "shaping-hr"))]
fn default_shaper() -> Arc<dyn Shaper> {
    Arc::new(typa_shape_none::NoneShaper::new())
}

#[cfg(feature = "fontdb")]
fn default_resolver() -> Option<Arc<dyn FontResolver>> {
    let database = typa_fontdb::FontDatabase::from_env();
    log::debug!("Font database holds {} faces", database.len());
    Some(Arc::new(database))
}

#[cfg(not(feature = "fontdb"))]
fn default_resolver() -> Option<Arc<dyn FontResolver>> {
    None
}
