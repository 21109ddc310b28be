//! Seams between the pipeline and its collaborators
//!
//! Fonts, layout engines, font lookup, vector drawing, resource accounting
//! and the legacy display-font engine each sit behind a trait here, so the
//! orchestrator can be driven by real backends or by test doubles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::attrs::DrawAttributes;
use crate::canvas::Canvas;
use crate::error::Result;
use crate::path::PathCommand;
use crate::types::{
    FaceMetrics, FontEncoding, GlyphId, Hinting, Point, ResourceKind, ShapingParams, ShapingResult,
    Stretch, Style, TypeMetric,
};

/// An opened font face
pub trait FontRef: Send + Sync {
    /// Raw font file bytes; empty for synthetic faces
    fn data(&self) -> &[u8];

    /// Face index inside a collection
    fn face_index(&self) -> u32 {
        0
    }

    fn units_per_em(&self) -> u16;

    /// Glyph for a character through the active character map
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// Horizontal advance in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    fn glyph_count(&self) -> Option<u32> {
        None
    }

    fn face_metrics(&self) -> FaceMetrics;

    /// Pair adjustment from the font's kerning table, in font units
    fn kerning(&self, _left: GlyphId, _right: GlyphId) -> Option<i32> {
        None
    }

    /// Whether the face carries a character map for `encoding`
    fn supports_encoding(&self, encoding: FontEncoding) -> bool {
        matches!(encoding, FontEncoding::Unicode | FontEncoding::Latin1)
    }

    /// Glyph for a raw character code in the character map of `encoding`
    fn map_code(&self, code: u32, encoding: FontEncoding) -> Option<GlyphId> {
        match encoding {
            FontEncoding::Unicode | FontEncoding::Latin1 => {
                char::from_u32(code).and_then(|ch| self.glyph_id(ch))
            }
            _ => None,
        }
    }

    /// Glyph outline in pixels at `ppem`, y pointing up
    ///
    /// `None` means the glyph could not be loaded; an empty list is a
    /// glyph without ink, such as a space.
    fn outline(&self, glyph_id: GlyphId, ppem: f32, hinting: Hinting) -> Option<Vec<PathCommand>>;
}

/// Turns text into positioned glyphs
pub trait Shaper: Send + Sync {
    fn name(&self) -> &'static str;

    /// True when the engine reorders mixed-direction text itself
    fn supports_bidi(&self) -> bool;

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult>;
}

/// A face known to a font resolver
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Full name, e.g. `DejaVu Sans Bold`
    pub name: String,
    pub family: String,
    pub path: PathBuf,
    pub face_index: u32,
    pub style: Style,
    pub stretch: Stretch,
    pub weight: u16,
}

/// Finds and opens fonts
pub trait FontResolver: Send + Sync {
    /// Opens the first face of a font file
    fn find_font_by_path(&self, path: &Path) -> Result<Arc<dyn FontRef>>;

    /// Looks a face up by its full or PostScript name
    fn find_font_by_name(&self, name: &str) -> Option<FontDescriptor>;

    /// Best face for a family request; `None` family matches any face
    fn find_font_by_family(
        &self,
        family: Option<&str>,
        style: Style,
        stretch: Stretch,
        weight: u16,
    ) -> Option<FontDescriptor>;

    fn open(&self, descriptor: &FontDescriptor) -> Result<Arc<dyn FontRef>>;
}

/// Executes primitives from the drawing mini-grammar
pub trait DrawingEngine: Send + Sync {
    /// Draws `primitive` with the paints, stroke width, line join and
    /// affine of `attrs`
    fn draw_primitive(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        primitive: &str,
    ) -> Result<()>;
}

/// Budget checks made before large allocations
pub trait ResourceLimits: Send + Sync {
    fn try_reserve(&self, kind: ResourceKind, amount: f64) -> bool;
}

/// A non-reentrant font engine reached through a process-wide lock
pub trait LegacyFontBackend: Send {
    fn name(&self) -> &str;

    fn measure(&mut self, attrs: &DrawAttributes) -> Result<TypeMetric>;

    fn render(
        &mut self,
        canvas: &mut dyn Canvas,
        attrs: &DrawAttributes,
        offset: Point,
    ) -> Result<TypeMetric>;
}
