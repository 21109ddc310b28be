// this_file: crates/typa/tests/common/mod.rs
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use typa::core::config::Limits;
use typa::core::error::FontLoadError;
use typa::core::path::PathCommand;
use typa::core::traits::{FontDescriptor, FontRef, FontResolver, ResourceLimits};
use typa::core::types::{FaceMetrics, GlyphId, Hinting, Stretch, Style};
use typa::shape_none::NoneShaper;
use typa::{Annotator, BackendRegistry, DrawAttributes, Point, Result};

/// Glyph id of the space in [`MockFont`]
pub const SPACE: GlyphId = 1;

/// 1000 units per em, 500 unit advances, a 400x700 box per letter
///
/// At 20 pixels per em every letter is 10px wide with ink from x 1 to 9
/// and 14 rows above the baseline. `A` followed by `V` kerns by -100.
pub struct MockFont;

impl FontRef for MockFont {
    fn data(&self) -> &[u8] {
        &[]
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        match ch {
            ' ' => Some(SPACE),
            'A'..='Z' | 'a'..='z' | '0'..='9' => Some(u32::from(ch)),
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

    fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i32> {
        (left == u32::from('A') && right == u32::from('V')).then_some(-100)
    }

    fn outline(&self, glyph_id: GlyphId, ppem: f32, _hinting: Hinting) -> Option<Vec<PathCommand>> {
        if glyph_id == SPACE {
            return Some(Vec::new());
        }
        let s = f64::from(ppem) / 1000.0;
        let (x0, x1, top) = (50.0 * s, 450.0 * s, 700.0 * s);
        Some(vec![
            PathCommand::MoveTo(Point::new(x0, 0.0)),
            PathCommand::LineTo(Point::new(x1, 0.0)),
            PathCommand::LineTo(Point::new(x1, top)),
            PathCommand::LineTo(Point::new(x0, top)),
            PathCommand::Close,
        ])
    }
}

/// Resolves a fixed list of families, each backed by [`MockFont`]
pub struct MockResolver {
    faces: Vec<FontDescriptor>,
}

impl MockResolver {
    pub fn new(families: &[&str]) -> Self {
        let faces = families
            .iter()
            .map(|family| FontDescriptor {
                name: format!("{} Regular", family),
                family: family.to_string(),
                path: PathBuf::from(format!("/fonts/{}.ttf", family.replace(' ', ""))),
                face_index: 0,
                style: Style::Normal,
                stretch: Stretch::Normal,
                weight: 400,
            })
            .collect();
        Self { faces }
    }
}

impl FontResolver for MockResolver {
    fn find_font_by_path(&self, path: &Path) -> Result<Arc<dyn FontRef>> {
        if self.faces.iter().any(|face| face.path == path) {
            Ok(Arc::new(MockFont))
        } else {
            Err(FontLoadError::FileNotFound(path.display().to_string()).into())
        }
    }

    fn find_font_by_name(&self, name: &str) -> Option<FontDescriptor> {
        self.faces
            .iter()
            .find(|face| face.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn find_font_by_family(
        &self,
        family: Option<&str>,
        _style: Style,
        _stretch: Stretch,
        _weight: u16,
    ) -> Option<FontDescriptor> {
        match family {
            None | Some("*") => self.faces.first().cloned(),
            Some(family) => self
                .faces
                .iter()
                .find(|face| face.family.eq_ignore_ascii_case(family))
                .cloned(),
        }
    }

    fn open(&self, _descriptor: &FontDescriptor) -> Result<Arc<dyn FontRef>> {
        Ok(Arc::new(MockFont))
    }
}

/// An annotator over the mock resolver with a private legacy registry
pub fn annotator(families: &[&str]) -> Annotator {
    annotator_with_limits(families, Arc::new(Limits::unlimited()))
}

pub fn annotator_with_limits(families: &[&str], limits: Arc<dyn ResourceLimits>) -> Annotator {
    Annotator::builder()
        .shaper(Arc::new(NoneShaper::new()))
        .resolver(Arc::new(MockResolver::new(families)))
        .limits(limits)
        .registry(Arc::new(BackendRegistry::new()))
        .build()
}

/// `text` in the `Mock` family at 20px
pub fn mock_attrs(text: &str) -> DrawAttributes {
    DrawAttributes::new()
        .with_text(text)
        .with_font("Mock Regular")
        .with_pointsize(20.0)
}
