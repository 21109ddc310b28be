//! Choosing the engine that draws a font reference
//!
//! Outline fonts are opened through the font resolver; family queries walk
//! a fixed cascade of fallback families before giving up. The legacy and
//! PostScript engines are picked by the reference variant alone.

use std::sync::Arc;

use typa_core::attrs::{FontQuery, FontReference};
use typa_core::diagnostics::Diagnostics;
use typa_core::error::{FontLoadError, Result, TypaError};
use typa_core::path::PathCommand;
use typa_core::traits::{FontDescriptor, FontRef, FontResolver};
use typa_core::types::{FaceMetrics, FontEncoding, GlyphId, Hinting, Stretch, Style};
use typa_core::DrawAttributes;

/// Families tried, in order, when a request resolves to nothing
pub const FALLBACK_FAMILIES: &[&str] = &["Arial", "Helvetica", "Century Schoolbook", "Sans"];

/// The engine a call goes to
pub enum Backend {
    Outline(OutlineFace),
    Legacy,
    Postscript,
}

/// An opened outline face and how to map characters into it
pub struct OutlineFace {
    pub font: Arc<dyn FontRef>,
    pub encoding: FontEncoding,
    /// Name used in messages
    pub name: String,
}

impl OutlineFace {
    /// The face with its character lookup routed through `encoding`
    pub fn mapped_font(&self) -> Arc<dyn FontRef> {
        match self.encoding {
            FontEncoding::Unicode => Arc::clone(&self.font),
            encoding => Arc::new(EncodedFont {
                inner: Arc::clone(&self.font),
                encoding,
            }),
        }
    }
}

/// A face whose `glyph_id` looks characters up as raw codes of another
/// character map
struct EncodedFont {
    inner: Arc<dyn FontRef>,
    encoding: FontEncoding,
}

impl FontRef for EncodedFont {
    fn data(&self) -> &[u8] {
        self.inner.data()
    }

    fn face_index(&self) -> u32 {
        self.inner.face_index()
    }

    fn units_per_em(&self) -> u16 {
        self.inner.units_per_em()
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let code = u32::from(ch);
        let glyph = self.inner.map_code(code, self.encoding);
        if glyph.is_none() && self.encoding == FontEncoding::Symbol && code < 0x100 {
            // Symbol maps usually live in the private use area
            return self.inner.map_code(0xF000 | code, self.encoding);
        }
        glyph
    }

    fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.inner.advance_width(glyph_id)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.inner.glyph_count()
    }

    fn face_metrics(&self) -> FaceMetrics {
        self.inner.face_metrics()
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i32> {
        self.inner.kerning(left, right)
    }

    fn supports_encoding(&self, encoding: FontEncoding) -> bool {
        self.inner.supports_encoding(encoding)
    }

    fn map_code(&self, code: u32, encoding: FontEncoding) -> Option<GlyphId> {
        self.inner.map_code(code, encoding)
    }

    fn outline(&self, glyph_id: GlyphId, ppem: f32, hinting: Hinting) -> Option<Vec<PathCommand>> {
        self.inner.outline(glyph_id, ppem, hinting)
    }
}

/// Picks the backend for `attrs.font`, opening the face for outline fonts
///
/// Lookup misses along the way are recorded as warnings.
pub fn resolve_backend(
    resolver: Option<&dyn FontResolver>,
    attrs: &DrawAttributes,
    diagnostics: &mut Diagnostics,
) -> Result<Backend> {
    let (font, name) = match &attrs.font {
        FontReference::LegacyEngineFont(_) => return Ok(Backend::Legacy),
        FontReference::PostscriptFont(_) => return Ok(Backend::Postscript),
        FontReference::OutlineFont(path) => {
            let Some(resolver) = resolver else {
                return Err(no_usable_font(attrs, diagnostics));
            };
            match resolver.find_font_by_path(path) {
                Ok(font) => (font, path.display().to_string()),
                Err(err) => {
                    let err: TypaError =
                        FontLoadError::UnableToReadFont(format!("{} ({})", path.display(), err))
                            .into();
                    diagnostics.warn_from(&err);
                    return Err(err);
                },
            }
        },
        FontReference::FamilyQuery(query) => {
            let Some(resolver) = resolver else {
                return Err(no_usable_font(attrs, diagnostics));
            };
            let Some(descriptor) = find_face(resolver, query, diagnostics) else {
                return Err(no_usable_font(attrs, diagnostics));
            };
            match resolver.open(&descriptor) {
                Ok(font) => (font, descriptor.name.clone()),
                Err(err) => {
                    let err: TypaError = FontLoadError::UnableToReadFont(format!(
                        "{} ({})",
                        descriptor.path.display(),
                        err
                    ))
                    .into();
                    diagnostics.warn_from(&err);
                    return Err(err);
                },
            }
        },
    };

    let encoding = match select_encoding(font.as_ref(), attrs) {
        Ok(encoding) => encoding,
        Err(err) => {
            diagnostics.warn_from(&err);
            return Err(err);
        },
    };
    log::debug!("Outline face `{}` with {:?} character map", name, encoding);
    Ok(Backend::Outline(OutlineFace {
        font,
        encoding,
        name,
    }))
}

/// The character map to use for `font`
///
/// An explicit encoding must be served by the face. Without one, Unicode
/// is used, or the symbol map when the face has nothing else.
fn select_encoding(font: &dyn FontRef, attrs: &DrawAttributes) -> Result<FontEncoding> {
    let requested = attrs.font_encoding()?;
    if attrs.encoding.is_none() {
        if !font.supports_encoding(FontEncoding::Unicode)
            && font.supports_encoding(FontEncoding::Symbol)
        {
            return Ok(FontEncoding::Symbol);
        }
        return Ok(FontEncoding::Unicode);
    }
    if !font.supports_encoding(requested) {
        let name = attrs.encoding.clone().unwrap_or_default();
        return Err(FontLoadError::UnrecognizedFontEncoding(name).into());
    }
    match requested {
        FontEncoding::Latin1 => Ok(FontEncoding::Unicode),
        other => Ok(other),
    }
}

/// Walks the name, the requested families, then the fallback cascade
fn find_face(
    resolver: &dyn FontResolver,
    query: &FontQuery,
    diagnostics: &mut Diagnostics,
) -> Option<FontDescriptor> {
    let by_family = |family: Option<&str>| {
        resolver.find_font_by_family(family, query.style, query.stretch, query.weight)
    };

    if let Some(name) = query.name.as_deref() {
        if let Some(found) = resolver.find_font_by_name(name) {
            return Some(found);
        }
        diagnostics.warn("UnableToReadFont", name);
    }

    if query.family.is_some() {
        if let Some(found) = query.families().find_map(|family| by_family(Some(family))) {
            return Some(found);
        }
        diagnostics.warn("UnableToReadFont", query.family.clone().unwrap_or_default());
    }

    let found = FALLBACK_FAMILIES
        .iter()
        .find_map(|family| by_family(Some(family)))
        .or_else(|| by_family(None))
        .or_else(|| resolver.find_font_by_family(Some("*"), Style::Any, Stretch::Any, 0));
    if let Some(face) = &found {
        log::warn!("Falling back to `{}` for {:?}", face.name, query);
    }
    found
}

fn no_usable_font(attrs: &DrawAttributes, diagnostics: &mut Diagnostics) -> TypaError {
    let err: TypaError = FontLoadError::NoUsableFont(attrs.font.describe()).into();
    diagnostics.warn_from(&err);
    err
}
