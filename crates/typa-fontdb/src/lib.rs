//! Where fonts come from: loading and lookup for Typa
//!
//! [`Font`] holds the bytes of one face and answers what the pipeline asks
//! of it through skrifa and read-fonts: character mapping, advances, face
//! metrics, `kern` pairs and outlines at a pixel size. [`FontDatabase`]
//! scans font directories and resolves names and family requests.
//!
//! ## Memory Management
//!
//! Fonts store their raw data and create a parser `FontRef` on demand, so
//! collections (`.ttc`) work by face index and nothing borrowed outlives
//! a call.

mod database;
mod pen;

pub use database::FontDatabase;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use read_fonts::tables::cmap::PlatformId;
use read_fonts::tables::kern::SubtableKind;
use read_fonts::TableProvider;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, HintingInstance, SmoothMode, Target};
use skrifa::{FontRef as SkrifaFontRef, GlyphId as SkrifaGlyphId, MetadataProvider};

use typa_core::error::{FontLoadError, Result};
use typa_core::path::PathCommand;
use typa_core::traits::FontRef;
use typa_core::types::{FaceMetrics, FontEncoding, GlyphId, Hinting};

use pen::CommandPen;

/// Hinting instances kept per face before the cache is flushed
const MAX_HINTERS: usize = 8;

/// A font face loaded into memory
///
/// For TTC collections, `face_index` picks the face.
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    /// Keyed by ppem bits and hinting mode; building an instance runs the
    /// font's prep program, so it is worth keeping between glyphs
    hinters: Mutex<HashMap<(u32, Hinting), HintingInstance>>,
}

impl Font {
    /// Opens the first face of a font file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data =
            fs::read(path).map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        Self::from_data_index(data, face_index)
    }

    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Validates the bytes as a face and keeps them
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font =
            SkrifaFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        let units_per_em = font
            .head()
            .map(|head| head.units_per_em())
            .map_err(|_| FontLoadError::InvalidData)?;
        if units_per_em == 0 {
            return Err(FontLoadError::InvalidData.into());
        }

        Ok(Font {
            data,
            face_index,
            units_per_em,
            hinters: Mutex::new(HashMap::new()),
        })
    }

    fn font_ref(&self) -> Option<SkrifaFontRef<'_>> {
        SkrifaFontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Whether any character map record serves `encoding`
    fn has_cmap_for(&self, encoding: FontEncoding) -> bool {
        let Some(font) = self.font_ref() else {
            return false;
        };
        let Ok(cmap) = font.cmap() else {
            return false;
        };
        cmap.encoding_records()
            .iter()
            .any(|record| record_serves(encoding, record.platform_id(), record.encoding_id()))
    }

    fn draw(&self, glyph_id: GlyphId, ppem: f32, hinting: Hinting) -> Option<Vec<PathCommand>> {
        let font = self.font_ref()?;
        let outlines = font.outline_glyphs();
        let glyph = outlines.get(SkrifaGlyphId::new(glyph_id))?;
        let size = Size::new(ppem);
        let mut pen = CommandPen::default();

        let drawn = match hinting {
            Hinting::None => glyph.draw(DrawSettings::unhinted(size, LocationRef::default()), &mut pen),
            Hinting::Light | Hinting::Mono => {
                let mut hinters = self.hinters.lock();
                let key = (ppem.to_bits(), hinting);
                if !hinters.contains_key(&key) {
                    let target = match hinting {
                        Hinting::Mono => Target::Mono,
                        _ => Target::from(SmoothMode::Light),
                    };
                    match HintingInstance::new(&outlines, size, LocationRef::default(), target) {
                        Ok(instance) => {
                            if hinters.len() >= MAX_HINTERS {
                                hinters.clear();
                            }
                            hinters.insert(key, instance);
                        }
                        Err(err) => {
                            log::debug!("hinting unavailable at {ppem}ppem: {err}");
                        }
                    }
                }
                match hinters.get(&key) {
                    Some(instance) => glyph.draw(DrawSettings::hinted(instance, false), &mut pen),
                    None => glyph.draw(DrawSettings::unhinted(size, LocationRef::default()), &mut pen),
                }
            }
        };

        match drawn {
            Ok(_) => Some(pen.into_commands()),
            Err(err) => {
                log::warn!("glyph {glyph_id} failed to load: {err}");
                None
            }
        }
    }
}

/// Character map records that serve an encoding, by platform and encoding id
fn record_serves(encoding: FontEncoding, platform: PlatformId, id: u16) -> bool {
    match encoding {
        FontEncoding::Unicode | FontEncoding::Latin1 => match platform {
            PlatformId::Unicode => true,
            // The symbol map stands in for Unicode when nothing else exists
            PlatformId::Windows => matches!(id, 0 | 1 | 10),
            _ => false,
        },
        FontEncoding::Symbol => matches!(platform, PlatformId::Windows) && id == 0,
        FontEncoding::AppleRoman => matches!(platform, PlatformId::Macintosh) && id == 0,
        FontEncoding::Sjis => matches!(platform, PlatformId::Windows) && id == 2,
        FontEncoding::Gb2312 => matches!(platform, PlatformId::Windows) && id == 3,
        FontEncoding::Big5 => matches!(platform, PlatformId::Windows) && id == 4,
        FontEncoding::Wansung => matches!(platform, PlatformId::Windows) && id == 5,
        FontEncoding::Johab => matches!(platform, PlatformId::Windows) && id == 6,
        // Adobe encodings live in Type 1/CFF charsets, not in cmap
        FontEncoding::AdobeStandard
        | FontEncoding::AdobeExpert
        | FontEncoding::AdobeCustom
        | FontEncoding::AdobeLatin1 => false,
    }
}

impl FontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let font = self.font_ref()?;
        font.charmap()
            .map(ch)
            .map(|gid| gid.to_u32())
            .filter(|&gid| gid != 0)
    }

    fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.font_ref()
            .and_then(|font| {
                font.glyph_metrics(Size::unscaled(), LocationRef::default())
                    .advance_width(SkrifaGlyphId::new(glyph_id))
            })
            .unwrap_or(0.0)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| u32::from(maxp.num_glyphs())))
    }

    fn face_metrics(&self) -> FaceMetrics {
        let upem = f32::from(self.units_per_em);
        let Some(font) = self.font_ref() else {
            return FaceMetrics {
                ascender: upem,
                line_height: upem,
                max_advance: upem,
                ..FaceMetrics::default()
            };
        };
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        let underline = metrics.underline.unwrap_or_default();
        FaceMetrics {
            ascender: metrics.ascent,
            descender: metrics.descent,
            line_height: metrics.ascent - metrics.descent + metrics.leading,
            max_advance: metrics.max_width.unwrap_or(upem),
            underline_position: underline.offset,
            underline_thickness: underline.thickness,
        }
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i32> {
        let font = self.font_ref()?;
        let kern = font.kern().ok()?;
        let (left, right) = (SkrifaGlyphId::new(left), SkrifaGlyphId::new(right));
        for subtable in kern.subtables().flatten() {
            if !subtable.is_horizontal() || subtable.is_cross_stream() {
                continue;
            }
            let value = match subtable.kind() {
                Ok(SubtableKind::Format0(st)) => st.kerning(left, right),
                Ok(SubtableKind::Format2(st)) => st.kerning(left, right),
                Ok(SubtableKind::Format3(st)) => st.kerning(left, right),
                _ => None,
            };
            if value.is_some() {
                return value;
            }
        }
        None
    }

    fn supports_encoding(&self, encoding: FontEncoding) -> bool {
        self.has_cmap_for(encoding)
    }

    fn map_code(&self, code: u32, encoding: FontEncoding) -> Option<GlyphId> {
        if matches!(encoding, FontEncoding::Unicode | FontEncoding::Latin1) {
            return char::from_u32(code).and_then(|ch| self.glyph_id(ch));
        }
        let font = self.font_ref()?;
        let cmap = font.cmap().ok()?;
        let index = cmap.encoding_records().iter().position(|record| {
            record_serves(encoding, record.platform_id(), record.encoding_id())
        })?;
        let subtable = cmap.subtable(u16::try_from(index).ok()?).ok()?;
        subtable
            .map_codepoint(code)
            .map(|gid| gid.to_u32())
            .filter(|&gid| gid != 0)
    }

    fn outline(&self, glyph_id: GlyphId, ppem: f32, hinting: Hinting) -> Option<Vec<PathCommand>> {
        self.draw(glyph_id, ppem, hinting)
    }
}
