//! The font library: directory scanning and face lookup

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use read_fonts::FileRef;
use skrifa::attribute::Style as FaceStyle;
use skrifa::string::StringId;
use skrifa::{FontRef as SkrifaFontRef, MetadataProvider};
use walkdir::WalkDir;

use typa_core::error::{FontLoadError, Result};
use typa_core::traits::{FontDescriptor, FontRef, FontResolver};
use typa_core::types::{Stretch, Style};

use crate::Font;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Width ratios of the nine OS/2 width classes
const WIDTH_RATIOS: [f32; 9] = [0.5, 0.625, 0.75, 0.875, 1.0, 1.125, 1.25, 1.5, 2.0];

#[derive(Debug, Clone)]
struct Entry {
    descriptor: FontDescriptor,
    postscript_name: String,
}

/// Every face found in a set of font directories
///
/// Faces are described once at scan time; the bytes are read again when a
/// face is opened and the opened font is shared afterwards.
pub struct FontDatabase {
    entries: Vec<Entry>,
    opened: Mutex<HashMap<(PathBuf, u32), Arc<Font>>>,
}

impl FontDatabase {
    /// Starts with an empty library
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            opened: Mutex::new(HashMap::new()),
        }
    }

    /// Scans the directories from `TYPA_FONT_PATH`, or the system font
    /// directories when it is unset
    pub fn from_env() -> Self {
        Self::from_dirs(&typa_core::config::global().font_dirs)
    }

    pub fn from_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut db = Self::new();
        for dir in dirs {
            db.load_dir(dir);
        }
        log::debug!("font database holds {} face(s)", db.len());
        db
    }

    /// Adds every font file below `dir`, returning the number of faces added
    ///
    /// Unreadable files are skipped.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return 0;
        }
        let mut added = 0;
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            if !is_font_file(entry.path()) {
                continue;
            }
            match self.add_file(entry.path()) {
                Ok(count) => added += count,
                Err(err) => log::debug!("skipping {}: {err}", entry.path().display()),
            }
        }
        added
    }

    /// Describes every face of one font file
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let data =
            fs::read(path).map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        let file = FileRef::new(&data).map_err(|_| FontLoadError::InvalidData)?;

        let mut added = 0;
        for (index, font) in file.fonts().enumerate() {
            let Ok(font) = font else {
                continue;
            };
            let Ok(face_index) = u32::try_from(index) else {
                break;
            };
            self.entries.push(describe(&font, path, face_index));
            added += 1;
        }
        Ok(added)
    }

    pub fn faces(&self) -> impl Iterator<Item = &FontDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn open_cached(&self, path: &Path, face_index: u32) -> Result<Arc<Font>> {
        let key = (path.to_path_buf(), face_index);
        if let Some(font) = self.opened.lock().get(&key) {
            return Ok(Arc::clone(font));
        }
        let font = Arc::new(Font::from_file_index(path, face_index)?);
        self.opened.lock().insert(key, Arc::clone(&font));
        Ok(font)
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

fn name_string(font: &SkrifaFontRef<'_>, id: StringId) -> Option<String> {
    font.localized_strings(id)
        .english_or_first()
        .map(|name| name.to_string())
        .filter(|name| !name.is_empty())
}

fn describe(font: &SkrifaFontRef<'_>, path: &Path, face_index: u32) -> Entry {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let family = name_string(font, StringId::TYPOGRAPHIC_FAMILY_NAME)
        .or_else(|| name_string(font, StringId::FAMILY_NAME))
        .unwrap_or_else(|| stem.clone());
    let name = name_string(font, StringId::FULL_NAME).unwrap_or_else(|| family.clone());
    let postscript_name = name_string(font, StringId::POSTSCRIPT_NAME).unwrap_or(stem);

    let attributes = font.attributes();
    let style = match attributes.style {
        FaceStyle::Normal => Style::Normal,
        FaceStyle::Italic => Style::Italic,
        FaceStyle::Oblique(_) => Style::Oblique,
    };
    let weight = attributes.weight.value().round().clamp(1.0, 1000.0) as u16;

    Entry {
        descriptor: FontDescriptor {
            name,
            family,
            path: path.to_path_buf(),
            face_index,
            style,
            stretch: stretch_from_ratio(attributes.stretch.ratio()),
            weight,
        },
        postscript_name,
    }
}

/// Nearest width class for a width ratio
fn stretch_from_ratio(ratio: f32) -> Stretch {
    let class = WIDTH_RATIOS
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - ratio).abs().total_cmp(&(*b - ratio).abs()))
        .map(|(i, _)| i as u16 + 1)
        .unwrap_or(5);
    Stretch::from_width_class(class)
}

fn family_matches(requested: Option<&str>, family: &str) -> bool {
    match requested {
        None | Some("*") => true,
        Some(requested) => requested.eq_ignore_ascii_case(family),
    }
}

/// Closeness of a face to a request; higher is better
///
/// Style is worth 32 points, weight 16 and stretch 8, each scaled down by
/// how far the face is from the request.
fn match_score(face: &FontDescriptor, style: Style, stretch: Stretch, weight: u16) -> i32 {
    let mut score = 0;
    if style == Style::Any || style == face.style {
        score += 32;
    } else if matches!(style, Style::Italic | Style::Oblique)
        && matches!(face.style, Style::Italic | Style::Oblique)
    {
        score += 25;
    }

    if weight == 0 {
        score += 16;
    } else {
        let requested = i32::from(weight.min(900));
        let actual = i32::from(face.weight);
        score += (16 * (800 - (requested - actual).abs())).max(0) / 800;
    }

    match (stretch.width_class(), face.stretch.width_class()) {
        (None, _) => score += 8,
        (Some(requested), actual) => {
            let range = 9 - 5;
            let actual = i32::from(actual.unwrap_or(5));
            score += (8 * (range - (i32::from(requested) - actual).abs())).max(0) / range;
        }
    }
    score
}

impl FontResolver for FontDatabase {
    fn find_font_by_path(&self, path: &Path) -> Result<Arc<dyn FontRef>> {
        let font: Arc<dyn FontRef> = self.open_cached(path, 0)?;
        Ok(font)
    }

    fn find_font_by_name(&self, name: &str) -> Option<FontDescriptor> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|entry| {
                entry.descriptor.name.eq_ignore_ascii_case(name)
                    || entry.postscript_name.eq_ignore_ascii_case(name)
            })
            .map(|entry| entry.descriptor.clone())
    }

    fn find_font_by_family(
        &self,
        family: Option<&str>,
        style: Style,
        stretch: Stretch,
        weight: u16,
    ) -> Option<FontDescriptor> {
        let mut best: Option<(&Entry, i32)> = None;
        for entry in &self.entries {
            if !family_matches(family, &entry.descriptor.family) {
                continue;
            }
            let score = match_score(&entry.descriptor, style, stretch, weight);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entry, score));
            }
        }
        best.map(|(entry, _)| entry.descriptor.clone())
    }

    fn open(&self, descriptor: &FontDescriptor) -> Result<Arc<dyn FontRef>> {
        let font: Arc<dyn FontRef> = self.open_cached(&descriptor.path, descriptor.face_index)?;
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(family: &str, style: Style, weight: u16, stretch: Stretch) -> Entry {
        Entry {
            descriptor: FontDescriptor {
                name: format!("{family} {weight}"),
                family: family.to_string(),
                path: PathBuf::from(format!("/fonts/{family}-{weight}.ttf")),
                face_index: 0,
                style,
                stretch,
                weight,
            },
            postscript_name: format!("{}-{weight}", family.replace(' ', "")),
        }
    }

    fn library() -> FontDatabase {
        let mut db = FontDatabase::new();
        db.entries = vec![
            face("Sans", Style::Normal, 400, Stretch::Normal),
            face("Sans", Style::Normal, 700, Stretch::Normal),
            face("Sans", Style::Italic, 400, Stretch::Normal),
            face("Sans", Style::Normal, 400, Stretch::Condensed),
            face("Serif", Style::Normal, 400, Stretch::Normal),
        ];
        db
    }

    #[test]
    fn test_empty_database() {
        let db = FontDatabase::new();
        assert!(db.is_empty());
        assert_eq!(db.faces().count(), 0);
        assert!(db.find_font_by_family(None, Style::Any, Stretch::Any, 0).is_none());
    }

    #[test]
    fn test_family_lookup_prefers_closest_weight() {
        let db = library();
        let bold = db.find_font_by_family(Some("sans"), Style::Any, Stretch::Any, 700);
        assert_eq!(bold.map(|d| d.weight), Some(700));
        let regular = db.find_font_by_family(Some("Sans"), Style::Normal, Stretch::Any, 400);
        assert_eq!(regular.map(|d| (d.weight, d.style)), Some((400, Style::Normal)));
    }

    #[test]
    fn test_oblique_request_accepts_italic_face() {
        let db = library();
        let found = db.find_font_by_family(Some("Sans"), Style::Oblique, Stretch::Any, 400);
        assert_eq!(found.map(|d| d.style), Some(Style::Italic));
    }

    #[test]
    fn test_stretch_request_picks_condensed() {
        let db = library();
        let found = db.find_font_by_family(Some("Sans"), Style::Normal, Stretch::Condensed, 400);
        assert_eq!(found.map(|d| d.stretch), Some(Stretch::Condensed));
    }

    #[test]
    fn test_unknown_family_and_wildcards() {
        let db = library();
        assert!(db.find_font_by_family(Some("Arial"), Style::Any, Stretch::Any, 0).is_none());
        assert!(db.find_font_by_family(None, Style::Any, Stretch::Any, 0).is_some());
        assert!(db.find_font_by_family(Some("*"), Style::Any, Stretch::Any, 0).is_some());
    }

    #[test]
    fn test_lookup_by_full_or_postscript_name() {
        let db = library();
        assert_eq!(db.find_font_by_name("serif 400").map(|d| d.family), Some("Serif".into()));
        assert_eq!(db.find_font_by_name("Sans-700").map(|d| d.weight), Some(700));
        assert!(db.find_font_by_name("Missing").is_none());
    }

    #[test]
    fn test_stretch_from_ratio() {
        assert_eq!(stretch_from_ratio(1.0), Stretch::Normal);
        assert_eq!(stretch_from_ratio(0.76), Stretch::Condensed);
        assert_eq!(stretch_from_ratio(2.0), Stretch::UltraExpanded);
    }

    #[test]
    fn test_missing_dir_adds_nothing() {
        let mut db = FontDatabase::new();
        assert_eq!(db.load_dir("/nonexistent/typa/fonts"), 0);
        assert!(db.find_font_by_path(Path::new("/nonexistent/typa/a.ttf")).is_err());
    }

    #[test]
    fn test_font_extensions() {
        assert!(is_font_file(Path::new("a/DejaVuSans.TTF")));
        assert!(is_font_file(Path::new("a/b.otc")));
        assert!(!is_font_file(Path::new("a/b.pfb")));
    }
}
