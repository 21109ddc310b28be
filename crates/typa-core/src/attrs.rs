//! Drawing attributes: everything a caller says about how text should look

use std::path::{Path, PathBuf};

use crate::canvas::Paint;
use crate::error::Result;
use crate::types::{
    AffineMatrix, Align, BoundsPolicy, Color, Decoration, Density, Direction, FontEncoding,
    Geometry, Gravity, LineJoin, Stretch, Style,
};

/// A family/style/stretch/weight request, optionally with an exact face name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontQuery {
    /// Full face name, tried before the family
    pub name: Option<String>,
    /// One family or a comma-separated list
    pub family: Option<String>,
    pub style: Style,
    pub stretch: Stretch,
    /// `0` matches any weight
    pub weight: u16,
}

impl FontQuery {
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Family tokens in lookup order
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.family
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|f| !f.is_empty())
    }
}

/// Which engine draws the text, decided once when the font is set
#[derive(Debug, Clone, PartialEq)]
pub enum FontReference {
    /// A font file for the outline engine
    OutlineFont(PathBuf),
    /// A font name for the display-server engine
    LegacyEngineFont(String),
    /// A PostScript font name for the interpreter fallback
    PostscriptFont(String),
    FamilyQuery(FontQuery),
}

impl FontReference {
    /// Classifies a font string
    ///
    /// `@path` forces the outline engine, a leading `-` selects the legacy
    /// engine, `^name` the PostScript fallback. An existing file is an
    /// outline font; anything else is looked up by name.
    pub fn parse(font: &str) -> Self {
        if let Some(path) = font.strip_prefix('@') {
            return FontReference::OutlineFont(PathBuf::from(path));
        }
        if font.starts_with('-') {
            return FontReference::LegacyEngineFont(font.to_string());
        }
        if let Some(name) = font.strip_prefix('^') {
            return FontReference::PostscriptFont(name.to_string());
        }
        if font.is_empty() {
            return FontReference::FamilyQuery(FontQuery::default());
        }
        if Path::new(font).is_file() {
            return FontReference::OutlineFont(PathBuf::from(font));
        }
        FontReference::FamilyQuery(FontQuery {
            name: Some(font.to_string()),
            ..Default::default()
        })
    }

    /// Human-readable name for messages
    pub fn describe(&self) -> String {
        match self {
            FontReference::OutlineFont(path) => path.display().to_string(),
            FontReference::LegacyEngineFont(name) => name.clone(),
            FontReference::PostscriptFont(name) => format!("^{}", name),
            FontReference::FamilyQuery(q) => q
                .name
                .clone()
                .or_else(|| q.family.clone())
                .unwrap_or_else(|| "(default)".to_string()),
        }
    }
}

impl Default for FontReference {
    fn default() -> Self {
        FontReference::FamilyQuery(FontQuery::default())
    }
}

/// Everything needed to measure or draw one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct DrawAttributes {
    /// `None` is distinct from an empty string: it is a caller error
    pub text: Option<String>,
    pub font: FontReference,
    /// Character map name; `None` means Unicode
    pub encoding: Option<String>,
    pub pointsize: f64,
    pub density: Option<Density>,
    pub affine: AffineMatrix,
    pub geometry: Option<Geometry>,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f64,
    pub linejoin: LineJoin,
    pub undercolor: Color,
    pub gravity: Gravity,
    pub align: Align,
    pub decorate: Decoration,
    pub direction: Direction,
    /// Extra pixels between glyphs
    pub kerning: f64,
    /// Replacement advance after a word, in pixels; `0` keeps the font's
    pub interword_spacing: f64,
    /// Extra pixels between lines
    pub interline_spacing: f64,
    /// Comma-separated OpenType feature settings
    pub features: Option<String>,
    pub hinting: bool,
    pub text_antialias: bool,
    /// `false` computes metrics only
    pub render: bool,
    pub bounds_policy: BoundsPolicy,
}

impl Default for DrawAttributes {
    fn default() -> Self {
        Self {
            text: None,
            font: FontReference::default(),
            encoding: None,
            pointsize: 12.0,
            density: None,
            affine: AffineMatrix::IDENTITY,
            geometry: None,
            fill: Paint::Solid(Color::black()),
            stroke: Paint::transparent(),
            stroke_width: 1.0,
            linejoin: LineJoin::Miter,
            undercolor: Color::transparent(),
            gravity: Gravity::Undefined,
            align: Align::Undefined,
            decorate: Decoration::None,
            direction: Direction::Undefined,
            kerning: 0.0,
            interword_spacing: 0.0,
            interline_spacing: 0.0,
            features: None,
            hinting: true,
            text_antialias: true,
            render: true,
            bounds_policy: BoundsPolicy::SkipZero,
        }
    }
}

impl DrawAttributes {
    /// Attributes with informational defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_font(mut self, font: &str) -> Self {
        self.set_font(font);
        self
    }

    pub fn with_pointsize(mut self, pointsize: f64) -> Self {
        self.pointsize = pointsize;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn set_font(&mut self, font: &str) {
        self.font = FontReference::parse(font);
    }

    /// Sets the family part of the font request
    ///
    /// A font file or engine selection set earlier is replaced.
    pub fn set_family(&mut self, family: &str) {
        match &mut self.font {
            FontReference::FamilyQuery(q) => q.family = Some(family.to_string()),
            other => *other = FontReference::FamilyQuery(FontQuery::family(family)),
        }
    }

    pub fn set_geometry_string(&mut self, geometry: &str) -> Result<()> {
        self.geometry = Some(geometry.parse()?);
        Ok(())
    }

    pub fn set_density_string(&mut self, density: &str) -> Result<()> {
        self.density = Some(density.parse()?);
        Ok(())
    }

    pub fn resolution(&self) -> Density {
        self.density.unwrap_or_default()
    }

    /// Parsed character map request
    pub fn font_encoding(&self) -> Result<FontEncoding> {
        match self.encoding.as_deref() {
            None => Ok(FontEncoding::Unicode),
            Some(name) => name.parse(),
        }
    }

    /// Pixels per em for the outline engine
    pub fn pixels_per_em(&self) -> (f64, f64) {
        let density = self.resolution();
        (
            self.pointsize * density.x / Density::DEFAULT_RESOLUTION,
            self.pointsize * density.y / Density::DEFAULT_RESOLUTION,
        )
    }

    /// Nothing visible would be drawn by fill or stroke
    pub fn is_transparent_fill(&self) -> bool {
        self.fill.is_transparent() && self.stroke.is_transparent()
    }

    /// Copy suitable for measuring: no rendering, neutral direction
    pub fn for_metrics(&self) -> Self {
        Self {
            render: false,
            direction: Direction::Undefined,
            ..self.clone()
        }
    }
}
