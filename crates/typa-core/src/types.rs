//! Value types shared by every stage of the annotation pipeline

use std::fmt;
use std::str::FromStr;

use crate::error::{FontLoadError, TypaError};
use crate::fixed::F26Dot6;

pub type GlyphId = u32;

/// Paragraph direction requested for layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Let the layout engine decide from the text
    #[default]
    Undefined,
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn is_rtl(self) -> bool {
        self == Direction::RightToLeft
    }
}

impl FromStr for Direction {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "undefined" | "auto" => Ok(Direction::Undefined),
            "ltr" | "lefttoright" | "left-to-right" => Ok(Direction::LeftToRight),
            "rtl" | "righttoleft" | "right-to-left" => Ok(Direction::RightToLeft),
            _ => Err(TypaError::InvalidAttribute(format!("direction `{}`", s))),
        }
    }
}

/// Where a block of text is anchored inside the target geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    Undefined,
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl FromStr for Gravity {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gravity = match s.to_ascii_lowercase().as_str() {
            "undefined" | "none" => Gravity::Undefined,
            "northwest" => Gravity::NorthWest,
            "north" => Gravity::North,
            "northeast" => Gravity::NorthEast,
            "west" => Gravity::West,
            "center" | "centre" => Gravity::Center,
            "east" => Gravity::East,
            "southwest" => Gravity::SouthWest,
            "south" => Gravity::South,
            "southeast" => Gravity::SouthEast,
            _ => return Err(TypaError::InvalidAttribute(format!("gravity `{}`", s))),
        };
        Ok(gravity)
    }
}

/// Horizontal alignment; overrides gravity when set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Undefined,
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "undefined" | "none" => Ok(Align::Undefined),
            "left" | "start" => Ok(Align::Left),
            "center" | "middle" => Ok(Align::Center),
            "right" | "end" => Ok(Align::Right),
            _ => Err(TypaError::InvalidAttribute(format!("align `{}`", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoration {
    #[default]
    None,
    Underline,
    Overline,
    LineThrough,
}

impl FromStr for Decoration {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Decoration::None),
            "underline" => Ok(Decoration::Underline),
            "overline" => Ok(Decoration::Overline),
            "line-through" | "linethrough" | "strikethrough" => Ok(Decoration::LineThrough),
            _ => Err(TypaError::InvalidAttribute(format!("decoration `{}`", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2x3 affine transform
///
/// Maps `(x, y)` to `(sx*x + ry*y + tx, rx*x + sy*y + ty)` in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    pub sx: f64,
    pub rx: f64,
    pub ry: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        sx: 1.0,
        rx: 0.0,
        ry: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn translate(tx: f64, ty: f64) -> Self {
        AffineMatrix {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `degrees`, clockwise in image space
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        AffineMatrix {
            sx: cos,
            rx: sin,
            ry: -sin,
            sy: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.sx * p.x + self.ry * p.y + self.tx,
            y: self.rx * p.x + self.sy * p.y + self.ty,
        }
    }

    /// Average scale factor of the linear part
    pub fn expansion(&self) -> f64 {
        (self.sx * self.sy - self.rx * self.ry).abs().sqrt()
    }

    /// True when the linear part is a uniform scale without shear
    pub fn is_identity_like(&self) -> bool {
        const EPSILON: f64 = 1.0e-12;
        (self.sx - self.sy).abs() < EPSILON && self.rx.abs() < EPSILON && self.ry.abs() < EPSILON
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Target geometry, `WxH+X+Y`
///
/// Width and height fall back to the canvas size when absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x: f64,
    pub y: f64,
}

impl FromStr for Geometry {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TypaError::InvalidAttribute(format!("geometry `{}`", s));
        let s = s.trim();
        let offset_at = s.find(['+', '-']).unwrap_or(s.len());
        let (size, offsets) = s.split_at(offset_at);

        let mut geometry = Geometry::default();
        if !size.is_empty() {
            let (w, h) = match size.split_once(['x', 'X']) {
                Some((w, h)) => (w, h),
                None => (size, ""),
            };
            if !w.is_empty() {
                geometry.width = Some(w.parse().map_err(|_| bad())?);
            }
            if !h.is_empty() {
                geometry.height = Some(h.parse().map_err(|_| bad())?);
            }
        }

        // Offsets come as signed numbers glued together, e.g. "+10-4"
        let mut values = Vec::new();
        let mut start = None;
        for (i, ch) in offsets.char_indices() {
            if ch == '+' || ch == '-' {
                if let Some(begin) = start {
                    values.push(&offsets[begin..i]);
                }
                start = Some(i);
            }
        }
        if let Some(begin) = start {
            values.push(&offsets[begin..]);
        }
        if values.len() > 2 {
            return Err(bad());
        }
        let mut parsed = values.iter().map(|v| v.parse::<f64>().map_err(|_| bad()));
        if let Some(x) = parsed.next() {
            geometry.x = x?;
        }
        if let Some(y) = parsed.next() {
            geometry.y = y?;
        }
        Ok(geometry)
    }
}

/// Output resolution in dots per inch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    pub x: f64,
    pub y: f64,
}

impl Density {
    pub const DEFAULT_RESOLUTION: f64 = 72.0;
}

impl Default for Density {
    fn default() -> Self {
        Density {
            x: Self::DEFAULT_RESOLUTION,
            y: Self::DEFAULT_RESOLUTION,
        }
    }
}

impl FromStr for Density {
    type Err = TypaError;

    /// Accepts `X` or `XxY`; a lone value applies to both axes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TypaError::InvalidAttribute(format!("density `{}`", s));
        let (x, y) = match s.trim().split_once(['x', 'X']) {
            Some((x, y)) => {
                let x: f64 = x.parse().map_err(|_| bad())?;
                let y: f64 = if y.is_empty() {
                    x
                } else {
                    y.parse().map_err(|_| bad())?
                };
                (x, y)
            },
            None => {
                let x: f64 = s.trim().parse().map_err(|_| bad())?;
                (x, x)
            },
        };
        if x <= 0.0 || y <= 0.0 {
            return Err(bad());
        }
        Ok(Density { x, y })
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Name understood by the drawing primitive grammar
    pub fn name(&self) -> String {
        match (self.a, (self.r, self.g, self.b)) {
            (0, _) => "none".to_string(),
            (255, (0, 0, 0)) => "black".to_string(),
            (255, (255, 255, 255)) => "white".to_string(),
            (255, (r, g, b)) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            (a, (r, g, b)) => format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Color {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TypaError::InvalidAttribute(format!("color `{}`", s));
        let lower = s.trim().to_ascii_lowercase();
        let named = match lower.as_str() {
            "none" | "transparent" => Some(Color::transparent()),
            "black" => Some(Color::black()),
            "white" => Some(Color::white()),
            "red" => Some(Color::rgb(255, 0, 0)),
            "green" => Some(Color::rgb(0, 128, 0)),
            "lime" => Some(Color::rgb(0, 255, 0)),
            "blue" => Some(Color::rgb(0, 0, 255)),
            "yellow" => Some(Color::rgb(255, 255, 0)),
            "cyan" => Some(Color::rgb(0, 255, 255)),
            "magenta" => Some(Color::rgb(255, 0, 255)),
            "gray" | "grey" => Some(Color::rgb(190, 190, 190)),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| bad());
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        if !hex.is_ascii() {
            return Err(bad());
        }
        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(bad()),
        }
    }
}

/// Requested face slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Any,
    Normal,
    Italic,
    Oblique,
}

/// Requested face width class, `Any` or 1 (ultra condensed) to 9 (ultra expanded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stretch {
    #[default]
    Any,
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl Stretch {
    /// Width class as stored in `OS/2.usWidthClass`
    pub fn width_class(self) -> Option<u16> {
        let class = match self {
            Stretch::Any => return None,
            Stretch::UltraCondensed => 1,
            Stretch::ExtraCondensed => 2,
            Stretch::Condensed => 3,
            Stretch::SemiCondensed => 4,
            Stretch::Normal => 5,
            Stretch::SemiExpanded => 6,
            Stretch::Expanded => 7,
            Stretch::ExtraExpanded => 8,
            Stretch::UltraExpanded => 9,
        };
        Some(class)
    }

    pub fn from_width_class(class: u16) -> Self {
        match class {
            1 => Stretch::UltraCondensed,
            2 => Stretch::ExtraCondensed,
            3 => Stretch::Condensed,
            4 => Stretch::SemiCondensed,
            6 => Stretch::SemiExpanded,
            7 => Stretch::Expanded,
            8 => Stretch::ExtraExpanded,
            9 => Stretch::UltraExpanded,
            _ => Stretch::Normal,
        }
    }
}

/// Character encoding used to pick a face's character map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontEncoding {
    #[default]
    Unicode,
    Latin1,
    Symbol,
    AppleRoman,
    Sjis,
    Gb2312,
    Big5,
    Wansung,
    Johab,
    AdobeStandard,
    AdobeExpert,
    AdobeCustom,
    AdobeLatin1,
}

impl FromStr for FontEncoding {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoding = match s.to_ascii_lowercase().as_str() {
            "unicode" | "utf-8" | "utf8" | "ucs-2" => FontEncoding::Unicode,
            "latin-1" | "latin1" | "iso-8859-1" => FontEncoding::Latin1,
            "symbol" => FontEncoding::Symbol,
            "appleroman" => FontEncoding::AppleRoman,
            "sjis" => FontEncoding::Sjis,
            "gb2312" => FontEncoding::Gb2312,
            "big5" => FontEncoding::Big5,
            "wansung" => FontEncoding::Wansung,
            "johab" => FontEncoding::Johab,
            "adobestandard" => FontEncoding::AdobeStandard,
            "adobeexpert" => FontEncoding::AdobeExpert,
            "adobecustom" => FontEncoding::AdobeCustom,
            "adobelatin1" => FontEncoding::AdobeLatin1,
            _ => return Err(FontLoadError::UnrecognizedFontEncoding(s.to_string()).into()),
        };
        Ok(encoding)
    }
}

/// Grid-fitting mode used when loading glyph outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hinting {
    /// Unhinted outlines
    None,
    /// Light smooth hinting for anti-aliased output
    #[default]
    Light,
    /// Strong hinting for 1-bit output
    Mono,
}

/// How glyph ink bounds are accumulated across a line
///
/// `SkipZero` leaves an edge untouched whenever the glyph's value for that
/// edge is exactly zero, so a glyph sitting on the origin never moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    #[default]
    SkipZero,
    Exact,
}

impl BoundsPolicy {
    /// Whether `value` may update an accumulated edge at all
    pub fn admits(self, value: F26Dot6) -> bool {
        match self {
            BoundsPolicy::SkipZero => !value.is_zero(),
            BoundsPolicy::Exact => true,
        }
    }
}

/// Stroke corner style for path primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Ink bounding box, `x1,y1` to `x2,y2`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Typographic measurements of a string in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TypeMetric {
    pub pixels_per_em: Point,
    pub ascent: f64,
    /// Negative below the baseline
    pub descent: f64,
    pub width: f64,
    pub height: f64,
    pub max_advance: f64,
    pub bounds: Bounds,
    /// Pen position after the last glyph
    pub origin: Point,
    pub underline_position: f64,
    pub underline_thickness: f64,
}

impl TypeMetric {
    /// Rounded line pitch, `ascent - descent + interline_spacing`
    pub fn line_height(&self, interline_spacing: f64) -> f64 {
        (self.ascent - self.descent + interline_spacing + 0.5).trunc()
    }
}

/// One shaped glyph, in 26.6 pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphemeInfo {
    pub index: GlyphId,
    pub x_offset: F26Dot6,
    pub y_offset: F26Dot6,
    pub x_advance: F26Dot6,
    /// Byte offset of the source character
    pub cluster: usize,
}

/// Face-wide metrics in font units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    pub ascender: f32,
    pub descender: f32,
    /// Baseline-to-baseline distance
    pub line_height: f32,
    pub max_advance: f32,
    pub underline_position: f32,
    pub underline_thickness: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapingParams {
    /// Horizontal pixels per em
    pub ppem: f32,
    /// Nominal size in points, for optical-size and tracking tables
    pub point_size: Option<f32>,
    pub direction: Direction,
    /// Feature settings such as `kern` or `-liga`
    pub features: Vec<String>,
    pub language: Option<String>,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            ppem: 12.0,
            point_size: None,
            direction: Direction::Undefined,
            features: Vec::new(),
            language: None,
        }
    }
}

impl ShapingParams {
    /// Splits a comma-separated feature list, dropping blanks
    pub fn parse_features(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Glyphs in visual order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapingResult {
    pub glyphs: Vec<GraphemeInfo>,
    pub direction: Direction,
}

/// What a resource reservation is counted against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Width,
    Height,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Width => "width",
            ResourceKind::Height => "height",
        }
    }
}
