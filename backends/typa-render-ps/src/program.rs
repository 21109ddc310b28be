//! PostScript program generation

use typa_core::attrs::{DrawAttributes, FontReference};
use typa_core::primitive::format_g;
use typa_core::types::Point;

/// Font used when no usable PostScript name is given
pub const DEFAULT_FONT: &str = "Times-Roman";

const REENCODE_PROCEDURE: &str = "/ReencodeType
{
  findfont dup length
  dict begin { 1 index /FID ne {def} {pop pop} ifelse } forall
  /Encoding ISOLatin1Encoding def currentdict end definefont pop
} bind def
";

/// A single-page program that shows one line of text
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub source: String,
    /// Page size in points, sampled so rotated text stays on the page
    pub extent: Point,
    /// The affine is a uniform scale; the text starts at the page origin
    pub identity: bool,
}

impl Program {
    /// Page size in whole points
    pub fn page_size(&self) -> (u32, u32) {
        let round = |v: f64| (v + 0.5).floor().max(0.0) as u32;
        (round(self.extent.x), round(self.extent.y))
    }
}

/// Escapes the characters that end or quote a PostScript string
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// The font name to select, or [`DEFAULT_FONT`]
pub fn font_name(attrs: &DrawAttributes) -> &str {
    let name = match &attrs.font {
        FontReference::PostscriptFont(name) => name.as_str(),
        _ => "",
    };
    if name.is_empty() || name.contains('/') {
        DEFAULT_FONT
    } else {
        name
    }
}

/// Samples the text's reach along the affine axes over `len + 3` positions
pub fn extent(attrs: &DrawAttributes, text: &str) -> Point {
    let m = &attrs.affine;
    let size = attrs.pointsize;
    let mut extent = Point::new(0.0, 0.0);
    for i in 0..=text.len() + 2 {
        let i = i as f64;
        let x = (m.sx * i * size + m.ry * 2.0 * size).abs();
        let y = (m.rx * i * size + m.sy * 2.0 * size).abs();
        extent.x = extent.x.max(x);
        extent.y = extent.y.max(y);
    }
    extent
}

pub fn build(attrs: &DrawAttributes, text: &str) -> Program {
    let m = &attrs.affine;
    let identity = m.is_identity_like();
    let extent = extent(attrs, text);
    let font = font_name(attrs);
    let escaped = escape_text(text);

    let mut source = String::from("%!PS-Adobe-3.0\n");
    source.push_str(REENCODE_PROCEDURE);
    let start_x = if identity { 0.0 } else { extent.x / 2.0 };
    source.push_str(&format!(
        "{} {} moveto\n",
        format_g(start_x),
        format_g(extent.y / 2.0)
    ));
    let size = format_g(attrs.pointsize);
    source.push_str(&format!("{size} {size} scale\n"));
    source.push_str(&format!("/{font}-ISO dup /{font} ReencodeType findfont setfont\n"));
    source.push_str(&format!(
        "[{} {} {} {} 0 0] concat\n",
        format_g(m.sx),
        format_g(-m.rx),
        format_g(-m.ry),
        format_g(m.sy)
    ));
    if !identity {
        source.push_str(&format!("({escaped}) stringwidth pop -0.5 mul -0.5 rmoveto\n"));
    }
    source.push_str(&format!("({escaped}) show\n"));
    source.push_str("showpage\n");

    Program {
        source,
        extent,
        identity,
    }
}
