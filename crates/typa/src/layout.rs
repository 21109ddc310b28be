//! Line placement: where each line of a text block starts
//!
//! Every gravity has its own closed form. They are kept as separate match
//! arms because the east and south variants carry pixel adjustments that a
//! single general formula would lose.

use typa_core::types::{AffineMatrix, Align, Decoration, Geometry, Gravity, Point};
use typa_core::TypeMetric;

/// The box text is placed in, with its anchor offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Frame {
    /// The geometry box, defaulting to the whole canvas at `+0+0`
    pub fn new(geometry: Option<&Geometry>, canvas: (u32, u32)) -> Self {
        let width = geometry.and_then(|g| g.width).unwrap_or(canvas.0);
        let height = geometry.and_then(|g| g.height).unwrap_or(canvas.1);
        Self {
            width: f64::from(width),
            height: f64::from(height),
            tx: geometry.map_or(0.0, |g| g.x),
            ty: geometry.map_or(0.0, |g| g.y),
        }
    }
}

/// Position of one line within a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSlot {
    pub index: usize,
    pub count: usize,
}

/// Baseline start of a line in canvas space
///
/// `height` is the rounded line pitch. A zero frame dimension flips the
/// sign of the anchor offset on that axis.
pub fn line_offset(
    frame: &Frame,
    affine: &AffineMatrix,
    gravity: Gravity,
    align: Align,
    metrics: &TypeMetric,
    height: f64,
    slot: LineSlot,
) -> Point {
    let AffineMatrix { sx, rx, ry, sy, .. } = *affine;
    let (w_box, h_box) = (frame.width, frame.height);
    let (tx, ty) = (frame.tx, frame.ty);
    let flip_x = if w_box == 0.0 { -1.0 } else { 1.0 };
    let flip_y = if h_box == 0.0 { -1.0 } else { 1.0 };

    let i = slot.index as f64;
    let block = (slot.count.max(1) as f64 - 1.0) * height;
    let asc = metrics.ascent;
    let desc = metrics.descent;
    let w = metrics.width;
    let middle = (asc + desc - block) / 2.0;

    let line_x = i * ry * height;
    let line_y = i * sy * height;

    let (x, y) = match gravity {
        Gravity::Undefined => (tx + line_x, ty + line_y),
        Gravity::NorthWest => (
            flip_x * tx + line_x + ry * (asc + desc),
            flip_y * ty + line_y + sy * asc,
        ),
        Gravity::North => (
            flip_x * tx + w_box / 2.0 + line_x - sx * w / 2.0 + ry * (asc + desc),
            flip_y * ty + line_y + sy * asc - rx * w / 2.0,
        ),
        Gravity::NorthEast => (
            -flip_x * tx + w_box + line_x - sx * w + ry * (asc + desc) - 1.0,
            flip_y * ty + line_y + sy * asc - rx * w,
        ),
        Gravity::West => (
            flip_x * tx + line_x + ry * middle,
            flip_y * ty + h_box / 2.0 + line_y + sy * middle,
        ),
        Gravity::Center => (
            flip_x * tx + w_box / 2.0 + line_x - sx * w / 2.0 + ry * middle,
            flip_y * ty + h_box / 2.0 + line_y - rx * w / 2.0 + sy * middle,
        ),
        Gravity::East => (
            -flip_x * tx + w_box + line_x - sx * w + ry * middle - 1.0,
            flip_y * ty + h_box / 2.0 + line_y - rx * w + sy * middle,
        ),
        Gravity::SouthWest => (
            flip_x * tx + line_x - ry * block,
            -flip_y * ty + h_box + line_y - sy * block + desc,
        ),
        Gravity::South => (
            flip_x * tx + w_box / 2.0 + line_x - sx * w / 2.0 - ry * block / 2.0,
            -flip_y * ty + h_box + line_y - rx * w / 2.0 - sy * block + desc,
        ),
        Gravity::SouthEast => (
            -flip_x * tx + w_box + line_x - sx * w - ry * block - 1.0,
            -flip_y * ty + h_box + line_y - rx * w - sy * block + desc,
        ),
    };

    let (x, y) = match align {
        Align::Undefined => (x, y),
        Align::Left => (tx + line_x, ty + line_y),
        Align::Center => (tx + line_x - sx * w / 2.0, ty + line_y - rx * w / 2.0),
        Align::Right => (tx + line_x - sx * w, ty + line_y - rx * w),
    };
    Point::new(x, y)
}

/// Translation of the undercolor box drawn behind a line
pub fn undercolor_origin(affine: &AffineMatrix, offset: Point, metrics: &TypeMetric) -> Point {
    Point::new(
        offset.x - affine.ry * metrics.ascent,
        offset.y - affine.sy * metrics.ascent,
    )
}

/// Translation of a decoration line, or `None` without decoration
pub fn decoration_origin(
    decoration: Decoration,
    affine: &AffineMatrix,
    offset: Point,
    metrics: &TypeMetric,
    height: f64,
) -> Option<Point> {
    let shift = match decoration {
        Decoration::None => return None,
        Decoration::Overline => {
            affine.sy * (metrics.ascent + metrics.descent - metrics.underline_position)
        },
        Decoration::Underline => affine.sy * metrics.underline_position,
        Decoration::LineThrough => {
            affine.sy * (height + metrics.underline_position + 2.0 * metrics.descent) / 2.0
        },
    };
    Some(Point::new(offset.x, offset.y - shift))
}
