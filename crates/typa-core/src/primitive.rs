//! The drawing primitive mini-grammar
//!
//! Three forms cross the boundary to a drawing engine:
//!
//! ```text
//! path '<path data>'
//! rectangle x1,y1 x2,y2
//! stroke <color> stroke-width <w> line x1,y1 x2,y2
//! ```
//!
//! Numbers are written the way C's `%g` writes them, so a primitive built
//! here reads the same as one a caller typed by hand.

use std::fmt;
use std::str::FromStr;

use crate::error::{PrimitiveError, TypaError};
use crate::path::{parse_path_data, to_path_data, PathCommand};
use crate::types::{Color, Point};

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path(Vec<PathCommand>),
    Rectangle {
        from: Point,
        to: Point,
    },
    Line {
        stroke: Color,
        stroke_width: f64,
        from: Point,
        to: Point,
    },
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = format_g;
        match self {
            Primitive::Path(commands) => write!(f, "path '{}'", to_path_data(commands)),
            Primitive::Rectangle { from, to } => write!(
                f,
                "rectangle {},{} {},{}",
                g(from.x),
                g(from.y),
                g(to.x),
                g(to.y)
            ),
            Primitive::Line {
                stroke,
                stroke_width,
                from,
                to,
            } => write!(
                f,
                "stroke {} stroke-width {} line {},{} {},{}",
                stroke.name(),
                g(*stroke_width),
                g(from.x),
                g(from.y),
                g(to.x),
                g(to.y)
            ),
        }
    }
}

impl FromStr for Primitive {
    type Err = TypaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (keyword, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();
        match keyword {
            "path" => {
                let data = rest
                    .strip_prefix('\'')
                    .and_then(|r| r.strip_suffix('\''))
                    .or_else(|| rest.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
                    .ok_or_else(|| malformed("path", "path data must be quoted"))?;
                Ok(Primitive::Path(parse_path_data(data)?))
            },
            "rectangle" => {
                let mut points = rest.split_whitespace().map(|t| parse_point("rectangle", t));
                let from = next_point(&mut points, "rectangle")?;
                let to = next_point(&mut points, "rectangle")?;
                Ok(Primitive::Rectangle { from, to })
            },
            "stroke" => {
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                match tokens.as_slice() {
                    [color, "stroke-width", width, "line", from, to] => Ok(Primitive::Line {
                        stroke: color.parse()?,
                        stroke_width: width
                            .parse()
                            .map_err(|_| malformed("line", format!("bad width `{}`", width)))?,
                        from: parse_point("line", from)?,
                        to: parse_point("line", to)?,
                    }),
                    _ => Err(malformed("line", s.to_string()).into()),
                }
            },
            other => Err(PrimitiveError::UnknownKeyword(other.to_string()).into()),
        }
    }
}

fn malformed(keyword: &'static str, detail: impl Into<String>) -> PrimitiveError {
    PrimitiveError::Malformed {
        keyword,
        detail: detail.into(),
    }
}

fn parse_point(keyword: &'static str, token: &str) -> Result<Point, TypaError> {
    let bad = || malformed(keyword, format!("bad point `{}`", token));
    let (x, y) = token.split_once(',').ok_or_else(bad)?;
    Ok(Point::new(
        x.parse().map_err(|_| bad())?,
        y.parse().map_err(|_| bad())?,
    ))
}

fn next_point(
    points: &mut impl Iterator<Item = Result<Point, TypaError>>,
    keyword: &'static str,
) -> Result<Point, TypaError> {
    points
        .next()
        .unwrap_or_else(|| Err(malformed(keyword, "missing point").into()))
}

/// Formats a number like C's `%g`: six significant digits, trailing zeros
/// dropped, exponent form outside `1e-4..1e6`
pub fn format_g(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sci = format!("{:.5e}", value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return value.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return value.to_string();
    };

    if !(-4..6).contains(&exp) {
        let mantissa = trim_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (5 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
