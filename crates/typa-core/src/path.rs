//! Structured outline paths
//!
//! Glyph outlines travel through the pipeline as `PathCommand` lists. They
//! only become text (the `M`/`L`/`Q`/`C` path-data syntax) when handed to a
//! drawing engine.

use std::fmt::Write;

use crate::error::{PrimitiveError, Result};
use crate::primitive::format_g;
use crate::types::{AffineMatrix, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

impl PathCommand {
    /// Applies `f` to every point the command carries
    pub fn map_points(self, mut f: impl FnMut(Point) -> Point) -> PathCommand {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
            PathCommand::QuadTo(c, p) => PathCommand::QuadTo(f(c), f(p)),
            PathCommand::CubicTo(c1, c2, p) => PathCommand::CubicTo(f(c1), f(c2), f(p)),
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// Control-point bounding box, `(min, max)`
pub fn control_bounds(commands: &[PathCommand]) -> Option<(Point, Point)> {
    let mut bounds: Option<(Point, Point)> = None;
    let mut include = |p: Point| {
        let (min, max) = bounds.get_or_insert((p, p));
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    };
    for cmd in commands {
        cmd.map_points(|p| {
            include(p);
            p
        });
    }
    bounds
}

pub fn transform(commands: &[PathCommand], matrix: &AffineMatrix) -> Vec<PathCommand> {
    commands
        .iter()
        .map(|cmd| cmd.map_points(|p| matrix.apply(p)))
        .collect()
}

/// Serializes commands as path data, e.g. `M0,0L10,0Q12,0 12,2Z`
pub fn to_path_data(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    let g = format_g;
    for cmd in commands {
        // Writing to a String cannot fail
        let _ = match *cmd {
            PathCommand::MoveTo(p) => write!(out, "M{},{}", g(p.x), g(p.y)),
            PathCommand::LineTo(p) => write!(out, "L{},{}", g(p.x), g(p.y)),
            PathCommand::QuadTo(c, p) => {
                write!(out, "Q{},{} {},{}", g(c.x), g(c.y), g(p.x), g(p.y))
            },
            PathCommand::CubicTo(c1, c2, p) => write!(
                out,
                "C{},{} {},{} {},{}",
                g(c1.x),
                g(c1.y),
                g(c2.x),
                g(c2.y),
                g(p.x),
                g(p.y)
            ),
            PathCommand::Close => write!(out, "Z"),
        };
    }
    out
}

/// Parses absolute `M`, `L`, `Q`, `C` and `Z` path data
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>> {
    let malformed = |detail: String| PrimitiveError::Malformed {
        keyword: "path",
        detail,
    };

    let mut commands = Vec::new();
    let mut chars = data.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        if ch.is_whitespace() || ch == ',' {
            continue;
        }
        let arity = match ch {
            'M' | 'L' => 2,
            'Q' => 4,
            'C' => 6,
            'Z' | 'z' => {
                commands.push(PathCommand::Close);
                continue;
            },
            other => return Err(malformed(format!("unexpected `{}` at {}", other, start)).into()),
        };

        // Numbers run until the next command letter
        let mut end = data.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
                end = i;
                break;
            }
            chars.next();
        }
        let args: Vec<f64> = data[start + 1..end]
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| malformed(format!("{} in `{}`", e, &data[start..end])))?;
        if args.is_empty() || args.len() % arity != 0 {
            return Err(malformed(format!("`{}` needs {} numbers", ch, arity)).into());
        }

        for (n, chunk) in args.chunks(arity).enumerate() {
            let p = |i: usize| Point::new(chunk[i], chunk[i + 1]);
            let cmd = match ch {
                // Extra pairs after a move are implicit line-tos
                'M' if n == 0 => PathCommand::MoveTo(p(0)),
                'M' | 'L' => PathCommand::LineTo(p(0)),
                'Q' => PathCommand::QuadTo(p(0), p(2)),
                _ => PathCommand::CubicTo(p(0), p(2), p(4)),
            };
            commands.push(cmd);
        }
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PathCommand> {
        vec![
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(10.5, 0.0)),
            PathCommand::QuadTo(Point::new(12.0, 0.0), Point::new(12.0, -2.25)),
            PathCommand::CubicTo(
                Point::new(12.0, -4.0),
                Point::new(4.0, -4.0),
                Point::new(0.0, 0.0),
            ),
            PathCommand::Close,
        ]
    }

    #[test]
    fn test_path_data_format() {
        assert_eq!(
            to_path_data(&sample()),
            "M0,0L10.5,0Q12,0 12,-2.25C12,-4 4,-4 0,0Z"
        );
    }

    #[test]
    fn test_parse_reads_back() {
        let parsed = parse_path_data(&to_path_data(&sample())).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_parse_implicit_lineto_and_exponent() {
        let parsed = parse_path_data("M 1 2 3 4 L1e1,2").unwrap();
        assert_eq!(
            parsed,
            vec![
                PathCommand::MoveTo(Point::new(1.0, 2.0)),
                PathCommand::LineTo(Point::new(3.0, 4.0)),
                PathCommand::LineTo(Point::new(10.0, 2.0)),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_path_data("M1").is_err());
        assert!(parse_path_data("X1,2").is_err());
        assert!(parse_path_data("L1,a").is_err());
    }

    #[test]
    fn test_control_bounds() {
        let (min, max) = control_bounds(&sample()).unwrap();
        assert_eq!((min.x, min.y, max.x, max.y), (0.0, -4.0, 12.0, 0.0));
        assert!(control_bounds(&[]).is_none());
    }

    #[test]
    fn test_transform() {
        let moved = transform(&sample()[..1], &AffineMatrix::translate(2.0, 3.0));
        assert_eq!(moved, vec![PathCommand::MoveTo(Point::new(2.0, 3.0))]);
    }
}
