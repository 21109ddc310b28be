//! Typa Core: the shared vocabulary of the text annotation pipeline
//!
//! Text goes in with a font reference and a layout (affine, gravity,
//! alignment, decoration) and comes out as pixels on a canvas plus a
//! [`TypeMetric`](types::TypeMetric). This crate holds everything the
//! stages agree on:
//!
//! - [`attrs`]: `DrawAttributes` and the `FontReference` that picks an engine
//! - [`types`]: metrics, glyph records, colors, geometry
//! - [`traits`]: fonts, layout engines, font lookup, drawing, limits
//! - [`canvas`] and [`compose`]: row-window pixel access and glyph blending
//! - [`path`] and [`primitive`]: structured outlines and the drawing grammar
//! - [`diagnostics`]: the warning/error collector
//!
//! Backends live in their own crates (`typa-shape-*`, `typa-render-*`); the
//! orchestration lives in `typa`.

pub mod attrs;
pub mod canvas;
pub mod compose;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fixed;
pub mod path;
pub mod primitive;
pub mod traits;
pub mod types;

pub use attrs::{DrawAttributes, FontQuery, FontReference};
pub use canvas::{Canvas, Paint, Pixel, PixelBuffer};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, TypaError};
pub use fixed::F26Dot6;
pub use types::{Color, Point, ShapingParams, TypeMetric};
