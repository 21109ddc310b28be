//! Typa: text annotation and glyph rasterization
//!
//! [`Annotator`] is the entry point. It measures text
//! ([`Annotator::measure`], [`Annotator::measure_multiline`]), draws it
//! onto a [`Canvas`] ([`Annotator::annotate`]) and reflows captions to a
//! pixel width ([`Annotator::reflow_caption`]).
//!
//! The font reference on [`DrawAttributes`] decides which engine does the
//! work:
//!
//! - `@path`, a font file path or a family name goes to the outline engine
//!   (skrifa outlines, harfrust shaping, zeno rasterization)
//! - `-foundry-family-...` names go to the legacy engine installed in the
//!   [`BackendRegistry`]
//! - `^Name` goes to the PostScript interpreter
//!
//! # Feature Flags
//!
//! - `fontdb`: resolve family names against system font directories
//! - `shaping-hr`: shape with harfrust instead of the nominal glyph mapper
//! - `postscript`: render Type 1 fonts through Ghostscript

mod annotate;
mod caption;
pub mod dispatch;
pub mod layout;
pub mod outline;
pub mod registry;

pub use annotate::{split_lines, Annotator, AnnotatorBuilder, MultilineMetrics};
pub use registry::BackendRegistry;

pub use typa_core as core;
pub use typa_core::{
    error, traits, types, Canvas, Color, Diagnostic, Diagnostics, DrawAttributes, FontReference,
    Paint, PixelBuffer, Point, Result, Severity, TypaError, TypeMetric,
};

#[cfg(feature = "fontdb")]
pub use typa_fontdb as fontdb;

#[cfg(feature = "postscript")]
pub use typa_render_ps as postscript;

#[cfg(feature = "shaping-hr")]
pub use typa_shape_hr as shape_hr;

pub use typa_render_zeno as render_zeno;
pub use typa_shape_none as shape_none;
