//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use typa::types::{Align, Decoration, Direction, Geometry, Gravity};
use typa::Color;

/// Typa - text annotation for raster images
#[derive(Parser, Debug)]
#[command(name = "typa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw text onto a new canvas and write it out
    #[command(alias = "a")]
    Annotate(Box<AnnotateArgs>),

    /// Print the metrics of a string as JSON
    #[command(alias = "m")]
    Metrics(MetricsArgs),

    /// Reflow text to fit a pixel width
    Caption(CaptionArgs),
}

/// Font and spacing options shared by every command
#[derive(Args, Debug, Clone)]
pub struct FontArgs {
    /// Font: a family or face name, a file path, `@path`, `-x-logical-font`
    /// or `^PostScriptName`
    #[arg(short = 'f', long = "font", default_value = "")]
    pub font: String,

    /// Comma-separated family list, tried in order
    #[arg(long = "family")]
    pub family: Option<String>,

    /// Point size
    #[arg(short = 's', long = "pointsize", default_value = "12")]
    pub pointsize: f64,

    /// Resolution, `X` or `XxY` dots per inch
    #[arg(long = "density")]
    pub density: Option<String>,

    /// Character map, e.g. Unicode, Symbol, Latin-1
    #[arg(long = "encoding")]
    pub encoding: Option<String>,

    /// OpenType features, e.g. `-liga,kern`
    #[arg(long = "features")]
    pub features: Option<String>,

    /// Text direction: auto, ltr, rtl
    #[arg(short = 'd', long = "direction", default_value = "auto")]
    pub direction: Direction,

    /// Extra pixels between glyphs
    #[arg(long = "kerning", default_value = "0")]
    pub kerning: f64,

    /// Advance used after a word, in pixels
    #[arg(long = "interword-spacing", default_value = "0")]
    pub interword_spacing: f64,

    /// Extra pixels between lines
    #[arg(long = "interline-spacing", default_value = "0")]
    pub interline_spacing: f64,

    /// Stroke width in pixels
    #[arg(long = "stroke-width", default_value = "1")]
    pub stroke_width: f64,

    /// Draw unhinted outlines
    #[arg(long = "no-hinting")]
    pub no_hinting: bool,
}

#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Text to draw; `\n` separates lines
    pub text: String,

    /// Output image (.png, .ppm or .pgm)
    #[arg(short = 'o', long = "output", default_value = "annotated.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub font: FontArgs,

    /// Canvas size, `WxH`
    #[arg(long = "size", default_value = "400x100")]
    pub size: Geometry,

    /// Placement box, `WxH+X+Y`
    #[arg(short = 'g', long = "geometry")]
    pub geometry: Option<Geometry>,

    #[arg(long = "gravity", default_value = "northwest")]
    pub gravity: Gravity,

    #[arg(long = "align", default_value = "undefined")]
    pub align: Align,

    /// none, underline, overline or line-through
    #[arg(long = "decorate", default_value = "none")]
    pub decorate: Decoration,

    #[arg(long = "background", default_value = "white")]
    pub background: Color,

    #[arg(long = "fill", default_value = "black")]
    pub fill: Color,

    #[arg(long = "stroke", default_value = "none")]
    pub stroke: Color,

    /// Box color behind each line
    #[arg(long = "undercolor", default_value = "none")]
    pub undercolor: Color,

    /// Render without antialiasing
    #[arg(long = "no-antialias")]
    pub no_antialias: bool,
}

#[derive(Parser, Debug)]
pub struct MetricsArgs {
    pub text: String,

    #[command(flatten)]
    pub font: FontArgs,

    /// Measure every line and report the widest with the block height
    #[arg(long = "multiline")]
    pub multiline: bool,
}

#[derive(Parser, Debug)]
pub struct CaptionArgs {
    pub text: String,

    #[command(flatten)]
    pub font: FontArgs,

    /// Maximum line width in pixels
    #[arg(short = 'w', long = "width")]
    pub width: u32,

    /// Break inside words that do not fit on a line of their own
    #[arg(long = "force-break")]
    pub force_break: bool,
}
