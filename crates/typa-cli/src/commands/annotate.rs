//! `typa annotate`

use anyhow::{Context, Result};
use typa::{Annotator, Diagnostics, Paint, PixelBuffer};

use super::{font_attributes, report};
use crate::cli::AnnotateArgs;

pub fn run(args: &AnnotateArgs) -> Result<()> {
    let (width, height) = match (args.size.width, args.size.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
        _ => anyhow::bail!("Canvas size must be WxH, e.g. 400x100"),
    };

    let mut attrs = font_attributes(&args.text, &args.font)?;
    attrs.geometry = args.geometry;
    attrs.gravity = args.gravity;
    attrs.align = args.align;
    attrs.decorate = args.decorate;
    attrs.fill = Paint::Solid(args.fill);
    attrs.stroke = Paint::Solid(args.stroke);
    attrs.undercolor = args.undercolor;
    attrs.text_antialias = !args.no_antialias;

    let annotator = Annotator::new();
    let mut canvas = PixelBuffer::new(width, height, args.background);
    let mut diagnostics = Diagnostics::new();
    let outcome = annotator.annotate(&mut canvas, &attrs, &mut diagnostics);
    report(&diagnostics);
    outcome.context("Annotation failed")?;

    typa_export::write_to_path(&canvas, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote {}x{} canvas to {}", width, height, args.output.display());
    println!("{}", args.output.display());
    Ok(())
}
