//! Subcommand implementations

pub mod annotate;
pub mod caption;
pub mod metrics;

use anyhow::{Context, Result};
use typa::{Diagnostics, DrawAttributes};

use crate::cli::FontArgs;

/// Attributes for `text` with the shared font options applied
pub fn font_attributes(text: &str, args: &FontArgs) -> Result<DrawAttributes> {
    let mut attrs = DrawAttributes::new()
        .with_text(text)
        .with_font(&args.font)
        .with_pointsize(args.pointsize);
    if let Some(family) = &args.family {
        attrs.set_family(family);
    }
    if let Some(density) = &args.density {
        attrs
            .set_density_string(density)
            .with_context(|| format!("Invalid density `{}`", density))?;
    }
    attrs.encoding = args.encoding.clone();
    attrs.features = args.features.clone();
    attrs.direction = args.direction;
    attrs.kerning = args.kerning;
    attrs.interword_spacing = args.interword_spacing;
    attrs.interline_spacing = args.interline_spacing;
    attrs.stroke_width = args.stroke_width;
    attrs.hinting = !args.no_hinting;
    Ok(attrs)
}

/// Prints collected warnings to stderr
pub fn report(diagnostics: &Diagnostics) {
    for entry in diagnostics.entries() {
        eprintln!("typa: {}", entry);
    }
}
