//! `typa caption`

use anyhow::{Context, Result};
use typa::{Annotator, Diagnostics};

use super::{font_attributes, report};
use crate::cli::CaptionArgs;

pub fn run(args: &CaptionArgs) -> Result<()> {
    let mut attrs = font_attributes(&args.text, &args.font)?;
    let annotator = Annotator::new();
    let mut diagnostics = Diagnostics::new();

    let outcome =
        annotator.reflow_caption(&mut attrs, args.width, args.force_break, &mut diagnostics);
    report(&diagnostics);
    let lines = outcome.context("Caption reflow failed")?;

    log::info!("Caption fits {}px in {} line(s)", args.width, lines);
    println!("{}", attrs.text.unwrap_or_default());
    Ok(())
}
