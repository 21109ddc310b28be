//! `typa metrics`

use anyhow::{Context, Result};
use serde_json::{json, Value};
use typa::{Annotator, Diagnostics, TypeMetric};

use super::{font_attributes, report};
use crate::cli::MetricsArgs;

pub fn run(args: &MetricsArgs) -> Result<()> {
    let attrs = font_attributes(&args.text, &args.font)?;
    let annotator = Annotator::new();
    let mut diagnostics = Diagnostics::new();

    let outcome = if args.multiline {
        annotator
            .measure_multiline(&attrs, &mut diagnostics)
            .map(|block| {
                let mut value = metrics_json(&block.metrics);
                value["lines"] = json!(block.lines);
                value
            })
    } else {
        annotator.measure(&attrs, &mut diagnostics).map(|m| metrics_json(&m))
    };
    report(&diagnostics);
    let value = outcome.context("Measuring failed")?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// The metrics as a JSON object
pub fn metrics_json(metrics: &TypeMetric) -> Value {
    json!({
        "pixels_per_em": { "x": metrics.pixels_per_em.x, "y": metrics.pixels_per_em.y },
        "ascent": metrics.ascent,
        "descent": metrics.descent,
        "width": metrics.width,
        "height": metrics.height,
        "max_advance": metrics.max_advance,
        "bounds": {
            "x1": metrics.bounds.x1,
            "y1": metrics.bounds.y1,
            "x2": metrics.bounds.x2,
            "y2": metrics.bounds.y2,
        },
        "origin": { "x": metrics.origin.x, "y": metrics.origin.y },
        "underline_position": metrics.underline_position,
        "underline_thickness": metrics.underline_thickness,
    })
}
