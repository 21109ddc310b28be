//! None Shaper - one glyph per code point, in logical order
//!
//! The layout used when no shaping engine is available. Each character is
//! looked up in the character map; a missing character becomes glyph 0.
//! Consecutive non-zero glyphs pick up the pair adjustment from the font's
//! `kern` table, applied to the earlier glyph's advance and negated for
//! right-to-left text. No bidi reordering happens here.

use std::sync::Arc;

use typa_core::{
    error::Result,
    traits::{FontRef, Shaper},
    types::{GraphemeInfo, ShapingResult},
    F26Dot6, ShapingParams,
};

/// Walks code points and applies `kern` pairs
pub struct NoneShaper;

impl NoneShaper {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for NoneShaper {
    fn name(&self) -> &'static str {
        "none"
    }

    fn supports_bidi(&self) -> bool {
        false
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        log::debug!("NoneShaper: Shaping {} chars", text.chars().count());

        let scale = f64::from(params.ppem) / f64::from(font.units_per_em().max(1));
        let sign = if params.direction.is_rtl() { -1.0 } else { 1.0 };

        let mut glyphs: Vec<GraphemeInfo> = Vec::with_capacity(text.len());
        let mut last_glyph = 0;
        for (cluster, ch) in text.char_indices() {
            let index = font.glyph_id(ch).unwrap_or(0);

            if index != 0 && last_glyph != 0 {
                if let (Some(kern), Some(previous)) =
                    (font.kerning(last_glyph, index), glyphs.last_mut())
                {
                    // Pair adjustments are grid-fitted to whole pixels
                    let pixels = (sign * f64::from(kern) * scale).round();
                    previous.x_advance += F26Dot6::from_f64(pixels);
                }
            }

            let advance = f64::from(font.advance_width(index)) * scale;
            glyphs.push(GraphemeInfo {
                index,
                x_offset: F26Dot6::ZERO,
                y_offset: F26Dot6::ZERO,
                x_advance: F26Dot6::from_f64_round(advance),
                cluster,
            });
            last_glyph = index;
        }

        Ok(ShapingResult {
            glyphs,
            direction: params.direction,
        })
    }
}
