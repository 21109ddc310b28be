//! Pure Rust text shaping backend using harfrust
//!
//! Mixed-direction text is first split into visual runs with
//! `unicode-bidi`; each run is shaped on its own in its resolved direction,
//! so the output is already in visual order. Clusters point back into the
//! caller's string as byte offsets.

use std::str::FromStr;
use std::sync::Arc;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, Language, ShaperData,
    UnicodeBuffer,
};
use unicode_bidi::{BidiInfo, Level};

use typa_core::{
    error::{Result, ShapingError},
    traits::{FontRef, Shaper},
    types::{Direction, GraphemeInfo, ShapingResult},
    F26Dot6, ShapingParams,
};

/// Complex-script shaping powered by harfrust
pub struct HarfrustShaper;

impl HarfrustShaper {
    pub fn new() -> Self {
        Self
    }

    /// Parses feature strings such as `liga`, `-kern` or `ss01=1`
    fn parse_features(features: &[String]) -> Vec<Feature> {
        features
            .iter()
            .filter_map(|spec| match Feature::from_str(spec) {
                Ok(feature) => Some(feature),
                Err(err) => {
                    log::warn!("ignoring font feature `{spec}`: {err}");
                    None
                }
            })
            .collect()
    }

    fn paragraph_level(direction: Direction) -> Option<Level> {
        match direction {
            Direction::LeftToRight => Some(Level::ltr()),
            Direction::RightToLeft => Some(Level::rtl()),
            Direction::Undefined => None,
        }
    }

    /// Appends one shaped run, rebasing clusters onto the whole string
    fn extract_glyphs(
        buffer: &GlyphBuffer,
        scale: f64,
        cluster_base: usize,
        glyphs: &mut Vec<GraphemeInfo>,
    ) {
        let positions = buffer.glyph_positions();
        let infos = buffer.glyph_infos();

        for (info, pos) in infos.iter().zip(positions.iter()) {
            glyphs.push(GraphemeInfo {
                index: info.glyph_id,
                x_offset: F26Dot6::from_f64_round(f64::from(pos.x_offset) * scale),
                y_offset: F26Dot6::from_f64_round(f64::from(pos.y_offset) * scale),
                x_advance: F26Dot6::from_f64_round(f64::from(pos.x_advance) * scale),
                cluster: cluster_base + info.cluster as usize,
            });
        }
    }
}

impl Default for HarfrustShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "Harfrust"
    }

    fn supports_bidi(&self) -> bool {
        true
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        if text.is_empty() {
            return Ok(ShapingResult {
                glyphs: Vec::new(),
                direction: params.direction,
            });
        }

        let hr_font = HrFontRef::from_index(font.data(), font.face_index())
            .map_err(|_| ShapingError::UnparsableFont)?;
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(params.point_size)
            .build();

        let features = Self::parse_features(&params.features);
        let language = params
            .language
            .as_deref()
            .and_then(|lang| Language::from_str(lang).ok());
        let scale = f64::from(params.ppem) / f64::from(font.units_per_em().max(1));

        let bidi = BidiInfo::new(text, Self::paragraph_level(params.direction));
        let direction = match params.direction {
            Direction::Undefined => match bidi.paragraphs.first() {
                Some(para) if para.level.is_rtl() => Direction::RightToLeft,
                _ => Direction::LeftToRight,
            },
            explicit => explicit,
        };

        let mut glyphs = Vec::with_capacity(text.len());
        for para in &bidi.paragraphs {
            let (levels, runs) = bidi.visual_runs(para, para.range.clone());
            for run in runs {
                let rtl = levels.get(run.start).is_some_and(|level| level.is_rtl());
                let Some(run_text) = text.get(run.clone()) else {
                    continue;
                };

                let mut buffer = UnicodeBuffer::new();
                buffer.push_str(run_text);
                buffer.set_direction(if rtl {
                    HrDirection::RightToLeft
                } else {
                    HrDirection::LeftToRight
                });
                if let Some(lang) = &language {
                    buffer.set_language(lang.clone());
                }
                buffer.guess_segment_properties();

                let output = shaper.shape(buffer, &features);
                Self::extract_glyphs(&output, scale, run.start, &mut glyphs);
            }
        }

        log::debug!(
            "Harfrust: {} bytes -> {} glyphs at {}ppem",
            text.len(),
            glyphs.len(),
            params.ppem
        );

        Ok(ShapingResult { glyphs, direction })
    }
}
