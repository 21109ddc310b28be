//! Caption reflow: breaking text so each line fits a pixel width

use typa_core::attrs::DrawAttributes;
use typa_core::diagnostics::Diagnostics;
use typa_core::error::Result;

use crate::annotate::Annotator;

impl Annotator {
    /// Rewrites `attrs.text` with line breaks so lines fit `max_width`
    ///
    /// The running line is measured after every character. When it gets
    /// too wide, the last whitespace on it becomes a newline. Without one,
    /// `force_break` puts a newline before the character that overflowed;
    /// otherwise the line is left long. Returns the number of lines, `0`
    /// for empty text.
    ///
    /// If a measurement fails the text keeps the breaks made so far and
    /// the error is returned.
    pub fn reflow_caption(
        &self,
        attrs: &mut DrawAttributes,
        max_width: u32,
        force_break: bool,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize> {
        let mut chars: Vec<char> = attrs.text.as_deref().unwrap_or_default().chars().collect();
        if chars.is_empty() {
            return Ok(0);
        }

        let limit = f64::from(max_width);
        let mut running = attrs.for_metrics();
        let mut line_start = 0;
        let mut space: Option<usize> = None;
        let mut i = 0;
        let mut failure = None;

        while i < chars.len() {
            let ch = chars[i];
            if ch == '\n' {
                line_start = i + 1;
                space = None;
                i += 1;
                continue;
            }
            if ch.is_whitespace() {
                space = Some(i);
            }

            running.set_text(chars[line_start..=i].iter().collect::<String>());
            let metrics = match self.measure_line(&running, diagnostics) {
                Ok(metrics) => metrics,
                Err(err) => {
                    failure = Some(err);
                    break;
                },
            };
            let width = (metrics.width + attrs.stroke_width + 0.5).floor();
            if width <= limit {
                i += 1;
                continue;
            }

            match space {
                Some(at) => {
                    chars[at] = '\n';
                    line_start = at + 1;
                    i = at + 1;
                },
                None if force_break && i > line_start => {
                    chars.insert(i, '\n');
                    line_start = i + 1;
                    i += 1;
                },
                None => i += 1,
            }
            space = None;
        }

        let text: String = chars.into_iter().collect();
        let lines = text.matches('\n').count() + 1;
        log::debug!("Caption reflowed to {} lines at {}px", lines, max_width);
        attrs.set_text(text);
        match failure {
            Some(err) => Err(err),
            None => Ok(lines),
        }
    }
}
