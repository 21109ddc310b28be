//! Binary PNM export: PPM for color, PGM for gray

use std::io::Write;

use typa_core::canvas::{Canvas, PixelBuffer};
use typa_core::error::Result;

use crate::Exporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmFormat {
    /// `P5`, one luminance byte per pixel
    Pgm,
    /// `P6`, three bytes per pixel
    Ppm,
}

/// Binary PNM exporter; alpha is dropped
pub struct PnmExporter {
    format: PnmFormat,
}

impl PnmExporter {
    pub fn new(format: PnmFormat) -> Self {
        Self { format }
    }

    pub fn ppm() -> Self {
        Self::new(PnmFormat::Ppm)
    }

    pub fn pgm() -> Self {
        Self::new(PnmFormat::Pgm)
    }
}

impl Exporter for PnmExporter {
    fn name(&self) -> &'static str {
        match self.format {
            PnmFormat::Pgm => "pgm",
            PnmFormat::Ppm => "ppm",
        }
    }

    fn export(&self, canvas: &PixelBuffer) -> Result<Vec<u8>> {
        let (width, height) = (canvas.width(), canvas.height());
        let magic = match self.format {
            PnmFormat::Pgm => "P5",
            PnmFormat::Ppm => "P6",
        };
        let channels = if self.format == PnmFormat::Ppm { 3 } else { 1 };

        let mut output = Vec::with_capacity(16 + (width * height) as usize * channels);
        write!(&mut output, "{}\n{} {}\n255\n", magic, width, height)?;
        for rgba in canvas.to_rgba8().chunks_exact(4) {
            match self.format {
                PnmFormat::Ppm => output.extend_from_slice(&rgba[..3]),
                PnmFormat::Pgm => {
                    let (r, g, b) = (u32::from(rgba[0]), u32::from(rgba[1]), u32::from(rgba[2]));
                    output.push(((r * 299 + g * 587 + b * 114) / 1000) as u8);
                },
            }
        }
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        self.name()
    }

    fn mime_type(&self) -> &'static str {
        match self.format {
            PnmFormat::Pgm => "image/x-portable-graymap",
            PnmFormat::Ppm => "image/x-portable-pixmap",
        }
    }
}
