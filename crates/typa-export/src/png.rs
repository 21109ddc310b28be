//! PNG export through the `image` crate

use image::{ImageEncoder, RgbaImage};
use typa_core::canvas::{Canvas, PixelBuffer};
use typa_core::error::{ExportError, Result};

use crate::Exporter;

/// Encodes a canvas as 8-bit RGBA PNG
pub fn encode_png(canvas: &PixelBuffer) -> Result<Vec<u8>> {
    let (width, height) = (canvas.width(), canvas.height());
    let img = RgbaImage::from_raw(width, height, canvas.to_rgba8()).ok_or_else(|| {
        ExportError::EncodingFailed(format!("{}x{} buffer has the wrong size", width, height))
    })?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;
    Ok(png_data)
}

/// PNG exporter
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, canvas: &PixelBuffer) -> Result<Vec<u8>> {
        encode_png(canvas)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
