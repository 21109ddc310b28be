//! Export of annotated canvases
//!
//! A [`PixelBuffer`] goes out as PNG (through `image`, alpha kept) or as a
//! binary PNM (PPM for color, PGM for gray, alpha dropped).

use std::path::Path;

use typa_core::canvas::{Canvas, PixelBuffer};
use typa_core::error::{ExportError, Result};

pub mod png;
pub mod pnm;

pub use png::PngExporter;
pub use pnm::{PnmExporter, PnmFormat};

/// Encodes a canvas into one file format
pub trait Exporter {
    fn name(&self) -> &'static str;

    fn export(&self, canvas: &PixelBuffer) -> Result<Vec<u8>>;

    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}

/// Picks an exporter by file extension
pub fn exporter_for_extension(extension: &str) -> Result<Box<dyn Exporter>> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Ok(Box::new(PngExporter::new())),
        "ppm" | "pnm" => Ok(Box::new(PnmExporter::ppm())),
        "pgm" => Ok(Box::new(PnmExporter::pgm())),
        other => Err(ExportError::UnsupportedFormat(other.to_string()).into()),
    }
}

/// Writes `canvas` to `path` in the format its extension names
pub fn write_to_path(canvas: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let exporter = exporter_for_extension(extension)?;
    let bytes = exporter.export(canvas)?;
    std::fs::write(path, bytes)?;
    log::debug!(
        "Wrote {}x{} {} to {}",
        canvas.width(),
        canvas.height(),
        exporter.name(),
        path.display()
    );
    Ok(())
}
