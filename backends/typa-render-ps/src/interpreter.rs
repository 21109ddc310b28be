//! Running a PostScript program through an external interpreter

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use image::{GrayImage, ImageFormat};
use typa_core::config;
use typa_core::error::{RenderError, Result};
use typa_core::types::Density;

/// Turns a one-page program into a grayscale raster, black ink on white
pub trait Interpreter: Send + Sync {
    fn name(&self) -> &str;

    /// Rasterizes `program` onto a page of `page` points at `density`
    fn rasterize(
        &self,
        program: &str,
        page: (u32, u32),
        density: Density,
        antialias: bool,
    ) -> Result<GrayImage>;
}

/// Ghostscript, fed on stdin and read back as PNG from stdout
#[derive(Debug, Clone)]
pub struct Ghostscript {
    executable: PathBuf,
}

impl Ghostscript {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The interpreter named by `TYPA_GHOSTSCRIPT`, or `gs`
    pub fn from_env() -> Self {
        Self::new(config::global().ghostscript.clone())
    }

    fn arguments(page: (u32, u32), density: Density, antialias: bool) -> Vec<String> {
        let pixels = |points: u32, dpi: f64| {
            ((f64::from(points) * dpi / Density::DEFAULT_RESOLUTION) + 0.5).floor().max(1.0) as u32
        };
        let alpha_bits = if antialias { 4 } else { 1 };
        vec![
            "-q".to_string(),
            "-dNOPAUSE".to_string(),
            "-dBATCH".to_string(),
            "-dSAFER".to_string(),
            "-sDEVICE=pnggray".to_string(),
            format!("-r{}x{}", density.x, density.y),
            format!("-g{}x{}", pixels(page.0, density.x), pixels(page.1, density.y)),
            "-dFIXEDMEDIA".to_string(),
            format!("-dTextAlphaBits={alpha_bits}"),
            format!("-dGraphicsAlphaBits={alpha_bits}"),
            "-sOutputFile=-".to_string(),
            "-".to_string(),
        ]
    }
}

impl Default for Ghostscript {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Interpreter for Ghostscript {
    fn name(&self) -> &str {
        "ghostscript"
    }

    fn rasterize(
        &self,
        program: &str,
        page: (u32, u32),
        density: Density,
        antialias: bool,
    ) -> Result<GrayImage> {
        let failed = |detail: String| RenderError::DelegateFailed(detail);
        let args = Self::arguments(page, density, antialias);
        log::debug!("{} {}", self.executable.display(), args.join(" "));

        let mut child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed(format!("{}: {}", self.executable.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(program.as_bytes())
                .map_err(|e| failed(format!("writing program: {e}")))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| failed(format!("waiting for interpreter: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{} ({})", output.status, stderr.trim())).into());
        }

        let page = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)
            .map_err(|e| failed(format!("decoding page: {e}")))?;
        Ok(page.to_luma8())
    }
}
