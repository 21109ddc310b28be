//! The raster surface text is drawn onto
//!
//! The pipeline never owns pixels. It asks the canvas for a window of one
//! row, edits it, and hands it back through `sync_row`. A sync can fail
//! (a pixel cache that went away, a read-only view); callers decide what
//! a failed row means for the call as a whole.

use std::sync::Arc;

use crate::error::{RenderError, Result};
use crate::types::Color;

/// A straight-alpha pixel with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Pixel {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color(self) -> Color {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Color::rgba(q(self.r), q(self.g), q(self.b), q(self.a))
    }
}

impl From<Color> for Pixel {
    fn from(c: Color) -> Self {
        Pixel {
            r: c.r as f32 / 255.0,
            g: c.g as f32 / 255.0,
            b: c.b as f32 / 255.0,
            a: c.a as f32 / 255.0,
        }
    }
}

/// Row-window access to a pixel surface
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Copies `width` pixels starting at `(x, y)` out of the surface
    ///
    /// The window must lie inside the surface.
    fn acquire_row(&mut self, x: u32, y: u32, width: u32) -> Result<Vec<Pixel>>;

    /// Writes a window obtained from `acquire_row` back to the surface
    fn sync_row(&mut self, x: u32, y: u32, pixels: &[Pixel]) -> Result<()>;
}

/// In-memory canvas
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::from(background); width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx] = pixel;
        }
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Packs the surface into 8-bit RGBA, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let c = p.to_color();
            out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn check_window(&self, x: u32, y: u32, width: u32) -> Result<()> {
        if y >= self.height || x.saturating_add(width) > self.width {
            return Err(RenderError::SyncFailed { y: y as i64 }.into());
        }
        Ok(())
    }
}

impl Canvas for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn acquire_row(&mut self, x: u32, y: u32, width: u32) -> Result<Vec<Pixel>> {
        self.check_window(x, y, width)?;
        let start = self.index(x, y);
        Ok(self.pixels[start..start + width as usize].to_vec())
    }

    fn sync_row(&mut self, x: u32, y: u32, pixels: &[Pixel]) -> Result<()> {
        self.check_window(x, y, pixels.len() as u32)?;
        let start = self.index(x, y);
        self.pixels[start..start + pixels.len()].copy_from_slice(pixels);
        Ok(())
    }
}

/// A fill or stroke source
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// An image tiled from the canvas origin
    Pattern(Arc<PixelBuffer>),
}

impl Paint {
    pub fn transparent() -> Self {
        Paint::Solid(Color::transparent())
    }

    /// Solid paint with zero alpha; patterns never count as transparent
    pub fn is_transparent(&self) -> bool {
        match self {
            Paint::Solid(c) => c.is_transparent(),
            Paint::Pattern(_) => false,
        }
    }

    /// Color at canvas pixel `(x, y)`
    pub fn sample(&self, x: i64, y: i64) -> Pixel {
        match self {
            Paint::Solid(c) => Pixel::from(*c),
            Paint::Pattern(image) => {
                if image.width() == 0 || image.height() == 0 {
                    return Pixel::default();
                }
                let px = x.rem_euclid(image.width() as i64) as u32;
                let py = y.rem_euclid(image.height() as i64) as u32;
                image.get(px, py).unwrap_or_default()
            },
        }
    }

    /// Representative color, used where a single name is needed
    pub fn color(&self) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Pattern(image) => image.get(0, 0).unwrap_or_default().to_color(),
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::black())
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}
