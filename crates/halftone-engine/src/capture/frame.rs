use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

/// A tightly packed RGBA8 frame, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CapturedFrame {
    pub const BYTES_PER_PIXEL: u32 = 4;

    /// Wraps `pixels`, which must hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "frame has zero size ({width}x{height})");
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL as usize;
        anyhow::ensure!(
            pixels.len() == expected,
            "frame {width}x{height} needs {expected} bytes, got {}",
            pixels.len()
        );
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Largest size with the aspect ratio of `(width, height)` whose sides
    /// are at most `max_dim`. Sizes that already fit are returned unchanged;
    /// neither side drops below 1.
    pub fn fitted_size((width, height): (u32, u32), max_dim: u32) -> (u32, u32) {
        let max_dim = max_dim.max(1);
        if width <= max_dim && height <= max_dim {
            return (width, height);
        }
        let scale = max_dim as f64 / width.max(height) as f64;
        let side = |v: u32| ((v as f64 * scale).round() as u32).clamp(1, max_dim);
        (side(width), side(height))
    }

    /// Resamples the frame to `width x height` with a triangle filter.
    pub fn resized(&self, width: u32, height: u32) -> Result<Self> {
        let src = ImageBuffer::<Rgba<u8>, _>::from_raw(self.width, self.height, self.pixels.as_slice())
            .context("frame buffer does not match its size")?;
        let out = imageops::resize(&src, width, height, FilterType::Triangle);
        Self::new(width, height, out.into_raw())
    }

    /// RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}
