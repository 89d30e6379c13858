use anyhow::Result;

use super::{CapturedFrame, FrameSource};

/// Procedural test card: a left-to-right grey ramp over the top half and a
/// coloured checkerboard below it. Shows every dot radius at once.
pub struct PatternSource {
    width: u32,
    height: u32,
    delivered: bool,
}

impl PatternSource {
    const CHECKER: u32 = 32;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            delivered: false,
        }
    }

    /// Renders the test card.
    pub fn render(&self) -> Result<CapturedFrame> {
        let (w, h) = (self.width, self.height);
        let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);

        for y in 0..h {
            for x in 0..w {
                let px = if y < h / 2 {
                    let v = ((x as u64 * 255) / u64::from((w - 1).max(1))) as u8;
                    [v, v, v, 255]
                } else if ((x / Self::CHECKER) + (y / Self::CHECKER)) % 2 == 0 {
                    [230, 70, 50, 255]
                } else {
                    [40, 90, 200, 255]
                };
                pixels.extend_from_slice(&px);
            }
        }

        CapturedFrame::new(w, h, pixels)
    }
}

impl FrameSource for PatternSource {
    fn name(&self) -> &str {
        "test pattern"
    }

    fn poll_frame(&mut self) -> Result<Option<CapturedFrame>> {
        if self.delivered {
            return Ok(None);
        }
        self.delivered = true;
        self.render().map(Some)
    }
}
