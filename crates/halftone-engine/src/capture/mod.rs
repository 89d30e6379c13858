//! Frame sources feeding the halftone pass.
//!
//! A source hands out CPU-side RGBA8 frames; the renderer uploads them into
//! the screen texture. Polling is paced by the caller (see `time::FramePacer`).

mod frame;
mod image_file;
mod pattern;

pub use frame::CapturedFrame;
pub use image_file::ImageFileSource;
pub use pattern::PatternSource;

use anyhow::Result;

/// Producer of screen frames.
pub trait FrameSource {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Returns the next frame if a new one is available.
    ///
    /// `Ok(None)` means nothing changed since the last poll. An `Err` means the
    /// source is unusable and capture should stop.
    fn poll_frame(&mut self) -> Result<Option<CapturedFrame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn poll_frame(&mut self) -> Result<Option<CapturedFrame>> {
        (**self).poll_frame()
    }
}
