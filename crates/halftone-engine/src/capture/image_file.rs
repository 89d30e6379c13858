use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

use super::{CapturedFrame, FrameSource};

/// Frames decoded from an image file on disk.
///
/// The file is decoded on the first poll and again whenever its modification
/// time changes, so an external screenshot tool writing to the same path
/// drives the overlay. Once a frame has been delivered, later read or decode
/// failures (e.g. a half-written file) are logged and the previous frame stays
/// on screen.
pub struct ImageFileSource {
    path: PathBuf,
    name: String,
    last_modified: Option<SystemTime>,
    delivered: bool,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            last_modified: None,
            delivered: false,
        }
    }

    /// Decodes `path` into an RGBA8 frame.
    pub fn decode(path: &Path) -> Result<CapturedFrame> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        CapturedFrame::new(width, height, image.into_raw())
    }

    fn modified(&self) -> Result<Option<SystemTime>> {
        let meta = std::fs::metadata(&self.path)
            .with_context(|| format!("failed to stat {}", self.path.display()))?;
        Ok(meta.modified().ok())
    }
}

impl FrameSource for ImageFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll_frame(&mut self) -> Result<Option<CapturedFrame>> {
        if !self.delivered {
            self.last_modified = self.modified()?;
            let frame = Self::decode(&self.path)?;
            log::info!("loaded {} ({}x{})", self.name, frame.width(), frame.height());
            self.delivered = true;
            return Ok(Some(frame));
        }

        let modified = match self.modified() {
            Ok(m) => m,
            Err(e) => {
                log::debug!("{e:#}");
                return Ok(None);
            }
        };
        if modified.is_none() || modified == self.last_modified {
            return Ok(None);
        }
        self.last_modified = modified;

        match Self::decode(&self.path) {
            Ok(frame) => {
                log::debug!("reloaded {} ({}x{})", self.name, frame.width(), frame.height());
                Ok(Some(frame))
            }
            Err(e) => {
                log::warn!("keeping previous frame: {e:#}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn write_png(path: &Path, w: u32, h: u32, rgba: [u8; 4]) {
        image::RgbaImage::from_pixel(w, h, image::Rgba(rgba)).save(path).unwrap();
    }

    fn touch(path: &Path, at: SystemTime) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(at).unwrap();
    }

    #[test]
    fn first_poll_decodes_then_idles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        write_png(&path, 3, 2, [10, 20, 30, 255]);

        let mut src = ImageFileSource::new(&path);
        let frame = src.poll_frame().unwrap().unwrap();
        assert_eq!(frame.size(), (3, 2));
        assert_eq!(frame.pixel(2, 1), Some([10, 20, 30, 255]));

        assert!(src.poll_frame().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_an_error_before_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = ImageFileSource::new(dir.path().join("absent.png"));
        assert!(src.poll_frame().is_err());
    }

    #[test]
    fn modified_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        write_png(&path, 2, 2, [0, 0, 0, 255]);
        touch(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let mut src = ImageFileSource::new(&path);
        assert!(src.poll_frame().unwrap().is_some());

        write_png(&path, 4, 4, [255, 255, 255, 255]);
        touch(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(2_000));

        let frame = src.poll_frame().unwrap().expect("reload after mtime change");
        assert_eq!(frame.size(), (4, 4));
        assert!(src.poll_frame().unwrap().is_none());
    }

    #[test]
    fn corrupt_update_keeps_previous_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        write_png(&path, 2, 2, [0, 0, 0, 255]);
        touch(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let mut src = ImageFileSource::new(&path);
        assert!(src.poll_frame().unwrap().is_some());

        std::fs::write(&path, b"not a png").unwrap();
        touch(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(2_000));
        assert!(src.poll_frame().unwrap().is_none());
    }

    #[test]
    fn deleted_file_after_first_frame_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        write_png(&path, 2, 2, [0, 0, 0, 255]);

        let mut src = ImageFileSource::new(&path);
        assert!(src.poll_frame().unwrap().is_some());
        std::fs::remove_file(&path).unwrap();
        assert!(src.poll_frame().unwrap().is_none());
    }
}
