use std::path::Path;

use anyhow::{Context, Result};
use cs_core::frame::SourceFrame;
use cs_core::traits::FrameSource;

/// Source d'image statique. Retourne toujours la même frame.
///
/// L'image est convertie en luminance 8 bits au chargement.
///
/// # Example
/// ```no_run
/// use cs_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("test.png")).unwrap();
/// ```
pub struct ImageSource {
    frame: SourceFrame,
}

impl ImageSource {
    /// Load an image from disk and create a source.
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded.
    pub fn new(path: &Path) -> Result<Self> {
        let frame = load_luma(path)?;
        log::info!(
            "Image chargée : {} ({}×{})",
            path.display(),
            frame.width,
            frame.height
        );
        Ok(Self { frame })
    }
}

impl FrameSource for ImageSource {
    fn next_frame(&mut self) -> Option<SourceFrame> {
        Some(self.frame.clone())
    }

    fn native_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Decode an image file into a packed luminance frame.
///
/// # Errors
/// Returns an error if the image cannot be opened or decoded.
pub fn load_luma(path: &Path) -> Result<SourceFrame> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    Ok(SourceFrame::packed(width, height, luma.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trips_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.png");
        let img = image::GrayImage::from_fn(4, 2, |x, y| image::Luma([(x * 60 + y) as u8]));
        img.save(&path).unwrap();

        let mut source = ImageSource::new(&path).unwrap();
        assert_eq!(source.native_size(), (4, 2));
        assert!(!source.is_live());
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.row_stride, 4);
        assert_eq!(frame.bytes, vec![0, 60, 120, 180, 1, 61, 121, 181]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ImageSource::new(Path::new("/nonexistent/camscii.png")).is_err());
    }
}
