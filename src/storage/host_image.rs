//! Host images: decoding files into RGBA channel buffers and writing them back.

use crate::config::CHANNELS;
use crate::error::{Error, Result};
use image::{ColorType, RgbaImage};
use log::info;
use std::path::Path;

/// File extensions whose encoders are lossy.
const LOSSY_EXTENSIONS: &[&str] = &["jpg", "jpeg", "avif"];

/// Whether writing to `path` would use a lossy encoder.
pub fn is_lossy_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| LOSSY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// An image held as a flat RGBA8 buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl HostImage {
    /// Decode an image file, forcing four channels.
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        info!("loaded {} ({}x{})", path.display(), width, height);

        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Wrap an existing RGBA buffer.
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(Error::Image(format!(
                "buffer of {} bytes does not match {}x{} RGBA ({} bytes)",
                pixels.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// A solid-colour image, handy as a carrier for tests and demos.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let image = RgbaImage::from_pixel(width, height, image::Rgba(color));
        Self {
            pixels: image.into_raw(),
            width,
            height,
        }
    }

    /// Encode to `path`, choosing the format from the extension.
    ///
    /// Lossy formats are refused since they would scramble the channel
    /// deltas that carry the message.
    pub fn save(&self, path: &Path) -> Result<()> {
        if is_lossy_path(path) {
            return Err(Error::LossyOutput(path.to_path_buf()));
        }

        image::save_buffer(path, &self.pixels, self.width, self.height, ColorType::Rgba8)?;
        info!("wrote {} ({}x{})", path.display(), self.width, self.height);
        Ok(())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channel slots available for embedding.
    pub fn capacity_slots(&self) -> usize {
        self.pixels.len()
    }

    /// The channel buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The channel buffer, mutably.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Release the channel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_solid_layout() {
        let image = HostImage::solid(3, 2, [255, 0, 0, 255]);
        assert_eq!(image.capacity_slots(), 24);
        assert_eq!(&image.pixels()[..8], &[255, 0, 0, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(HostImage::from_raw(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            HostImage::from_raw(vec![0; 15], 2, 2),
            Err(Error::Image(_))
        ));
    }

    #[test]
    fn test_png_roundtrip_is_exact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("carrier.png");

        let pixels: Vec<u8> = (0..(7 * 5 * 4)).map(|i| (i * 13 % 256) as u8).collect();
        let image = HostImage::from_raw(pixels.clone(), 7, 5).unwrap();
        image.save(&path).unwrap();

        let loaded = HostImage::open(&path).unwrap();
        assert_eq!(loaded.width(), 7);
        assert_eq!(loaded.height(), 5);
        assert_eq!(loaded.into_pixels(), pixels);
    }

    #[test]
    fn test_lossy_output_refused() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("carrier.JPG");

        let image = HostImage::solid(4, 4, [0, 0, 255, 255]);
        assert!(matches!(image.save(&path), Err(Error::LossyOutput(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(HostImage::open(&temp_dir.path().join("absent.png")).is_err());
    }

    #[test]
    fn test_is_lossy_path() {
        assert!(is_lossy_path(Path::new("a.jpeg")));
        assert!(is_lossy_path(Path::new("a.avif")));
        assert!(!is_lossy_path(Path::new("a.png")));
        // The webp encoder writes lossless output.
        assert!(!is_lossy_path(Path::new("a.webp")));
        assert!(!is_lossy_path(Path::new("noext")));
    }
}
