//! This module contains utilities for loading images to be rendered on the map.

use quakemap_types::Size;

use crate::error::QuakeMapError;

/// An image that has been loaded into memory.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    bytes: Vec<u8>,
    size: Size<u32>,
}

impl DecodedImage {
    /// Decode an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA images
    /// will be converted to RGBA.
    pub fn decode(bytes: &[u8]) -> Result<Self, QuakeMapError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let size = Size::new(decoded.width(), decoded.height());

        Ok(Self {
            bytes: decoded.into_raw(),
            size,
        })
    }

    /// Creates an image from raw RGBA bytes.
    pub fn from_raw(bytes: Vec<u8>, size: Size<u32>) -> Result<Self, QuakeMapError> {
        if bytes.len() != size.width() as usize * size.height() as usize * 4 {
            return Err(QuakeMapError::Configuration(format!(
                "{} bytes do not make a {}x{} RGBA image",
                bytes.len(),
                size.width(),
                size.height()
            )));
        }

        Ok(Self { bytes, size })
    }

    /// Raw bytes of the image, in RGBA order.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width and height of the image.
    pub fn size(&self) -> Size<u32> {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    use super::*;

    #[test]
    fn decode_converts_to_rgba() {
        let image = RgbImage::from_pixel(2, 3, Rgb([10, 20, 30]));
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png).unwrap();

        let decoded = DecodedImage::decode(png.get_ref()).unwrap();
        assert_eq!(decoded.size(), Size::new(2, 3));
        assert_eq!(decoded.bytes().len(), 24);
        assert_eq!(&decoded.bytes()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_an_error() {
        let result = DecodedImage::decode(b"definitely not an image");
        assert!(matches!(result, Err(QuakeMapError::ImageDecode(_))));
    }

    #[test]
    fn raw_size_is_checked() {
        assert!(DecodedImage::from_raw(vec![0; 16], Size::new(2, 2)).is_ok());
        assert!(DecodedImage::from_raw(vec![0; 15], Size::new(2, 2)).is_err());
    }
}
