//! Portable pixel buffers read back from textures or camera feeds.

use crate::error::{ArcamError, Result};

/// Bytes per pixel of an [`ImageData`] buffer (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// A tightly packed RGBA8 image with top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Creates an image from raw RGBA8 bytes.
    ///
    /// Fails if `data` does not hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(ArcamError::InvalidImageData {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len(width, height))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row by row from the top-left.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.data[offset..offset + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Returns true if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * BYTES_PER_PIXEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_short_buffer() {
        let err = ImageData::new(2, 2, vec![0; 15]).unwrap_err();
        match err {
            ArcamError::InvalidImageData { expected, actual } => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pixel_access() {
        let mut data = vec![0u8; 3 * 2 * 4];
        // pixel (2, 1) starts at byte (1 * 3 + 2) * 4
        data[20..24].copy_from_slice(&[1, 2, 3, 4]);
        let image = ImageData::new(3, 2, data).unwrap();
        assert_eq!(image.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(image.pixel(3, 0), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn test_filled() {
        let image = ImageData::filled(4, 3, [10, 20, 30, 255]);
        assert_eq!(image.data().len(), 48);
        assert!(image.data().chunks(4).all(|px| px == [10, 20, 30, 255]));
        assert!(ImageData::filled(0, 5, [0; 4]).is_empty());
    }
}
