//! PNG encoding of captured camera images.

use std::io::Cursor;
use std::path::Path;

use arcam_core::{ArcamError, ImageData, PngEncoder};
use base64::{engine::general_purpose, Engine as _};
use image::{ImageBuffer, Rgba};

/// Encodes images as PNG and then standard (padded) base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngBase64Encoder;

impl PngBase64Encoder {
    pub fn new() -> Self {
        Self
    }
}

impl PngEncoder for PngBase64Encoder {
    fn encode_base64(&self, image: &ImageData) -> arcam_core::Result<String> {
        let png = encode_png(image).map_err(|e| ArcamError::Encode(e.to_string()))?;
        Ok(general_purpose::STANDARD.encode(png))
    }
}

fn to_image_buffer(image: &ImageData) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, CaptureError> {
    if image.is_empty() {
        return Err(CaptureError::InvalidImageData);
    }
    ImageBuffer::from_raw(image.width(), image.height(), image.data().to_vec())
        .ok_or(CaptureError::InvalidImageData)
}

/// Encodes an RGBA image to a PNG buffer in memory.
pub fn encode_png(image: &ImageData) -> Result<Vec<u8>, CaptureError> {
    let img = to_image_buffer(image)?;
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Saves an RGBA image to disk.
///
/// The format is chosen from the extension (`.png`, `.jpg`, `.jpeg`).
///
/// # Errors
/// Returns an error if the file cannot be written or format is unsupported.
pub fn save_image(filename: impl AsRef<Path>, image: &ImageData) -> Result<(), CaptureError> {
    let path = filename.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = to_image_buffer(image)?;
    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(CaptureError::UnsupportedFormat(extension));
        }
    }

    Ok(())
}

/// Error type for capture and encoding operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}
