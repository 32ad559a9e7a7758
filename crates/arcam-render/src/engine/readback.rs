//! Asynchronous GPU texture readback.

use std::future::Future;

use arcam_core::image::BYTES_PER_PIXEL;
use arcam_core::{ImageData, TextureReadback};
use futures::channel::oneshot;

use super::{CameraTexture, RenderEngine};

/// Calculates bytes per row with proper alignment for wgpu buffer copies.
pub(crate) fn aligned_bytes_per_row(width: u32) -> u32 {
    let unaligned = width * BYTES_PER_PIXEL as u32;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unaligned.div_ceil(align) * align
}

/// Copies rows out of a padded staging buffer, optionally swapping B and R.
pub(crate) fn unpad_rows(
    padded: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    swap_red_blue: bool,
) -> Vec<u8> {
    let row_bytes = width as usize * BYTES_PER_PIXEL;
    let mut result = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * padded_bytes_per_row as usize;
        result.extend_from_slice(&padded[start..start + row_bytes]);
    }
    if swap_red_blue {
        for chunk in result.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.swap(0, 2);
        }
    }
    result
}

impl RenderEngine {
    /// Reads the full contents of an 8-bit RGBA or BGRA texture.
    ///
    /// Returns `None` for empty or unsupported textures, validation errors
    /// during the copy, or a failed buffer mapping.
    pub async fn read_texture_rgba(&self, texture: &wgpu::Texture) -> Option<ImageData> {
        let (width, height) = (texture.width(), texture.height());
        if width == 0 || height == 0 {
            log::warn!("Readback of empty texture skipped");
            return None;
        }
        if !texture.usage().contains(wgpu::TextureUsages::COPY_SRC) {
            log::warn!("Readback requires a COPY_SRC texture");
            return None;
        }
        let swap_red_blue = match texture.format() {
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
            other => {
                log::warn!("Readback of {other:?} textures is not supported");
                return None;
            }
        };

        let bytes_per_row = aligned_bytes_per_row(width);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback copy encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(error) = self.device.pop_error_scope().await {
            log::warn!("Texture readback failed: {error}");
            return None;
        }

        let buffer_slice = buffer.slice(..);
        let (tx, rx) = oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });

        match rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!("Readback buffer mapping failed: {e}");
                return None;
            }
            Err(_) => {
                log::warn!("Readback buffer mapping was cancelled");
                return None;
            }
        }

        let data = buffer_slice.get_mapped_range();
        let pixels = unpad_rows(&data, width, height, bytes_per_row, swap_red_blue);
        drop(data);
        buffer.unmap();

        ImageData::new(width, height, pixels).ok()
    }
}

impl TextureReadback<CameraTexture> for RenderEngine {
    fn read_texture_pixels(
        &self,
        texture: &CameraTexture,
    ) -> impl Future<Output = Option<ImageData>> {
        self.read_texture_rgba(texture.texture())
    }
}

impl TextureReadback<wgpu::Texture> for RenderEngine {
    fn read_texture_pixels(
        &self,
        texture: &wgpu::Texture,
    ) -> impl Future<Output = Option<ImageData>> {
        self.read_texture_rgba(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_bytes_per_row() {
        assert_eq!(aligned_bytes_per_row(1), 256);
        assert_eq!(aligned_bytes_per_row(64), 256);
        assert_eq!(aligned_bytes_per_row(65), 512);
        assert_eq!(aligned_bytes_per_row(640), 2560);
    }

    #[test]
    fn test_unpad_rows_strips_padding() {
        // 2x2 image, rows padded to 12 bytes
        let padded = [
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];
        let rows = unpad_rows(&padded, 2, 2, 12, false);
        assert_eq!(rows, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_unpad_rows_swaps_bgra() {
        let padded = [30, 20, 10, 255];
        assert_eq!(unpad_rows(&padded, 1, 1, 4, true), vec![10, 20, 30, 255]);
    }
}
