//! Textures bound to the device camera image of an XR frame.

use arcam_core::{CameraTextureProvider, ImageData, ReferenceSpace, XrFrame};

use super::RenderEngine;

/// A GPU texture holding one frame's camera image.
///
/// Created fresh for each capture and dropped once read back.
#[derive(Debug)]
pub struct CameraTexture {
    texture: wgpu::Texture,
}

impl CameraTexture {
    /// The underlying wgpu texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}

impl RenderEngine {
    /// Uploads an RGBA image into a new sampleable, copyable texture.
    pub fn create_texture_from_image(
        &self,
        label: &str,
        image: &ImageData,
    ) -> Option<wgpu::Texture> {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        if image.is_empty() || image.width() > max_dimension || image.height() > max_dimension {
            log::debug!(
                "Cannot create {label}: {}x{} outside 1..={max_dimension}",
                image.width(),
                image.height()
            );
            return None;
        }

        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width() * 4),
                rows_per_image: Some(image.height()),
            },
            size,
        );

        Some(texture)
    }
}

impl CameraTextureProvider for RenderEngine {
    type Texture = CameraTexture;

    fn create_camera_texture<F: XrFrame + ?Sized>(
        &self,
        space: &ReferenceSpace,
        frame: &F,
    ) -> Option<CameraTexture> {
        let Some(pose) = frame.viewer_pose(space) else {
            log::debug!("No viewer pose in reference space {}", space.id);
            return None;
        };
        let Some(view) = pose.views.first() else {
            log::debug!("Viewer pose has no views");
            return None;
        };
        let Some(camera) = view.camera else {
            log::debug!("View exposes no camera");
            return None;
        };
        let Some(image) = frame.camera_image(&camera) else {
            log::debug!("Frame has no camera image");
            return None;
        };

        let texture = self.create_texture_from_image("camera texture", &image)?;
        Some(CameraTexture { texture })
    }
}
