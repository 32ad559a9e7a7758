//! Collaborators of the camera image capture pipeline.
//!
//! Capturing an image from a frame goes through three stages: a
//! [`CameraTextureProvider`] binds the frame's camera image to a texture, a
//! [`TextureReadback`] reads the texture back into an [`ImageData`], and a
//! [`PngEncoder`] turns the pixels into a base64 PNG string.

use std::future::Future;

use crate::error::Result;
use crate::image::ImageData;
use crate::xr::{ReferenceSpace, XrFrame};

/// Produces textures sourced from the device camera feed.
pub trait CameraTextureProvider {
    /// The texture type handed to readback.
    type Texture;

    /// Binds the camera image of `frame` to a new texture.
    ///
    /// Returns `None` when the session exposes no camera, the frame has no
    /// viewer pose in `space`, or the pose has no views. The texture is only
    /// valid for the frame that produced it and must not be cached.
    fn create_camera_texture<F: XrFrame + ?Sized>(
        &self,
        space: &ReferenceSpace,
        frame: &F,
    ) -> Option<Self::Texture>;
}

/// Reads texture contents back to CPU memory.
pub trait TextureReadback<T> {
    /// Reads the full pixel contents of `texture`.
    ///
    /// Returns `None` if the texture is invalid or the readback fails. No
    /// retry is attempted.
    fn read_texture_pixels(&self, texture: &T) -> impl Future<Output = Option<ImageData>>;
}

/// Encodes pixel buffers as base64 PNG strings.
pub trait PngEncoder {
    /// Encodes `image` as PNG and returns its standard base64 encoding.
    fn encode_base64(&self, image: &ImageData) -> Result<String>;
}
