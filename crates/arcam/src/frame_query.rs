//! Per-frame camera queries.
//!
//! Both queries take the session and their collaborators explicitly. Every
//! missing precondition (no pose, no view, no camera, no texture, failed
//! readback) short-circuits to `None`; partial results are never returned.

use arcam_core::{
    camera_intrinsics, CameraIntrinsics, CameraTextureProvider, PngEncoder, Result, TextureReadback,
    Viewport, XrFrame, XrSessionManager,
};

/// Derives camera intrinsics from the first view of `frame`.
///
/// The viewport is the full camera image of that view.
pub fn camera_intrinsics_from_frame<S, F>(session: &S, frame: &F) -> Option<CameraIntrinsics>
where
    S: XrSessionManager + ?Sized,
    F: XrFrame + ?Sized,
{
    let space = session.reference_space();

    let Some(pose) = frame.viewer_pose(space) else {
        log::debug!("Intrinsics unavailable: no viewer pose");
        return None;
    };
    let Some(view) = pose.views.first() else {
        log::debug!("Intrinsics unavailable: viewer pose has no views");
        return None;
    };
    let Some(camera) = view.camera else {
        log::debug!("Intrinsics unavailable: view has no camera");
        return None;
    };

    let viewport = Viewport::full_frame(camera.width, camera.height);
    Some(camera_intrinsics(&view.projection_matrix, &viewport))
}

/// Captures the camera image of `frame` as a base64 PNG string.
///
/// Returns `Ok(None)` when no camera texture is available or readback
/// fails; the encoder is not invoked in either case. Encoder failures are
/// returned as errors.
pub async fn camera_image_base64_from_frame<S, T, R, F>(
    session: &S,
    textures: &T,
    readback: &R,
    encoder: &dyn PngEncoder,
    frame: &F,
) -> Result<Option<String>>
where
    S: XrSessionManager + ?Sized,
    T: CameraTextureProvider + ?Sized,
    R: TextureReadback<T::Texture> + ?Sized,
    F: XrFrame + ?Sized,
{
    let space = session.reference_space();

    let Some(texture) = textures.create_camera_texture(space, frame) else {
        log::debug!("Camera image unavailable: no camera texture");
        return Ok(None);
    };
    let image = readback.read_texture_pixels(&texture).await;
    drop(texture);

    let Some(image) = image else {
        log::debug!("Camera image unavailable: readback failed");
        return Ok(None);
    };

    encoder.encode_base64(&image).map(Some)
}
