//! arcam: augmented-reality session orchestration with camera capture.
//!
//! arcam sets up an AR session with camera pass-through, a small 3D scene
//! and an overlay button, and extracts camera data from XR frames:
//!
//! - [`App::camera_intrinsics_from_frame`] derives focal length and
//!   principal point from a view's projection matrix
//! - [`App::camera_image_base64_from_frame`] reads the camera image back
//!   from the GPU and encodes it as a base64 PNG
//!
//! # Quick Start
//!
//! ```no_run
//! use arcam::*;
//! use pollster::FutureExt;
//!
//! fn main() -> Result<()> {
//!     let engine = RenderEngine::new_headless(640, 480).block_on()?;
//!     let gui = RetainedGui::new();
//!     let mut app = App::new(engine, gui, PngBase64Encoder::new(), AppOptions::default());
//!     app.run_async(&SimulatedXr::new()).block_on()?;
//!
//!     let session = app.session_mut().expect("session");
//!     session.enter_xr();
//!     let frame = session.next_frame();
//!
//!     if let Some(k) = app.camera_intrinsics_from_frame(&frame) {
//!         println!("fx = {}", k.focal_length_x);
//!     }
//!     let png = app.camera_image_base64_from_frame(&frame).block_on()?;
//!     println!("captured: {}", png.is_some());
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod frame_query;
pub mod host;
pub mod sim;

pub use app::{build_gui, init_scene, App, AppState, OVERLAY_NAME};
pub use frame_query::{camera_image_base64_from_frame, camera_intrinsics_from_frame};
pub use sim::{SimulatedFrame, SimulatedSession, SimulatedXr};

// Re-export core types
pub use arcam_core::{
    camera_intrinsics, AppOptions, ArcamError, Button, CameraIntrinsics, CameraTextureProvider,
    Control, FullscreenUi, GuiLayer, ImageData, Mat4, Observable, PngEncoder, ReferenceSpace,
    ReferenceSpaceType, Result, RetainedGui, Scene, SceneRenderer, SessionMode, TextureReadback,
    Vec3, Vec4, ViewerPose, Viewport, XrCamera, XrExperienceFactory, XrExperienceOptions, XrEye,
    XrFrame, XrSessionManager, XrState, XrView,
};

// Re-export render types
pub use arcam_render::{CameraTexture, PngBase64Encoder, RenderEngine};

/// Opens the desktop host window with the simulated XR device.
///
/// This function blocks until the window is closed.
pub fn show(options: AppOptions) -> Result<()> {
    host::run(options)
}
