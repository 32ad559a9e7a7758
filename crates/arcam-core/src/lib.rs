//! Core abstractions for arcam.
//!
//! This crate provides the types and traits shared by the arcam crates:
//! - [`CameraIntrinsics`] and [`camera_intrinsics`] for deriving pinhole
//!   intrinsics from an XR projection matrix
//! - XR collaborator traits ([`XrFrame`], [`XrSessionManager`], [`XrExperienceFactory`])
//! - Capture pipeline traits ([`CameraTextureProvider`], [`TextureReadback`], [`PngEncoder`])
//! - Scene and overlay GUI descriptions
//! - Configuration options and errors

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod error;
pub mod gui;
pub mod image;
pub mod intrinsics;
pub mod observable;
pub mod options;
pub mod scene;
pub mod xr;

pub use capture::{CameraTextureProvider, PngEncoder, TextureReadback};
pub use error::{ArcamError, Result};
pub use gui::{
    Button, Color, Control, FullscreenUi, GuiLayer, HorizontalAlignment, Rect, RetainedGui,
    VerticalAlignment,
};
pub use image::ImageData;
pub use intrinsics::{camera_intrinsics, CameraIntrinsics, Viewport};
pub use observable::{Observable, ObserverId};
pub use options::{AppOptions, SessionMode, XrExperienceOptions, CAMERA_ACCESS_FEATURE};
pub use scene::{BoxMesh, CameraKind, DirectionalLight, Scene, SceneCamera, SceneRenderer};
pub use xr::{
    ReferenceSpace, ReferenceSpaceType, ViewerPose, XrCamera, XrExperienceFactory, XrEye, XrFrame,
    XrSessionManager, XrState, XrView,
};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Vec3, Vec4};
