//! Rendering backend for arcam.
//!
//! This crate provides the wgpu-based implementations of the arcam
//! collaborator traits:
//! - [`RenderEngine`] renders the scene (windowed or headless) and acts as
//!   camera texture provider and texture readback
//! - [`PngBase64Encoder`] encodes captured images as base64 PNG strings

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// Pixel sizes and row strides are bounded by texture limits
#![allow(clippy::cast_possible_truncation)]

pub mod engine;
pub mod error;
pub mod png;

pub use engine::{CameraTexture, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use png::{encode_png, save_image, CaptureError, PngBase64Encoder};
