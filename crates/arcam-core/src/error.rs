//! Error types for arcam.

use thiserror::Error;

/// The main error type for arcam operations.
///
/// Expected absence along the frame-query pipeline (no session, no pose,
/// no view, no camera texture) is reported as `None`, not as an error.
#[derive(Error, Debug)]
pub enum ArcamError {
    /// The application has not acquired an XR session yet.
    #[error("XR session not initialized - call App::run_async() first")]
    NotInitialized,

    /// The XR session could not be created.
    #[error("XR session unavailable: {0}")]
    SessionUnavailable(String),

    /// Pixel buffer does not match its declared dimensions.
    #[error("invalid image data: expected {expected} bytes, got {actual}")]
    InvalidImageData { expected: usize, actual: usize },

    /// Image encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for arcam operations.
pub type Result<T> = std::result::Result<T, ArcamError>;
