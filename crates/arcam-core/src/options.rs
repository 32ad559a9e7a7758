//! Configuration options for arcam.

use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::xr::ReferenceSpaceType;

/// The optional feature that exposes the device camera image.
pub const CAMERA_ACCESS_FEATURE: &str = "camera-access";

/// XR session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// Non-immersive, rendered in page.
    Inline,
    /// Fully immersive virtual reality.
    ImmersiveVr,
    /// Camera pass-through augmented reality.
    #[default]
    ImmersiveAr,
}

/// Options used when requesting the XR experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XrExperienceOptions {
    /// Session mode to request.
    pub session_mode: SessionMode,
    /// Reference space to request for poses.
    pub reference_space_type: ReferenceSpaceType,
    /// Optional session features, in WebXR spelling.
    pub optional_features: Vec<String>,
}

impl XrExperienceOptions {
    /// Returns true if `feature` was requested.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.optional_features.iter().any(|f| f == feature)
    }
}

impl Default for XrExperienceOptions {
    fn default() -> Self {
        Self {
            session_mode: SessionMode::ImmersiveAr,
            reference_space_type: ReferenceSpaceType::Unbounded,
            optional_features: vec![CAMERA_ACCESS_FEATURE.to_string()],
        }
    }
}

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    /// XR session request.
    pub xr: XrExperienceOptions,

    /// Scene clear color (RGBA). Transparent so camera pass-through shows.
    pub clear_color: Vec4,

    /// Host window title.
    pub window_title: String,

    /// Initial host window width in logical pixels.
    pub window_width: u32,

    /// Initial host window height in logical pixels.
    pub window_height: u32,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            xr: XrExperienceOptions::default(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 0.0),
            window_title: "arcam".to_string(),
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl AppOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
