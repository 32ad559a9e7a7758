//! XR session collaborator types and traits.
//!
//! These describe what the application consumes from an XR runtime: a
//! session with a reference space and a state-change stream, and per-tick
//! frames that report a viewer pose and, when camera access was granted,
//! the device camera image.

use std::future::Future;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::image::ImageData;
use crate::observable::Observable;
use crate::options::XrExperienceOptions;

/// Kind of coordinate frame poses are reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceSpaceType {
    /// Origin tracks the viewer.
    Viewer,
    /// Origin near the viewer at session start.
    Local,
    /// Like `Local` with the origin on the floor.
    LocalFloor,
    /// Floor-level origin with a known boundary.
    BoundedFloor,
    /// Unrestricted real-world movement without recentering.
    #[default]
    Unbounded,
}

impl ReferenceSpaceType {
    /// Returns the WebXR spelling of this reference space type.
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceSpaceType::Viewer => "viewer",
            ReferenceSpaceType::Local => "local",
            ReferenceSpaceType::LocalFloor => "local-floor",
            ReferenceSpaceType::BoundedFloor => "bounded-floor",
            ReferenceSpaceType::Unbounded => "unbounded",
        }
    }
}

/// A reference space handed out by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceSpace {
    /// Session-unique identifier.
    pub id: u32,
    /// The space kind.
    pub kind: ReferenceSpaceType,
}

/// Which eye a view renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XrEye {
    /// Monoscopic view (handheld AR).
    #[default]
    None,
    Left,
    Right,
}

/// Camera image dimensions attached to a view when camera access is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrCamera {
    pub width: u32,
    pub height: u32,
}

/// A single view of a viewer pose.
#[derive(Debug, Clone, PartialEq)]
pub struct XrView {
    /// Eye this view is rendered for.
    pub eye: XrEye,
    /// Column-major projection matrix.
    pub projection_matrix: Mat4,
    /// View transform relative to the reference space.
    pub transform: Mat4,
    /// Device camera backing this view, if exposed.
    pub camera: Option<XrCamera>,
}

/// Viewer position, orientation and views for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerPose {
    /// Viewer transform relative to the reference space.
    pub transform: Mat4,
    /// Per-eye views. Handheld AR reports a single view.
    pub views: Vec<XrView>,
}

/// XR experience state, as reported to state-change observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrState {
    /// Session requested, not yet presenting.
    EnteringXr,
    /// Session is presenting.
    InXr,
    /// Session is shutting down.
    ExitingXr,
    /// No immersive session.
    NotInXr,
}

impl XrState {
    /// Returns true while an immersive session is presenting.
    pub fn is_in_xr(self) -> bool {
        matches!(self, XrState::InXr)
    }
}

/// A per-tick snapshot from the XR runtime.
///
/// Frames are only valid during the callback that receives them and must
/// not be retained.
pub trait XrFrame {
    /// Returns the viewer pose in `space`, if tracking is available.
    fn viewer_pose(&self, space: &ReferenceSpace) -> Option<ViewerPose>;

    /// Returns the camera image for `camera`, if the session exposes one.
    fn camera_image(&self, camera: &XrCamera) -> Option<ImageData>;
}

/// Handle to an acquired XR session.
pub trait XrSessionManager {
    /// The reference space requested at session creation.
    fn reference_space(&self) -> &ReferenceSpace;

    /// Current experience state.
    fn state(&self) -> XrState;

    /// Stream of experience state transitions.
    fn on_state_changed(&mut self) -> &mut Observable<XrState>;
}

/// Creates XR sessions.
pub trait XrExperienceFactory {
    /// The session type produced by this factory.
    type Session: XrSessionManager;

    /// Requests a session configured by `options`.
    fn create_default_xr_experience(
        &self,
        options: &XrExperienceOptions,
    ) -> impl Future<Output = Result<Self::Session>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_space_type_spelling() {
        assert_eq!(ReferenceSpaceType::Unbounded.as_str(), "unbounded");
        assert_eq!(ReferenceSpaceType::LocalFloor.as_str(), "local-floor");
        let json = serde_json::to_string(&ReferenceSpaceType::BoundedFloor).unwrap();
        assert_eq!(json, "\"bounded-floor\"");
    }

    #[test]
    fn test_in_xr() {
        assert!(XrState::InXr.is_in_xr());
        assert!(!XrState::EnteringXr.is_in_xr());
        assert!(!XrState::NotInXr.is_in_xr());
    }
}
