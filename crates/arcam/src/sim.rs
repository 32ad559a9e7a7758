//! A software XR device.
//!
//! Lets the application run on machines without XR hardware: the session
//! reports a slowly orbiting viewer with a single handheld-style view, and,
//! when camera access was requested in an immersive AR session, a synthetic
//! camera image.

use std::future::Future;

use arcam_core::{
    ArcamError, ImageData, Mat4, Observable, ReferenceSpace, ReferenceSpaceType, Result,
    SessionMode, Vec3, ViewerPose, XrCamera, XrExperienceFactory, XrExperienceOptions, XrEye,
    XrFrame, XrSessionManager, XrState, XrView, CAMERA_ACCESS_FEATURE,
};

/// Factory for simulated XR sessions.
#[derive(Debug, Clone)]
pub struct SimulatedXr {
    camera_width: u32,
    camera_height: u32,
    vertical_fov: f32,
    failure: Option<String>,
}

impl Default for SimulatedXr {
    fn default() -> Self {
        Self {
            camera_width: 640,
            camera_height: 480,
            vertical_fov: 60f32.to_radians(),
            failure: None,
        }
    }
}

impl SimulatedXr {
    /// A device with a 640x480 camera and 60 degree vertical field of view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the camera image size.
    #[must_use]
    pub fn with_camera_size(mut self, width: u32, height: u32) -> Self {
        self.camera_width = width;
        self.camera_height = height;
        self
    }

    /// Sets the vertical field of view in radians.
    #[must_use]
    pub fn with_vertical_fov(mut self, radians: f32) -> Self {
        self.vertical_fov = radians;
        self
    }

    /// Makes every session request fail with `reason`.
    #[must_use]
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    fn create_session(&self, options: &XrExperienceOptions) -> Result<SimulatedSession> {
        if let Some(reason) = &self.failure {
            return Err(ArcamError::SessionUnavailable(reason.clone()));
        }
        if options.session_mode == SessionMode::Inline
            && options.reference_space_type != ReferenceSpaceType::Viewer
        {
            return Err(ArcamError::SessionUnavailable(format!(
                "inline sessions do not support the {} reference space",
                options.reference_space_type.as_str()
            )));
        }

        let camera_access = options.session_mode == SessionMode::ImmersiveAr
            && options.has_feature(CAMERA_ACCESS_FEATURE);

        #[allow(clippy::cast_precision_loss)]
        let aspect = self.camera_width as f32 / self.camera_height.max(1) as f32;

        Ok(SimulatedSession {
            reference_space: ReferenceSpace {
                id: 1,
                kind: options.reference_space_type,
            },
            state: XrState::NotInXr,
            state_changed: Observable::new(),
            camera_access,
            camera: XrCamera {
                width: self.camera_width,
                height: self.camera_height,
            },
            projection: Mat4::perspective_rh(self.vertical_fov, aspect, 0.1, 1000.0),
            tracking: true,
            frame_index: 0,
        })
    }
}

impl XrExperienceFactory for SimulatedXr {
    type Session = SimulatedSession;

    fn create_default_xr_experience(
        &self,
        options: &XrExperienceOptions,
    ) -> impl Future<Output = Result<SimulatedSession>> {
        let session = self.create_session(options);
        async move { session }
    }
}

/// A simulated XR session.
#[derive(Debug)]
pub struct SimulatedSession {
    reference_space: ReferenceSpace,
    state: XrState,
    state_changed: Observable<XrState>,
    camera_access: bool,
    camera: XrCamera,
    projection: Mat4,
    tracking: bool,
    frame_index: u64,
}

impl SimulatedSession {
    /// Enters immersive mode, passing through `EnteringXr`.
    pub fn enter_xr(&mut self) {
        if self.state == XrState::InXr {
            return;
        }
        self.set_state(XrState::EnteringXr);
        self.set_state(XrState::InXr);
    }

    /// Leaves immersive mode, passing through `ExitingXr`.
    pub fn exit_xr(&mut self) {
        if self.state == XrState::NotInXr {
            return;
        }
        self.set_state(XrState::ExitingXr);
        self.set_state(XrState::NotInXr);
    }

    /// Simulates losing or regaining positional tracking.
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    /// Whether frames carry a camera image.
    pub fn has_camera_access(&self) -> bool {
        self.camera_access
    }

    /// The projection matrix reported for the single view.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Produces the next frame.
    ///
    /// Frames carry a viewer pose only while in XR with tracking available.
    pub fn next_frame(&mut self) -> SimulatedFrame {
        self.frame_index += 1;

        #[allow(clippy::cast_precision_loss)]
        let angle = self.frame_index as f32 * 0.01;
        let eye = Vec3::new(angle.sin() * 0.5, 1.5, angle.cos() * 0.5);
        let transform = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).inverse();

        let pose = (self.state.is_in_xr() && self.tracking).then(|| ViewerPose {
            transform,
            views: vec![XrView {
                eye: XrEye::None,
                projection_matrix: self.projection,
                transform,
                camera: self.camera_access.then_some(self.camera),
            }],
        });

        SimulatedFrame {
            space: self.reference_space,
            pose,
            camera: self.camera_access.then_some(self.camera),
            frame_index: self.frame_index,
        }
    }

    fn set_state(&mut self, state: XrState) {
        log::debug!("Simulated XR state {:?} -> {state:?}", self.state);
        self.state = state;
        self.state_changed.notify(&state);
    }
}

impl XrSessionManager for SimulatedSession {
    fn reference_space(&self) -> &ReferenceSpace {
        &self.reference_space
    }

    fn state(&self) -> XrState {
        self.state
    }

    fn on_state_changed(&mut self) -> &mut Observable<XrState> {
        &mut self.state_changed
    }
}

/// A frame produced by [`SimulatedSession::next_frame`].
#[derive(Debug, Clone)]
pub struct SimulatedFrame {
    space: ReferenceSpace,
    pose: Option<ViewerPose>,
    camera: Option<XrCamera>,
    frame_index: u64,
}

impl SimulatedFrame {
    /// Sequence number of this frame within its session.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl XrFrame for SimulatedFrame {
    fn viewer_pose(&self, space: &ReferenceSpace) -> Option<ViewerPose> {
        if *space != self.space {
            return None;
        }
        self.pose.clone()
    }

    fn camera_image(&self, camera: &XrCamera) -> Option<ImageData> {
        if self.camera != Some(*camera) {
            return None;
        }
        Some(synthetic_camera_image(camera.width, camera.height, self.frame_index))
    }
}

/// A moving color gradient standing in for the camera feed.
#[allow(clippy::cast_possible_truncation)]
fn synthetic_camera_image(width: u32, height: u32, frame_index: u64) -> ImageData {
    let shift = (frame_index % 256) as u32;
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1) + shift) % 256;
            let g = (y * 255) / height.max(1);
            data.extend_from_slice(&[r as u8, g as u8, 96, 255]);
        }
    }
    ImageData::new(width, height, data)
        .unwrap_or_else(|_| ImageData::filled(width, height, [0, 0, 0, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::FutureExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(options: &XrExperienceOptions) -> SimulatedSession {
        SimulatedXr::new()
            .create_default_xr_experience(options)
            .block_on()
            .unwrap()
    }

    #[test]
    fn test_state_transitions_are_notified_in_order() {
        let mut session = session(&XrExperienceOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session
            .on_state_changed()
            .add(move |state| sink.borrow_mut().push(*state));

        session.enter_xr();
        session.enter_xr();
        session.exit_xr();

        assert_eq!(
            *seen.borrow(),
            vec![
                XrState::EnteringXr,
                XrState::InXr,
                XrState::ExitingXr,
                XrState::NotInXr
            ]
        );
        assert_eq!(session.state(), XrState::NotInXr);
    }

    #[test]
    fn test_pose_requires_xr_and_tracking() {
        let mut session = session(&XrExperienceOptions::default());
        let space = *session.reference_space();
        assert!(session.next_frame().viewer_pose(&space).is_none());

        session.enter_xr();
        assert!(session.next_frame().viewer_pose(&space).is_some());

        session.set_tracking(false);
        assert!(session.next_frame().viewer_pose(&space).is_none());
    }

    #[test]
    fn test_pose_only_in_session_space() {
        let mut session = session(&XrExperienceOptions::default());
        session.enter_xr();
        let other = ReferenceSpace {
            id: 99,
            kind: ReferenceSpaceType::Local,
        };
        assert!(session.next_frame().viewer_pose(&other).is_none());
    }

    #[test]
    fn test_camera_requires_feature() {
        let options = XrExperienceOptions {
            optional_features: Vec::new(),
            ..XrExperienceOptions::default()
        };
        let mut session = session(&options);
        assert!(!session.has_camera_access());
        session.enter_xr();

        let frame = session.next_frame();
        let pose = frame.viewer_pose(session.reference_space()).unwrap();
        assert_eq!(pose.views.len(), 1);
        assert!(pose.views[0].camera.is_none());
        let camera = XrCamera {
            width: 640,
            height: 480,
        };
        assert!(frame.camera_image(&camera).is_none());
    }

    #[test]
    fn test_camera_image_matches_camera_size() {
        let mut session = SimulatedXr::new()
            .with_camera_size(32, 24)
            .create_default_xr_experience(&XrExperienceOptions::default())
            .block_on()
            .unwrap();
        session.enter_xr();

        let frame = session.next_frame();
        let pose = frame.viewer_pose(session.reference_space()).unwrap();
        let camera = pose.views[0].camera.expect("camera");
        let image = frame.camera_image(&camera).expect("image");
        assert_eq!((image.width(), image.height()), (32, 24));

        let wrong = XrCamera {
            width: 16,
            height: 16,
        };
        assert!(frame.camera_image(&wrong).is_none());
    }

    #[test]
    fn test_inline_session_rejects_unbounded_space() {
        let options = XrExperienceOptions {
            session_mode: SessionMode::Inline,
            ..XrExperienceOptions::default()
        };
        let result = SimulatedXr::new()
            .create_default_xr_experience(&options)
            .block_on();
        assert!(matches!(result, Err(ArcamError::SessionUnavailable(_))));
    }

    #[test]
    fn test_failing_factory() {
        let result = SimulatedXr::new()
            .failing("no device")
            .create_default_xr_experience(&XrExperienceOptions::default())
            .block_on();
        match result {
            Err(ArcamError::SessionUnavailable(reason)) => assert_eq!(reason, "no device"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
