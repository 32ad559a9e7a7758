//! Cross-module behavior of the core types.

use std::future::Future;

use arcam_core::*;
use pollster::FutureExt;

#[test]
fn test_options_from_json_file() {
    let path = std::env::temp_dir().join(format!("arcam_options_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "xr": { "sessionMode": "immersive-vr", "referenceSpaceType": "local-floor" },
            "window_title": "capture rig"
        }"#,
    )
    .unwrap();

    let options = AppOptions::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(options.xr.session_mode, SessionMode::ImmersiveVr);
    assert_eq!(
        options.xr.reference_space_type,
        ReferenceSpaceType::LocalFloor
    );
    // Unspecified fields keep their defaults
    assert!(options.xr.has_feature(CAMERA_ACCESS_FEATURE));
    assert_eq!(options.window_title, "capture rig");
    assert_eq!(options.window_width, AppOptions::default().window_width);
}

#[test]
fn test_options_missing_file_is_io_error() {
    let err = AppOptions::from_json_file("/nonexistent/arcam/options.json").unwrap_err();
    assert!(matches!(err, ArcamError::Io(_)));
}

#[test]
fn test_options_malformed_json_is_json_error() {
    let err = AppOptions::from_json_str("{ \"xr\": 3 }").unwrap_err();
    assert!(matches!(err, ArcamError::Json(_)));
}

#[test]
fn test_intrinsics_matrix_projects_center() {
    let projection = Mat4::perspective_rh(60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
    let k = camera_intrinsics(&projection, &Viewport::full_frame(640, 480)).to_matrix();

    // A point on the optical axis lands on the principal point
    let p = k * Vec3::new(0.0, 0.0, 1.0);
    assert_eq!((p.x / p.z, p.y / p.z), (320.0, 240.0));
}

/// A session whose state is driven directly by the test.
struct ScriptedSession {
    space: ReferenceSpace,
    state: XrState,
    changes: Observable<XrState>,
}

impl ScriptedSession {
    fn transition(&mut self, state: XrState) {
        self.state = state;
        self.changes.notify(&state);
    }
}

impl XrSessionManager for ScriptedSession {
    fn reference_space(&self) -> &ReferenceSpace {
        &self.space
    }

    fn state(&self) -> XrState {
        self.state
    }

    fn on_state_changed(&mut self) -> &mut Observable<XrState> {
        &mut self.changes
    }
}

struct ScriptedFactory;

impl XrExperienceFactory for ScriptedFactory {
    type Session = ScriptedSession;

    fn create_default_xr_experience(
        &self,
        options: &XrExperienceOptions,
    ) -> impl Future<Output = Result<ScriptedSession>> {
        let kind = options.reference_space_type;
        async move {
            Ok(ScriptedSession {
                space: ReferenceSpace { id: 3, kind },
                state: XrState::NotInXr,
                changes: Observable::new(),
            })
        }
    }
}

#[test]
fn test_session_state_changes_reach_observers_in_order() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut session = ScriptedFactory
        .create_default_xr_experience(&XrExperienceOptions::default())
        .block_on()
        .unwrap();
    assert_eq!(
        session.reference_space().kind,
        ReferenceSpaceType::Unbounded
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session
        .on_state_changed()
        .add(move |state| sink.borrow_mut().push(*state));

    session.transition(XrState::EnteringXr);
    session.transition(XrState::InXr);
    session.transition(XrState::ExitingXr);

    assert_eq!(
        *seen.borrow(),
        vec![XrState::EnteringXr, XrState::InXr, XrState::ExitingXr]
    );
    assert_eq!(session.state(), XrState::ExitingXr);
}
