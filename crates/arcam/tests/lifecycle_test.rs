//! Application lifecycle against the simulated XR device and a CPU engine.

use std::future::{self, Future};

use arcam::{
    App, AppOptions, AppState, ArcamError, CameraTextureProvider, GuiLayer, ImageData, PngEncoder,
    ReferenceSpace, Result, RetainedGui, Scene, SceneRenderer, SessionMode, SimulatedSession,
    SimulatedXr, TextureReadback, XrExperienceFactory, XrFrame, XrSessionManager, XrState,
    OVERLAY_NAME,
};
use pollster::FutureExt;

/// Records what the application asks of its engine.
#[derive(Default)]
struct RecordingEngine {
    renders: usize,
    meshes_seen: usize,
    size: (u32, u32),
}

impl SceneRenderer for RecordingEngine {
    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.renders += 1;
        self.meshes_seen = scene.meshes().len();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }
}

impl CameraTextureProvider for RecordingEngine {
    type Texture = ImageData;

    fn create_camera_texture<F: XrFrame + ?Sized>(
        &self,
        space: &ReferenceSpace,
        frame: &F,
    ) -> Option<ImageData> {
        let pose = frame.viewer_pose(space)?;
        let camera = pose.views.first()?.camera?;
        frame.camera_image(&camera)
    }
}

impl TextureReadback<ImageData> for RecordingEngine {
    fn read_texture_pixels(&self, texture: &ImageData) -> impl Future<Output = Option<ImageData>> {
        future::ready(Some(texture.clone()))
    }
}

struct SizeEncoder;

impl PngEncoder for SizeEncoder {
    fn encode_base64(&self, image: &ImageData) -> Result<String> {
        Ok(format!("{}x{}", image.width(), image.height()))
    }
}

/// Counts overlay builds without retaining them.
#[derive(Default)]
struct CountingGui {
    builds: usize,
}

impl GuiLayer for CountingGui {
    fn create_fullscreen_ui(&mut self, ui: arcam::FullscreenUi) {
        assert_eq!(ui.name, OVERLAY_NAME);
        self.builds += 1;
    }
}

type TestApp<G> = App<RecordingEngine, SimulatedSession, G>;

fn new_app<G: GuiLayer + 'static>(gui: G, options: AppOptions) -> TestApp<G> {
    App::new(RecordingEngine::default(), gui, SizeEncoder, options)
}

fn running_app() -> TestApp<RetainedGui> {
    let mut app = new_app(RetainedGui::new(), AppOptions::default());
    app.run_async(&SimulatedXr::new())
        .block_on()
        .expect("session");
    app
}

#[test]
fn test_run_acquires_session_and_builds_scene() {
    let mut app = new_app(RetainedGui::new(), AppOptions::default());
    assert_eq!(app.state(), AppState::Uninitialized);
    assert!(app.session().is_none());

    app.run_async(&SimulatedXr::new()).block_on().unwrap();

    assert_eq!(app.state(), AppState::SessionActiveNoUi);
    assert!(app.session().is_some());
    assert!(app.scene().mesh("box").is_some());
    assert_eq!(app.scene().lights().len(), 1);
    assert!(app.scene().camera().is_some());
    assert_eq!(app.gui().build_count(), 0);
}

#[test]
fn test_ui_rebuilt_on_every_state_change() {
    let mut app = new_app(CountingGui::default(), AppOptions::default());
    app.run_async(&SimulatedXr::new()).block_on().unwrap();

    let session = app.session_mut().unwrap();
    session.enter_xr();
    session.on_state_changed().notify(&XrState::InXr);
    session.exit_xr();

    // EnteringXr, InXr, manual InXr, ExitingXr, NotInXr
    assert_eq!(app.gui().builds, 5);
    assert_eq!(app.state(), AppState::SessionActiveUiBuilt);
}

#[test]
fn test_retained_gui_keeps_single_overlay() {
    let mut app = running_app();
    app.session_mut().unwrap().enter_xr();

    let gui = app.gui();
    assert_eq!(gui.build_count(), 2);
    assert_eq!(gui.overlays().len(), 1);
    let button = gui.overlay(OVERLAY_NAME).and_then(|ui| ui.button("button"));
    assert!(button.is_some());
}

#[test]
fn test_failed_session_leaves_app_uninitialized() {
    let mut app = new_app(RetainedGui::new(), AppOptions::default());
    let err = app
        .run_async(&SimulatedXr::new().failing("no device"))
        .block_on()
        .unwrap_err();

    assert!(matches!(err, ArcamError::SessionUnavailable(_)));
    assert_eq!(app.state(), AppState::Uninitialized);
    assert!(app.session().is_none());
    assert_eq!(app.gui().build_count(), 0);
}

#[test]
fn test_inline_session_rejects_unbounded_space() {
    let mut options = AppOptions::default();
    options.xr.session_mode = SessionMode::Inline;
    let mut app = new_app(RetainedGui::new(), options);

    assert!(app.run_async(&SimulatedXr::new()).block_on().is_err());
    assert!(app.session().is_none());
}

#[test]
fn test_queries_absent_before_session() {
    let app = new_app(RetainedGui::new(), AppOptions::default());

    let mut session = SimulatedXr::new()
        .create_default_xr_experience(&AppOptions::default().xr)
        .block_on()
        .unwrap();
    session.enter_xr();
    let frame = session.next_frame();

    assert!(app.camera_intrinsics_from_frame(&frame).is_none());
    assert!(app
        .camera_image_base64_from_frame(&frame)
        .block_on()
        .unwrap()
        .is_none());
}

#[test]
fn test_queries_absent_until_in_xr() {
    let mut app = running_app();
    let frame = app.session_mut().unwrap().next_frame();

    assert!(app.camera_intrinsics_from_frame(&frame).is_none());
    assert!(app
        .camera_image_base64_from_frame(&frame)
        .block_on()
        .unwrap()
        .is_none());
}

#[test]
fn test_queries_from_simulated_frame() {
    let mut app = new_app(RetainedGui::new(), AppOptions::default());
    app.run_async(&SimulatedXr::new().with_camera_size(320, 240))
        .block_on()
        .unwrap();
    let session = app.session_mut().unwrap();
    session.enter_xr();
    let frame = session.next_frame();

    let k = app
        .camera_intrinsics_from_frame(&frame)
        .expect("intrinsics");
    assert!((k.principal_point_x - 160.0).abs() < 1e-4);
    assert!((k.principal_point_y - 120.0).abs() < 1e-4);
    // 60 degree vertical fov: fy = (h / 2) / tan(30 deg)
    let expected_fy = 120.0 / 30f32.to_radians().tan();
    assert!((k.focal_length_y - expected_fy).abs() < 1e-2);

    let image = app
        .camera_image_base64_from_frame(&frame)
        .block_on()
        .unwrap();
    assert_eq!(image.as_deref(), Some("320x240"));
}

#[test]
fn test_lost_tracking_yields_no_data() {
    let mut app = running_app();
    let session = app.session_mut().unwrap();
    session.enter_xr();
    session.set_tracking(false);
    let frame = session.next_frame();

    assert!(app.camera_intrinsics_from_frame(&frame).is_none());
    assert!(app
        .camera_image_base64_from_frame(&frame)
        .block_on()
        .unwrap()
        .is_none());
}

#[test]
fn test_no_camera_access_without_feature() {
    let mut options = AppOptions::default();
    options.xr.optional_features.clear();
    let mut app = new_app(RetainedGui::new(), options);
    app.run_async(&SimulatedXr::new()).block_on().unwrap();

    let session = app.session_mut().unwrap();
    assert!(!session.has_camera_access());
    session.enter_xr();
    let frame = session.next_frame();

    assert!(app.camera_intrinsics_from_frame(&frame).is_none());
}

#[test]
fn test_render_and_resize_forwarded() {
    let mut app = running_app();
    app.resize(1024, 768);
    app.resize(0, 0);
    app.render_frame().unwrap();
    app.render_frame().unwrap();

    assert_eq!(app.engine().surface_size(), (1024, 768));
    assert_eq!(app.engine().renders, 2);
    assert_eq!(app.engine().meshes_seen, 1);
}
