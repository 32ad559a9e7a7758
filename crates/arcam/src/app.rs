//! Application orchestrator: scene, XR session, overlay UI and frame queries.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use arcam_core::{
    AppOptions, Button, CameraIntrinsics, CameraTextureProvider, Color, Control, FullscreenUi,
    GuiLayer, PngEncoder, Result, Scene, SceneRenderer, TextureReadback, Vec3, VerticalAlignment,
    XrExperienceFactory, XrFrame, XrSessionManager,
};

use crate::frame_query;

/// Lifecycle of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Constructed, not yet running.
    #[default]
    Uninitialized,
    /// Session requested; scene setup runs meanwhile.
    AwaitingSession,
    /// Session acquired, no state change observed yet.
    SessionActiveNoUi,
    /// The overlay UI has been built at least once.
    SessionActiveUiBuilt,
}

/// Name of the overlay built on session state changes.
pub const OVERLAY_NAME: &str = "UI";

/// Builds the overlay UI and hands it to `gui`.
pub fn build_gui<G: GuiLayer + ?Sized>(gui: &mut G) {
    let mut ui = FullscreenUi::new(OVERLAY_NAME);
    ui.add_control(Control::Button(Button {
        width_px: 800.0,
        height_px: 150.0,
        color: Color::WHITE,
        corner_radius: 20.0,
        background: Color::GREEN,
        font_size_px: 50.0,
        vertical_alignment: VerticalAlignment::Bottom,
        top_px: -10.0,
        ..Button::simple("button", "button")
    }));
    gui.create_fullscreen_ui(ui);
}

/// Populates `scene` with a default camera, a light and a small box.
pub fn init_scene(scene: &mut Scene) {
    scene.create_default_camera(true, true, true);
    scene.add_directional_light("light", Vec3::new(0.4, -1.0, 0.6));
    scene.create_box("box", 0.2).position = Vec3::new(0.0, 0.1, 0.0);
}

/// The AR application.
///
/// `E` renders the scene and provides camera textures and their readback,
/// `S` is the XR session type and `G` receives the overlay UI.
pub struct App<E, S, G> {
    engine: E,
    scene: Scene,
    gui: Rc<RefCell<G>>,
    encoder: Box<dyn PngEncoder>,
    options: AppOptions,
    session: Option<S>,
    state: Rc<Cell<AppState>>,
}

impl<E, S, G> App<E, S, G>
where
    E: SceneRenderer
        + CameraTextureProvider
        + TextureReadback<<E as CameraTextureProvider>::Texture>,
    S: XrSessionManager,
    G: GuiLayer + 'static,
{
    /// Creates the application around an engine, GUI layer and PNG encoder.
    pub fn new(engine: E, gui: G, encoder: impl PngEncoder + 'static, options: AppOptions) -> Self {
        let mut scene = Scene::new();
        scene.clear_color = options.clear_color;
        Self {
            engine,
            scene,
            gui: Rc::new(RefCell::new(gui)),
            encoder: Box::new(encoder),
            options,
            session: None,
            state: Rc::new(Cell::new(AppState::Uninitialized)),
        }
    }

    /// Requests the XR session and sets up the scene while it is pending.
    ///
    /// Once the session resolves, the overlay UI is rebuilt on every session
    /// state change.
    ///
    /// # Errors
    ///
    /// Returns the factory's error if the session cannot be created; the app
    /// then stays without a session.
    pub async fn run_async<X>(&mut self, factory: &X) -> Result<()>
    where
        X: XrExperienceFactory<Session = S>,
    {
        self.state.set(AppState::AwaitingSession);
        log::info!(
            "Requesting XR session ({:?}, {} reference space)",
            self.options.xr.session_mode,
            self.options.xr.reference_space_type.as_str()
        );

        let xr_options = self.options.xr.clone();
        let scene = &mut self.scene;
        let (session, ()) = futures::future::join(
            factory.create_default_xr_experience(&xr_options),
            async move { init_scene(scene) },
        )
        .await;

        let mut session = match session {
            Ok(session) => session,
            Err(e) => {
                log::error!("XR session request failed: {e}");
                self.state.set(AppState::Uninitialized);
                return Err(e);
            }
        };

        let gui = Rc::clone(&self.gui);
        let state = Rc::clone(&self.state);
        session.on_state_changed().add(move |xr_state| {
            log::info!("XR state changed to {xr_state:?}, rebuilding UI");
            build_gui(&mut *gui.borrow_mut());
            state.set(AppState::SessionActiveUiBuilt);
        });

        self.session = Some(session);
        self.state.set(AppState::SessionActiveNoUi);
        log::info!("XR session acquired");
        Ok(())
    }

    /// Renders one frame of the scene.
    pub fn render_frame(&mut self) -> Result<()> {
        self.engine.render(&self.scene)
    }

    /// Resizes the render surface to match the host window.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
    }

    /// Derives camera intrinsics from `frame`.
    ///
    /// Returns `None` without an active session, viewer pose, view or camera.
    pub fn camera_intrinsics_from_frame<F: XrFrame + ?Sized>(
        &self,
        frame: &F,
    ) -> Option<CameraIntrinsics> {
        let Some(session) = &self.session else {
            log::debug!("Intrinsics unavailable: no XR session");
            return None;
        };
        frame_query::camera_intrinsics_from_frame(session, frame)
    }

    /// Captures the camera image of `frame` as a base64 PNG string.
    ///
    /// Returns `Ok(None)` without an active session, camera texture or
    /// successful readback.
    ///
    /// # Errors
    ///
    /// Returns an error if the PNG encoder fails.
    pub async fn camera_image_base64_from_frame<F: XrFrame + ?Sized>(
        &self,
        frame: &F,
    ) -> Result<Option<String>> {
        let Some(session) = &self.session else {
            log::debug!("Camera image unavailable: no XR session");
            return Ok(None);
        };
        frame_query::camera_image_base64_from_frame(
            session,
            &self.engine,
            &self.engine,
            self.encoder.as_ref(),
            frame,
        )
        .await
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AppState {
        self.state.get()
    }

    /// The acquired XR session, if any.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// Mutable access to the acquired XR session.
    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The render engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the render engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The GUI layer.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a session state observer.
    pub fn gui(&self) -> Ref<'_, G> {
        self.gui.borrow()
    }

    /// The application options.
    pub fn options(&self) -> &AppOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcam_core::{HorizontalAlignment, RetainedGui};

    #[test]
    fn test_build_gui_button_style() {
        let mut gui = RetainedGui::new();
        build_gui(&mut gui);

        let ui = gui.overlay(OVERLAY_NAME).expect("overlay");
        let button = ui.button("button").expect("button");
        assert_eq!(button.text, "button");
        assert_eq!(button.width_px, 800.0);
        assert_eq!(button.height_px, 150.0);
        assert_eq!(button.color, Color::WHITE);
        assert_eq!(button.background, Color::GREEN);
        assert_eq!(button.corner_radius, 20.0);
        assert_eq!(button.font_size_px, 50.0);
        assert_eq!(button.vertical_alignment, VerticalAlignment::Bottom);
        assert_eq!(button.horizontal_alignment, HorizontalAlignment::Center);
        assert_eq!(button.top_px, -10.0);
    }

    #[test]
    fn test_init_scene_contents() {
        let mut scene = Scene::new();
        init_scene(&mut scene);

        let mesh = scene.mesh("box").expect("box");
        assert_eq!(mesh.size, 0.2);
        assert_eq!(mesh.position, Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.lights()[0].name, "light");
        assert_eq!(scene.lights()[0].direction, Vec3::new(0.4, -1.0, 0.6));
        assert!(scene.camera().is_some_and(|c| c.controls_attached));
    }

    #[test]
    fn test_init_scene_camera_frames_empty_scene() {
        let mut scene = Scene::new();
        init_scene(&mut scene);

        // The camera is created before the box, so it frames the default extents.
        let camera = scene.camera().expect("camera");
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.radius - Vec3::splat(2.0).length() * 1.5).abs() < 1e-5);
    }
}
