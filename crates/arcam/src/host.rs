//! Desktop host: a winit window driving the render loop and resize events.
//!
//! The host runs the application against the simulated XR device. Press `C`
//! (or click the overlay button) to capture intrinsics and a camera image
//! from the current frame, and `X` to toggle immersive mode.

use std::sync::Arc;

use arcam_core::{AppOptions, ArcamError, Result, RetainedGui, SceneRenderer, XrSessionManager};
use arcam_render::{PngBase64Encoder, RenderEngine};
use pollster::FutureExt;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::App;
use crate::sim::{SimulatedSession, SimulatedXr};

/// The application as hosted on the desktop.
pub type DesktopApp = App<RenderEngine, SimulatedSession, RetainedGui>;

struct Host {
    options: AppOptions,
    window: Option<Arc<Window>>,
    app: Option<DesktopApp>,
    cursor: (f32, f32),
    error: Option<ArcamError>,
}

impl Host {
    fn new(options: AppOptions) -> Self {
        Self {
            options,
            window: None,
            app: None,
            cursor: (0.0, 0.0),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ArcamError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn start(&mut self, window: Arc<Window>) -> Result<DesktopApp> {
        let engine = RenderEngine::new_windowed(window).block_on()?;
        let mut app = App::new(
            engine,
            RetainedGui::new(),
            PngBase64Encoder::new(),
            self.options.clone(),
        );
        app.run_async(&SimulatedXr::new()).block_on()?;
        if let Some(session) = app.session_mut() {
            session.enter_xr();
        }
        Ok(app)
    }
}

/// Logs intrinsics and a captured camera image for the next simulated frame.
pub fn capture(app: &mut DesktopApp) {
    let Some(session) = app.session_mut() else {
        log::info!("No XR session to capture from");
        return;
    };
    let frame = session.next_frame();

    match app.camera_intrinsics_from_frame(&frame) {
        Some(k) => log::info!(
            "Camera intrinsics: fx={:.1} fy={:.1} cx={:.1} cy={:.1}",
            k.focal_length_x,
            k.focal_length_y,
            k.principal_point_x,
            k.principal_point_y
        ),
        None => log::info!("Camera intrinsics unavailable"),
    }

    match app.camera_image_base64_from_frame(&frame).block_on() {
        Ok(Some(image)) => log::info!("Captured camera image ({} base64 chars)", image.len()),
        Ok(None) => log::info!("Camera image unavailable"),
        Err(e) => log::error!("Camera image capture failed: {e}"),
    }
}

fn toggle_xr(app: &mut DesktopApp) {
    if let Some(session) = app.session_mut() {
        if session.state().is_in_xr() {
            session.exit_xr();
        } else {
            session.enter_xr();
        }
    }
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_transparent(true)
            .with_inner_size(LogicalSize::new(
                self.options.window_width,
                self.options.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(
                    event_loop,
                    ArcamError::Render(format!("failed to create window: {e}")),
                );
                return;
            }
        };

        match self.start(window.clone()) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => app.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = app.render_frame() {
                    self.fail(event_loop, e);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                {
                    self.cursor = (position.x as f32, position.y as f32);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (width, height) = app.engine().surface_size();
                let clicked = app
                    .gui()
                    .hit_test(self.cursor.0, self.cursor.1, width, height)
                    .is_some();
                if clicked {
                    capture(app);
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyC) => capture(app),
                    PhysicalKey::Code(KeyCode::KeyX) => toggle_xr(app),
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

/// Opens the host window and runs until it is closed.
///
/// # Errors
///
/// Returns an error if the event loop, window, render engine or XR session
/// cannot be created.
pub fn run(options: AppOptions) -> Result<()> {
    let _ = env_logger::try_init();

    let event_loop =
        EventLoop::new().map_err(|e| ArcamError::Render(format!("event loop error: {e}")))?;
    let mut host = Host::new(options);
    event_loop
        .run_app(&mut host)
        .map_err(|e| ArcamError::Render(format!("event loop error: {e}")))?;

    host.error.take().map_or(Ok(()), Err)
}
