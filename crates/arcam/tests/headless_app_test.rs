//! End-to-end capture through the wgpu engine.
//!
//! Requires a GPU adapter (real or software fallback). Without one, engine
//! creation fails and the test returns early.

use arcam::*;
use base64::{engine::general_purpose, Engine as _};
use pollster::FutureExt;

#[test]
fn headless_capture_from_simulated_frame() {
    let engine = match RenderEngine::new_headless(160, 120).block_on() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Skipping headless test: no GPU adapter available ({e})");
            return;
        }
    };

    let mut app = App::new(
        engine,
        RetainedGui::new(),
        PngBase64Encoder::new(),
        AppOptions::default(),
    );
    app.run_async(&SimulatedXr::new().with_camera_size(64, 48))
        .block_on()
        .expect("session");
    app.render_frame().expect("render");

    let session = app.session_mut().expect("session");
    session.enter_xr();
    let frame = session.next_frame();
    let expected = frame
        .camera_image(&XrCamera {
            width: 64,
            height: 48,
        })
        .expect("camera image");

    let k = app
        .camera_intrinsics_from_frame(&frame)
        .expect("intrinsics");
    assert_eq!(k.principal_point_x, 32.0);
    assert_eq!(k.principal_point_y, 24.0);

    let encoded = app
        .camera_image_base64_from_frame(&frame)
        .block_on()
        .expect("encode")
        .expect("camera image");
    let png = general_purpose::STANDARD.decode(encoded).expect("base64");
    let decoded = image::load_from_memory(&png).expect("png").to_rgba8();

    assert_eq!(decoded.dimensions(), (64, 48));
    assert_eq!(decoded.as_raw().as_slice(), expected.data());
}
