//! Captures camera intrinsics and a PNG from a simulated frame without a window.
//!
//! Usage: `cargo run --example headless_capture [output.png]`

use arcam::*;
use base64::{engine::general_purpose, Engine as _};
use pollster::FutureExt;

fn main() -> Result<()> {
    env_logger::init();

    let engine = RenderEngine::new_headless(640, 480).block_on()?;
    let mut app = App::new(
        engine,
        RetainedGui::new(),
        PngBase64Encoder::new(),
        AppOptions::default(),
    );
    app.run_async(&SimulatedXr::new()).block_on()?;
    app.render_frame()?;

    let Some(session) = app.session_mut() else {
        return Err(ArcamError::NotInitialized);
    };
    session.enter_xr();
    let frame = session.next_frame();

    match app.camera_intrinsics_from_frame(&frame) {
        Some(k) => println!(
            "intrinsics: fx={:.2} fy={:.2} cx={:.2} cy={:.2}",
            k.focal_length_x, k.focal_length_y, k.principal_point_x, k.principal_point_y
        ),
        None => println!("intrinsics unavailable"),
    }

    let Some(image) = app.camera_image_base64_from_frame(&frame).block_on()? else {
        println!("camera image unavailable");
        return Ok(());
    };
    println!("camera image: {} base64 chars", image.len());

    if let Some(path) = std::env::args().nth(1) {
        let png = general_purpose::STANDARD
            .decode(image)
            .map_err(|e| ArcamError::Encode(e.to_string()))?;
        std::fs::write(&path, png)?;
        println!("wrote {path}");
    }
    Ok(())
}
