//! AR camera demo on the simulated XR device.
//!
//! Usage: `cargo run --example ar_camera_demo [options.json]`
//!
//! Press `C` or click the button to capture camera intrinsics and an image,
//! `X` to toggle immersive mode, `Esc` to quit.

use arcam::*;

fn main() -> Result<()> {
    let options = match std::env::args().nth(1) {
        Some(path) => AppOptions::from_json_file(path)?,
        None => AppOptions::default(),
    };
    show(options)
}
