//! Camera intrinsics derived from an XR projection matrix.

use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Pinhole camera intrinsics in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length along X, in pixels.
    pub focal_length_x: f32,
    /// Focal length along Y, in pixels.
    pub focal_length_y: f32,
    /// Principal point X coordinate, in pixels.
    pub principal_point_x: f32,
    /// Principal point Y coordinate, in pixels.
    pub principal_point_y: f32,
}

impl CameraIntrinsics {
    /// Creates new camera intrinsics.
    pub fn new(
        focal_length_x: f32,
        focal_length_y: f32,
        principal_point_x: f32,
        principal_point_y: f32,
    ) -> Self {
        Self {
            focal_length_x,
            focal_length_y,
            principal_point_x,
            principal_point_y,
        }
    }

    /// Returns the 3x3 calibration matrix K.
    ///
    /// ```text
    /// | fx  0  cx |
    /// |  0 fy  cy |
    /// |  0  0   1 |
    /// ```
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(self.focal_length_x, 0.0, 0.0),
            Vec3::new(0.0, self.focal_length_y, 0.0),
            Vec3::new(self.principal_point_x, self.principal_point_y, 1.0),
        )
    }
}

/// A pixel rectangle on the camera image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport covering a whole `width` x `height` image.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Computes camera intrinsics from a projection matrix and viewport.
///
/// Uses the X and Y scale terms of the column-major projection matrix
/// (elements 0 and 5). The principal point is the viewport center, and the
/// viewport origin is ignored. Degenerate matrices yield degenerate
/// intrinsics rather than an error.
#[allow(clippy::cast_precision_loss)]
pub fn camera_intrinsics(projection: &Mat4, viewport: &Viewport) -> CameraIntrinsics {
    let m = projection.to_cols_array();
    let width = viewport.width as f32;
    let height = viewport.height as f32;

    CameraIntrinsics {
        focal_length_x: (m[0] * width) / 2.0,
        focal_length_y: (m[5] * height) / 2.0,
        principal_point_x: width / 2.0,
        principal_point_y: height / 2.0,
    }
}
