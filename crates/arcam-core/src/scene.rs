//! Scene description consumed by the render engine.

use glam::{Mat4, Vec3, Vec4};

use crate::error::Result;

/// How the default camera is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraKind {
    /// Orbits a target on a sphere of `radius`.
    #[default]
    ArcRotate,
    /// Fixed position looking at the target.
    Free,
}

/// The scene camera.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCamera {
    /// Camera kind.
    pub kind: CameraKind,
    /// Longitudinal rotation in radians.
    pub alpha: f32,
    /// Latitudinal rotation in radians, measured from +Y.
    pub beta: f32,
    /// Distance from the target.
    pub radius: f32,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Whether user input drives the camera.
    pub controls_attached: bool,
}

impl SceneCamera {
    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
    }

    /// World to camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect_ratio, self.near, self.far)
    }
}

/// A light shining uniformly along `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub name: String,
    /// Direction the light travels (not normalized).
    pub direction: Vec3,
    pub intensity: f32,
}

/// An axis-aligned cube.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    pub name: String,
    /// Edge length.
    pub size: f32,
    /// Center position in world space.
    pub position: Vec3,
    /// Base color (RGBA, linear).
    pub color: Vec4,
}

impl BoxMesh {
    /// Model matrix placing a unit cube at this box's size and position.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.size),
            glam::Quat::IDENTITY,
            self.position,
        )
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = Vec3::splat(self.size * 0.5);
        (self.position - half, self.position + half)
    }
}

/// A simple scene: one camera, directional lights and boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    camera: Option<SceneCamera>,
    lights: Vec<DirectionalLight>,
    meshes: Vec<BoxMesh>,
    /// Clear color (RGBA, linear).
    pub clear_color: Vec4,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: None,
            lights: Vec::new(),
            meshes: Vec::new(),
            clear_color: Vec4::new(0.2, 0.2, 0.3, 1.0),
        }
    }
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a camera framing the current scene contents.
    ///
    /// An existing camera is kept unless `replace` is set.
    pub fn create_default_camera(
        &mut self,
        create_arc_rotate: bool,
        replace: bool,
        attach_controls: bool,
    ) -> &mut SceneCamera {
        let camera = match self.camera.take() {
            Some(existing) if !replace => existing,
            _ => self.framing_camera(create_arc_rotate, attach_controls),
        };
        self.camera.insert(camera)
    }

    fn framing_camera(&self, create_arc_rotate: bool, attach_controls: bool) -> SceneCamera {
        let (min, max) = self.bounding_box();
        let radius = ((max - min).length() * 1.5).max(0.1);
        SceneCamera {
            kind: if create_arc_rotate {
                CameraKind::ArcRotate
            } else {
                CameraKind::Free
            },
            alpha: -std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::FRAC_PI_2,
            radius,
            target: (min + max) * 0.5,
            fov: 0.8,
            near: radius * 0.01,
            far: radius * 100.0,
            controls_attached: attach_controls,
        }
    }

    /// Adds a directional light.
    pub fn add_directional_light(
        &mut self,
        name: impl Into<String>,
        direction: Vec3,
    ) -> &mut DirectionalLight {
        self.lights.push(DirectionalLight {
            name: name.into(),
            direction,
            intensity: 1.0,
        });
        let last = self.lights.len() - 1;
        &mut self.lights[last]
    }

    /// Adds a box of edge length `size` at the origin.
    pub fn create_box(&mut self, name: impl Into<String>, size: f32) -> &mut BoxMesh {
        self.meshes.push(BoxMesh {
            name: name.into(),
            size,
            position: Vec3::ZERO,
            color: Vec4::new(0.8, 0.8, 0.8, 1.0),
        });
        let last = self.meshes.len() - 1;
        &mut self.meshes[last]
    }

    /// The active camera, if one was created.
    pub fn camera(&self) -> Option<&SceneCamera> {
        self.camera.as_ref()
    }

    /// All directional lights.
    pub fn lights(&self) -> &[DirectionalLight] {
        &self.lights
    }

    /// All box meshes.
    pub fn meshes(&self) -> &[BoxMesh] {
        &self.meshes
    }

    /// Looks up a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&BoxMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Bounding box of all meshes, or a unit cube around the origin when empty.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        if self.meshes.is_empty() {
            return (Vec3::splat(-1.0), Vec3::splat(1.0));
        }
        self.meshes.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), mesh| {
                let (lo, hi) = mesh.bounds();
                (min.min(lo), max.max(hi))
            },
        )
    }
}

/// Draws scenes onto a render surface.
pub trait SceneRenderer {
    /// Renders one frame of `scene`.
    fn render(&mut self, scene: &Scene) -> Result<()>;

    /// Resizes the render surface. Zero sizes are ignored.
    fn resize(&mut self, width: u32, height: u32);

    /// Current surface size in pixels.
    fn surface_size(&self) -> (u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut scene = Scene::new();
        assert_eq!(scene.bounding_box(), (Vec3::splat(-1.0), Vec3::splat(1.0)));

        scene.create_box("a", 0.2).position = Vec3::new(0.0, 0.1, 0.0);
        let (min, max) = scene.bounding_box();
        assert!((min - Vec3::new(-0.1, 0.0, -0.1)).length() < 1e-6);
        assert!((max - Vec3::new(0.1, 0.2, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_default_camera_frames_scene() {
        let mut scene = Scene::new();
        scene.create_box("box", 0.2).position = Vec3::new(0.0, 0.1, 0.0);
        let camera = scene.create_default_camera(true, true, true).clone();

        assert_eq!(camera.kind, CameraKind::ArcRotate);
        assert!(camera.controls_attached);
        assert!((camera.target - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-6);
        let distance = (camera.position() - camera.target).length();
        assert!((distance - camera.radius).abs() < 1e-4);
    }

    #[test]
    fn test_default_camera_replace() {
        let mut scene = Scene::new();
        scene.create_default_camera(true, true, false);
        scene.create_default_camera(false, false, false);
        assert_eq!(scene.camera().unwrap().kind, CameraKind::ArcRotate);
        scene.create_default_camera(false, true, false);
        assert_eq!(scene.camera().unwrap().kind, CameraKind::Free);
    }

    #[test]
    fn test_box_model_matrix() {
        let mesh = BoxMesh {
            name: "b".into(),
            size: 2.0,
            position: Vec3::new(1.0, 2.0, 3.0),
            color: Vec4::ONE,
        };
        let corner = mesh.model_matrix().transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(2.0, 3.0, 4.0)).length() < 1e-6);
    }
}
