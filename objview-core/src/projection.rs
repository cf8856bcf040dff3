//! Scene camera and projection utilities

use nalgebra::{Isometry3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::transform::RotationState;

/// The host camera as seen by the camera controller.
///
/// The controller only ever moves the camera in place; it never swaps the
/// object out from under the host.
pub trait CameraHandle {
    fn position(&self) -> Point3<f32>;
    fn set_position(&mut self, position: Point3<f32>);
    fn rotation(&self) -> RotationState;
    fn set_rotation(&mut self, rotation: RotationState);
}

/// Perspective camera positioned by translation and Euler rotation
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub rotation: RotationState,
    /// Focus point used by orbit controls
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub const INITIAL_POSITION: [f32; 3] = [0.5, 0.5, 0.5];
    pub const INITIAL_FOV_DEGREES: f32 = 75.0;

    pub fn new(width: u32, height: u32) -> Self {
        let [x, y, z] = Self::INITIAL_POSITION;
        let mut camera = Self {
            position: Point3::new(x, y, z),
            rotation: RotationState::zero(),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: Self::INITIAL_FOV_DEGREES.to_radians(),
            aspect: width.max(1) as f32 / height.max(1) as f32,
            near: 0.1,
            far: 1000.0,
        };
        camera.look_at(Point3::origin());
        camera
    }

    /// Turn the camera so that its -Z axis points at `target`
    pub fn look_at(&mut self, target: Point3<f32>) {
        let back = self.position - target;
        if back.norm() < f32::EPSILON {
            return;
        }
        let rotation = Rotation3::face_towards(&back, &self.up);
        self.rotation = RotationState::from_rotation(&rotation);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let orientation = UnitQuaternion::from_rotation_matrix(&self.rotation.to_rotation());
        let world = Isometry3::from_parts(Translation3::from(self.position.coords), orientation);
        world.inverse().to_homogeneous()
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a 3D point to 2D screen space, returning (x, y, depth)
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or on the eye plane
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl CameraHandle for Camera {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    fn rotation(&self) -> RotationState {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: RotationState) {
        self.rotation = rotation;
    }
}
