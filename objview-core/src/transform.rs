//! Euler rotations and model placement matrices

use nalgebra::{Matrix4, Rotation3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Rotation around three axes (in radians), applied in X, Y, Z order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_array(values: [f32; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Decompose a rotation matrix into XYZ-order Euler angles
    pub fn from_rotation(rotation: &Rotation3<f32>) -> Self {
        let m = rotation.matrix();
        let y = m[(0, 2)].clamp(-1.0, 1.0).asin();
        if m[(0, 2)].abs() < 0.999_999 {
            Self::new((-m[(1, 2)]).atan2(m[(2, 2)]), y, (-m[(0, 1)]).atan2(m[(0, 0)]))
        } else {
            // Gimbal lock: fold the Z turn into X
            Self::new(m[(2, 1)].atan2(m[(1, 1)]), y, 0.0)
        }
    }

    pub fn to_rotation(self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.z)
    }
}

/// Transform builder for model placement
pub struct Transform;

impl Transform {
    /// Corrective rotation applied to every loaded model (Z-up to Y-up)
    pub const MODEL_CORRECTION: RotationState = RotationState {
        x: -FRAC_PI_2,
        y: 0.0,
        z: 0.0,
    };

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        rotation.to_rotation().to_homogeneous()
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn uniform_scale_matrix(scale: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(scale)
    }

    /// Model matrix for a mesh at the scene origin: corrective rotation then uniform scale
    pub fn model_matrix(scale: f32) -> Matrix4<f32> {
        Self::translation_matrix(0.0, 0.0, 0.0)
            * Self::rotation_matrix(&Self::MODEL_CORRECTION)
            * Self::uniform_scale_matrix(scale)
    }
}
