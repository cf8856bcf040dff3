//! Orbit controls for hosts that drive the camera themselves.
//!
//! Rotation around the focus point is damped: input accumulates into a
//! pending delta that is bled off a fraction per update. Dolly is applied
//! immediately and clamped to the distance limits.

use std::f32::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};

use crate::projection::Camera;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSettings {
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_pan: true,
            enable_zoom: true,
            enable_rotate: true,
            min_distance: 0.05,
            max_distance: 100.0,
            rotate_speed: 0.8,
            pan_speed: 0.8,
            zoom_speed: 1.2,
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate_speed: 1.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// Spherical coordinates around the focus point, Y up
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around Y, measured from +Z
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: &Vector3<f32>) -> Self {
        let radius = offset.norm();
        if radius < f32::EPSILON {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi = self.phi.sin();
        Vector3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    pub auto_rotate: bool,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vector3<f32>,
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            auto_rotate: false,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vector3::zeros(),
            pending_scale: 1.0,
        }
    }

    /// Queue a drag rotation, in radians before the rotate speed is applied
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        if !self.settings.enable_rotate {
            return;
        }
        self.pending_theta -= azimuth * self.settings.rotate_speed;
        self.pending_phi -= polar * self.settings.rotate_speed;
    }

    /// Dolly towards the focus point by `steps` wheel notches (negative moves out)
    pub fn dolly(&mut self, steps: f32) {
        if !self.settings.enable_zoom {
            return;
        }
        self.pending_scale *= 0.95f32.powf(self.settings.zoom_speed * steps);
    }

    /// Queue a screen-space pan, in world units at unit distance
    pub fn pan(&mut self, right: f32, up: f32, camera: &Camera) {
        if !self.settings.enable_pan {
            return;
        }
        let orientation = camera.rotation.to_rotation();
        let distance = (camera.position - camera.target).norm();
        let offset = orientation * Vector3::new(right, up, 0.0);
        self.pending_pan += offset * distance * self.settings.pan_speed;
    }

    /// Apply pending input to the camera and turn it towards the target.
    /// Call once per rendered frame.
    pub fn update(&mut self, camera: &mut Camera) {
        let mut spherical = Spherical::from_offset(&(camera.position - camera.target));

        if self.auto_rotate {
            // One revolution every 60 seconds at 60 updates per second per unit speed
            self.pending_theta -= TAU / 60.0 / 60.0 * self.settings.auto_rotate_speed;
        }

        let blend = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.pending_theta * blend;
        spherical.phi += self.pending_phi * blend;

        let min_phi = self.settings.min_polar_angle.max(1e-6);
        let max_phi = self.settings.max_polar_angle.min(PI - 1e-6);
        spherical.phi = spherical.phi.clamp(min_phi, max_phi);
        spherical.radius = (spherical.radius * self.pending_scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);

        camera.target += self.pending_pan * blend;
        camera.position = camera.target + spherical.to_offset();
        let target: Point3<f32> = camera.target;
        camera.look_at(target);

        if self.settings.enable_damping {
            self.pending_theta *= 1.0 - self.settings.damping_factor;
            self.pending_phi *= 1.0 - self.settings.damping_factor;
            self.pending_pan *= 1.0 - self.settings.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vector3::zeros();
        }
        self.pending_scale = 1.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}
