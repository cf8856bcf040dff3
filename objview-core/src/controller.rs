//! Camera state controller.
//!
//! Owns the host camera once it has been attached and moves it in response
//! to preset selection and slider input. Zoom and model scale are recorded
//! here as well, so the settings panel can highlight the matching preset.

use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use crate::error::ViewerError;
use crate::presets::{CameraPreset, ViewName};
use crate::projection::{Camera, CameraHandle};
use crate::transform::RotationState;

pub const DEFAULT_ZOOM: f32 = 8.0;
pub const DEFAULT_SCALE: f32 = 0.02;

#[derive(Debug, Clone)]
pub struct CameraController<C: CameraHandle = Camera> {
    camera: Option<C>,
    current_view: ViewName,
    zoom: f32,
    scale: f32,
}

impl<C: CameraHandle> CameraController<C> {
    pub fn new(initial_zoom: f32, initial_scale: f32) -> Result<Self, ViewerError> {
        Ok(Self {
            camera: None,
            current_view: ViewName::Perspective,
            zoom: positive_finite("zoom", initial_zoom)?,
            scale: positive_finite("scale", initial_scale)?,
        })
    }

    /// Hand the host camera to the controller. Happens once, when the
    /// canvas is created.
    pub fn attach(&mut self, camera: C) -> Result<(), ViewerError> {
        if self.camera.is_some() {
            return Err(ViewerError::CameraAlreadyAttached);
        }
        self.camera = Some(camera);
        Ok(())
    }

    pub fn camera(&self) -> Option<&C> {
        self.camera.as_ref()
    }

    /// Mutable access for the host's orbit controls
    pub fn camera_mut(&mut self) -> Option<&mut C> {
        self.camera.as_mut()
    }

    pub fn current_view(&self) -> ViewName {
        self.current_view
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Jump to a named view. Unknown names leave every field untouched and
    /// return `false`.
    pub fn apply_view_named(&mut self, name: &str) -> bool {
        match name.parse::<ViewName>() {
            Ok(view) => {
                self.apply_view(view);
                true
            }
            Err(err) => {
                debug!("ignoring view selection: {err}");
                false
            }
        }
    }

    /// Set the camera's position and rotation to the preset's literal
    /// values, then resync the recorded zoom with the new distance.
    pub fn apply_view(&mut self, view: ViewName) {
        self.current_view = view;
        let Some(camera) = self.camera.as_mut() else {
            debug!("view {view} selected before a camera was attached");
            return;
        };

        let CameraPreset {
            position, rotation, ..
        } = *view.preset();
        let [x, y, z] = position;
        camera.set_position(Point3::new(x, y, z));
        camera.set_rotation(RotationState::from_array(rotation));

        self.zoom = camera.position().coords.norm();
        debug!("applied view {view}, distance now {:.3}", self.zoom);
    }

    /// Move the camera to `distance` along its current radial line
    pub fn apply_zoom(&mut self, distance: f32) -> Result<(), ViewerError> {
        let distance = positive_finite("zoom", distance)?;
        self.zoom = distance;

        if let Some(camera) = self.camera.as_mut() {
            // A camera parked on the origin has no direction and stays there
            let direction = camera
                .position()
                .coords
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::zeros);
            camera.set_position(Point3::from(direction * distance));
        }
        Ok(())
    }

    /// Record a new uniform model scale. The camera does not move.
    pub fn apply_scale(&mut self, scale: f32) -> Result<(), ViewerError> {
        self.scale = positive_finite("scale", scale)?;
        Ok(())
    }
}

fn positive_finite(field: &'static str, value: f32) -> Result<f32, ViewerError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        warn!("rejecting {field} value {value}");
        Err(ViewerError::InvalidValue { field, value })
    }
}
