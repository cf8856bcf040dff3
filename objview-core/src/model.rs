//! Model display: resolves a locator into a mesh and places it at the origin.

use std::fs;
use std::sync::Arc;

use log::{info, warn};
use nalgebra::Matrix4;

use crate::error::LoadError;
use crate::geometry::Mesh;
use crate::obj;
use crate::transform::Transform;

/// Something that can turn a locator into a mesh
pub trait MeshLoader {
    fn load(&self, locator: &str) -> Result<Mesh, LoadError>;
}

/// Loads OBJ files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl MeshLoader for FileLoader {
    fn load(&self, locator: &str) -> Result<Mesh, LoadError> {
        let data = fs::read(locator).map_err(|source| LoadError::Io {
            locator: locator.to_string(),
            source,
        })?;
        obj::parse_obj_bytes(&data)
    }
}

/// Resolution state of the model resource
#[derive(Debug, Clone)]
pub enum ModelState {
    Pending,
    Ready(Arc<Mesh>),
    Failed(Arc<LoadError>),
}

/// The model subtree of the viewer.
///
/// A locator change puts the display back into `Pending` and asks for a
/// reload; a scale change only changes the model matrix. Results are applied
/// in whatever order they arrive.
#[derive(Debug, Clone)]
pub struct ModelDisplay {
    locator: String,
    state: ModelState,
}

impl ModelDisplay {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            state: ModelState::Pending,
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ModelState::Pending)
    }

    /// Point the display at a new locator. Returns `true` when a reload is
    /// needed.
    pub fn set_locator(&mut self, locator: impl Into<String>) -> bool {
        let locator = locator.into();
        if locator == self.locator {
            return false;
        }
        self.locator = locator;
        self.state = ModelState::Pending;
        true
    }

    /// Apply the outcome of resolving `locator`
    pub fn resolve(&mut self, locator: &str, result: Result<Mesh, LoadError>) {
        self.state = match result {
            Ok(mesh) => {
                info!("loaded {locator}: {} triangles", mesh.triangles.len());
                ModelState::Ready(Arc::new(mesh))
            }
            Err(err) => {
                warn!("failed to load {locator}: {err}");
                ModelState::Failed(Arc::new(err))
            }
        };
    }

    /// Resolve the current locator synchronously
    pub fn load_with<L: MeshLoader + ?Sized>(&mut self, loader: &L) {
        let locator = self.locator.clone();
        let result = loader.load(&locator);
        self.resolve(&locator, result);
    }

    /// The mesh to draw, or `None` while pending or after a failure
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.state {
            ModelState::Ready(mesh) => Some(mesh.as_ref()),
            ModelState::Pending | ModelState::Failed(_) => None,
        }
    }

    pub fn model_matrix(scale: f32) -> Matrix4<f32> {
        Transform::model_matrix(scale)
    }
}
