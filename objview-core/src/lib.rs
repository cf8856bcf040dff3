//! objview core - viewer state, camera presets and OBJ loading
//!
//! This library holds everything the viewer does that does not depend on a
//! particular rendering host: preset tables, the camera controller, the
//! settings panel model, OBJ parsing and the static scene configuration.

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod model;
pub mod obj;
pub mod orbit;
pub mod presets;
pub mod projection;
pub mod scene;
pub mod settings;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use config::ViewerProps;
pub use controller::CameraController;
pub use error::{LoadError, ViewerError};
pub use geometry::{Bounds, Mesh, Triangle, Vertex};
pub use model::{FileLoader, MeshLoader, ModelDisplay, ModelState};
pub use orbit::{OrbitControls, OrbitSettings};
pub use presets::{CameraPreset, ScalePreset, ViewName, ZoomPreset};
pub use projection::{Camera, CameraHandle};
pub use scene::{Frame, GridConfig, Light, Rgb, SceneHost};
pub use settings::SettingsPanel;
pub use transform::{RotationState, Transform};
pub use viewer::{ModelViewer, ViewerEvent, ViewerState};
