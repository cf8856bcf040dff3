//! The viewer component: one owner for camera, scene and panel state.

use log::{debug, info};
use serde::Serialize;

use crate::config::ViewerProps;
use crate::controller::CameraController;
use crate::error::ViewerError;
use crate::model::{MeshLoader, ModelDisplay};
use crate::projection::{Camera, CameraHandle};
use crate::scene::{Frame, GRID, LIGHT_RIG};
use crate::settings::{SettingsPanel, SCALE_SLIDER, ZOOM_SLIDER};

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// User input the settings surface can produce
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SelectView(String),
    /// Zoom preset click, applied literally
    SelectZoom(f32),
    /// Raw zoom slider input
    ZoomSlider(f32),
    /// Scale preset click, applied literally
    SelectScale(f32),
    /// Raw scale slider input
    ScaleSlider(f32),
    ToggleGrid,
    ToggleAutoRotate,
    SetBackground(String),
    OpenSettings,
    CloseSettings,
}

/// Snapshot of everything the panel and the host read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    pub current_view: String,
    pub show_grid: bool,
    pub auto_rotate: bool,
    pub background: String,
    pub zoom: f32,
    pub model_scale: f32,
    pub settings_open: bool,
}

#[derive(Debug, Clone)]
pub struct ModelViewer<C: CameraHandle = Camera> {
    controller: CameraController<C>,
    model: ModelDisplay,
    show_grid: bool,
    auto_rotate: bool,
    background: String,
    settings_open: bool,
    class_name: String,
    style: String,
    children: Option<String>,
}

impl<C: CameraHandle> ModelViewer<C> {
    pub fn new(props: ViewerProps) -> Result<Self, ViewerError> {
        let controller = CameraController::new(props.initial_zoom, props.initial_scale)?;
        Ok(Self {
            controller,
            model: ModelDisplay::new(props.url),
            show_grid: true,
            auto_rotate: false,
            background: DEFAULT_BACKGROUND.to_string(),
            settings_open: props.show_settings,
            class_name: props.class_name,
            style: props.style,
            children: props.children,
        })
    }

    /// Called by the host once its canvas and camera exist
    pub fn attach_camera(&mut self, camera: C) -> Result<(), ViewerError> {
        self.controller.attach(camera)
    }

    pub fn controller(&self) -> &CameraController<C> {
        &self.controller
    }

    pub fn camera(&self) -> Option<&C> {
        self.controller.camera()
    }

    pub fn camera_mut(&mut self) -> Option<&mut C> {
        self.controller.camera_mut()
    }

    pub fn model(&self) -> &ModelDisplay {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ModelDisplay {
        &mut self.model
    }

    /// Change the model locator; returns `true` when the host must reload
    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        self.model.set_locator(url)
    }

    pub fn load_model<L: MeshLoader + ?Sized>(&mut self, loader: &L) {
        self.model.load_with(loader);
    }

    pub fn class_name(&self) -> String {
        if self.class_name.is_empty() {
            "model-viewer-container".to_string()
        } else {
            format!("model-viewer-container {}", self.class_name)
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn children(&self) -> Option<&str> {
        self.children.as_deref()
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn state(&self) -> ViewerState {
        ViewerState {
            current_view: self.controller.current_view().to_string(),
            show_grid: self.show_grid,
            auto_rotate: self.auto_rotate,
            background: self.background.clone(),
            zoom: self.controller.zoom(),
            model_scale: self.controller.scale(),
            settings_open: self.settings_open,
        }
    }

    /// The expanded panel, or `None` while collapsed
    pub fn settings_panel(&self) -> Option<SettingsPanel> {
        self.settings_open
            .then(|| SettingsPanel::build(&self.state()))
    }

    /// Apply one user event. Unknown view names are ignored; rejected
    /// numeric input leaves the state unchanged and returns the error.
    pub fn dispatch(&mut self, event: ViewerEvent) -> Result<(), ViewerError> {
        debug!("dispatch {event:?}");
        match event {
            ViewerEvent::SelectView(name) => {
                self.controller.apply_view_named(&name);
            }
            ViewerEvent::SelectZoom(distance) => self.controller.apply_zoom(distance)?,
            ViewerEvent::ZoomSlider(raw) => self.controller.apply_zoom(ZOOM_SLIDER.snap(raw))?,
            ViewerEvent::SelectScale(scale) => self.controller.apply_scale(scale)?,
            ViewerEvent::ScaleSlider(raw) => self.controller.apply_scale(SCALE_SLIDER.snap(raw))?,
            ViewerEvent::ToggleGrid => self.show_grid = !self.show_grid,
            ViewerEvent::ToggleAutoRotate => self.auto_rotate = !self.auto_rotate,
            ViewerEvent::SetBackground(color) => {
                info!("background set to {color}");
                self.background = color;
            }
            ViewerEvent::OpenSettings => self.settings_open = true,
            ViewerEvent::CloseSettings => self.settings_open = false,
        }
        Ok(())
    }
}

impl ModelViewer<Camera> {
    /// Frame description for a scene host, once the camera is attached
    pub fn frame(&self) -> Option<Frame<'_>> {
        let camera = self.controller.camera()?;
        Some(Frame {
            camera,
            model: self
                .model
                .mesh()
                .map(|mesh| (mesh, ModelDisplay::model_matrix(self.controller.scale()))),
            grid: self.show_grid.then_some(&GRID),
            lights: &LIGHT_RIG,
            background: &self.background,
        })
    }
}
