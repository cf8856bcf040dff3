//! objview web - browser bindings for the OBJ viewer
//!
//! The page owns the canvas and the draw calls; this crate owns the viewer
//! state and hands the page matrices and vertex buffers to draw with.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use js_sys::Promise;
use log::{info, warn};
use objview_core::{
    obj, Camera, LoadError, Mesh, ModelViewer as CoreViewer, OrbitControls, ViewerEvent,
    ViewerProps,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{HtmlCanvasElement, HtmlElement, Request, RequestInit, RequestMode, Response};

struct Inner {
    viewer: CoreViewer,
    controls: OrbitControls,
}

/// Viewer bound to a container and canvas on the page
#[wasm_bindgen]
pub struct ModelViewer {
    inner: Rc<RefCell<Inner>>,
    canvas: Option<HtmlCanvasElement>,
}

#[wasm_bindgen]
impl ModelViewer {
    /// Build from a JSON props object (`url`, `showSettings`, `initialZoom`, ...)
    #[wasm_bindgen(constructor)]
    pub fn new(props_json: &str) -> Result<ModelViewer, JsValue> {
        let props = ViewerProps::from_json(props_json).map_err(js_err)?;
        let viewer = CoreViewer::new(props).map_err(js_err)?;
        Ok(ModelViewer {
            inner: Rc::new(RefCell::new(Inner {
                viewer,
                controls: OrbitControls::default(),
            })),
            canvas: None,
        })
    }

    /// Bind to page elements and attach a camera sized to the canvas
    pub fn mount(&mut self, container_id: &str, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?
            .dyn_into::<HtmlElement>()?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;

        {
            let mut inner = self.inner.borrow_mut();
            inner
                .viewer
                .attach_camera(Camera::new(canvas.width(), canvas.height()))
                .map_err(js_err)?;

            container.set_class_name(&inner.viewer.class_name());
            container.style().set_css_text(inner.viewer.style());
            if let Some(children) = inner.viewer.children() {
                let overlay = document.create_element("div")?;
                overlay.set_class_name("model-viewer-overlay");
                overlay.set_inner_html(children);
                container.append_child(&overlay)?;
            }
        }

        self.canvas = Some(canvas);
        self.sync_background()?;
        info!("mounted viewer on #{canvas_id}");
        Ok(())
    }

    /// Fetch and parse the model. Resolves to `true` once the mesh is ready.
    pub fn load(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        let url = inner.borrow().viewer.model().locator().to_string();
        future_to_promise(async move {
            let result = fetch_mesh(&url).await;
            let ready = result.is_ok();
            inner.borrow_mut().viewer.model_mut().resolve(&url, result);
            Ok(JsValue::from_bool(ready))
        })
    }

    /// Returns `true` when the page should call `load` again
    pub fn set_url(&self, url: &str) -> bool {
        self.inner.borrow_mut().viewer.set_url(url)
    }

    pub fn resize(&self, width: u32, height: u32) {
        if let Some(camera) = self.inner.borrow_mut().viewer.camera_mut() {
            camera.set_viewport(width, height);
        }
    }

    /// Advance orbit damping and auto-rotation by one frame
    pub fn tick(&self) {
        let mut inner = self.inner.borrow_mut();
        let Inner { viewer, controls } = &mut *inner;
        controls.auto_rotate = viewer.auto_rotate();
        if let Some(camera) = viewer.camera_mut() {
            controls.update(camera);
        }
    }

    pub fn orbit(&self, azimuth: f32, polar: f32) {
        self.inner.borrow_mut().controls.rotate(azimuth, polar);
    }

    pub fn pan(&self, right: f32, up: f32) {
        let mut inner = self.inner.borrow_mut();
        let Inner { viewer, controls } = &mut *inner;
        if let Some(camera) = viewer.camera() {
            controls.pan(right, up, camera);
        }
    }

    pub fn dolly(&self, steps: f32) {
        self.inner.borrow_mut().controls.dolly(steps);
    }

    pub fn select_view(&self, name: &str) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::SelectView(name.to_string()))
    }

    pub fn select_zoom(&self, distance: f32) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::SelectZoom(distance))
    }

    pub fn zoom_slider(&self, raw: f32) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::ZoomSlider(raw))
    }

    pub fn select_scale(&self, scale: f32) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::SelectScale(scale))
    }

    pub fn scale_slider(&self, raw: f32) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::ScaleSlider(raw))
    }

    pub fn toggle_grid(&self) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::ToggleGrid)
    }

    pub fn toggle_auto_rotate(&self) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::ToggleAutoRotate)
    }

    pub fn set_background(&self, color: &str) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::SetBackground(color.to_string()))?;
        self.sync_background()
    }

    pub fn open_settings(&self) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::OpenSettings)
    }

    pub fn close_settings(&self) -> Result<(), JsValue> {
        self.dispatch(ViewerEvent::CloseSettings)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().viewer.state()).map_err(js_err)
    }

    /// The expanded settings panel as JSON, or `null` while collapsed
    pub fn panel_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().viewer.settings_panel()).map_err(js_err)
    }

    pub fn show_grid(&self) -> bool {
        self.inner.borrow().viewer.show_grid()
    }

    pub fn camera_position(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .viewer
            .camera()
            .map(|c| c.position.coords.as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn camera_rotation(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .viewer
            .camera()
            .map(|c| c.rotation.to_array().to_vec())
            .unwrap_or_default()
    }

    /// Column-major view matrix, empty before `mount`
    pub fn view_matrix(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .viewer
            .camera()
            .map(|c| c.view_matrix().as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn projection_matrix(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .viewer
            .camera()
            .map(|c| c.projection_matrix().as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn model_matrix(&self) -> Vec<f32> {
        let scale = self.inner.borrow().viewer.controller().scale();
        objview_core::ModelDisplay::model_matrix(scale)
            .as_slice()
            .to_vec()
    }

    /// Triangle-list positions, three floats per vertex; empty until loaded
    pub fn mesh_positions(&self) -> Vec<f32> {
        let inner = self.inner.borrow();
        inner
            .viewer
            .model()
            .mesh()
            .map(|mesh| mesh_buffers(mesh).0)
            .unwrap_or_default()
    }

    pub fn mesh_normals(&self) -> Vec<f32> {
        let inner = self.inner.borrow();
        inner
            .viewer
            .model()
            .mesh()
            .map(|mesh| mesh_buffers(mesh).1)
            .unwrap_or_default()
    }
}

impl ModelViewer {
    fn dispatch(&self, event: ViewerEvent) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .viewer
            .dispatch(event)
            .map_err(|err| {
                warn!("{err}");
                js_err(err)
            })
    }

    fn sync_background(&self) -> Result<(), JsValue> {
        if let Some(canvas) = &self.canvas {
            let inner = self.inner.borrow();
            canvas.style().set_property("background", inner.viewer.background())?;
        }
        Ok(())
    }
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let body = JsFuture::from(response.text()?).await?;
    body.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

async fn fetch_mesh(url: &str) -> Result<Mesh, LoadError> {
    let text = fetch_text(url).await.map_err(|e| LoadError::Fetch {
        locator: url.to_string(),
        message: e.as_string().unwrap_or_else(|| format!("{e:?}")),
    })?;
    obj::parse_obj(&text)
}

/// Flatten a mesh into position and normal buffers for a triangle list
fn mesh_buffers(mesh: &Mesh) -> (Vec<f32>, Vec<f32>) {
    let count = mesh.triangles.len() * 9;
    let mut positions = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);
    for triangle in &mesh.triangles {
        for vertex in &triangle.vertices {
            positions.extend_from_slice(vertex.position.coords.as_slice());
            normals.extend_from_slice(vertex.normal.as_slice());
        }
    }
    (positions, normals)
}

fn js_err(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}
