use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use objview_core::{
    Camera, FileLoader, ModelState, ModelViewer, OrbitControls, ViewerEvent, ViewerProps,
};

const TETRAHEDRON: &str = "\
# tetrahedron
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

fn write_model(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("objview-{}-{name}", std::process::id()));
    fs::write(&path, TETRAHEDRON).unwrap();
    path
}

fn viewer_for(path: &str) -> ModelViewer {
    let props = ViewerProps::from_json(&format!(
        r#"{{"url": {path:?}, "showSettings": false, "initialZoom": 15}}"#
    ))
    .unwrap();
    let mut viewer = ModelViewer::new(props).unwrap();
    viewer.attach_camera(Camera::new(120, 40)).unwrap();
    viewer
}

#[test]
fn loads_and_frames_a_model_from_disk() {
    let path = write_model("tetra.obj");
    let mut viewer = viewer_for(path.to_str().unwrap());
    assert!(viewer.frame().unwrap().model.is_none());

    viewer.load_model(&FileLoader);
    let frame = viewer.frame().unwrap();
    let (mesh, _) = frame.model.unwrap();
    assert_eq!(mesh.triangles.len(), 4);

    fs::remove_file(path).ok();
}

#[test]
fn missing_file_renders_nothing_and_keeps_controls_working() {
    let mut viewer = viewer_for("/definitely/not/here.obj");
    viewer.load_model(&FileLoader);
    assert!(matches!(viewer.model().state(), ModelState::Failed(_)));
    assert!(viewer.frame().unwrap().model.is_none());

    viewer.dispatch(ViewerEvent::SelectView("top".into())).unwrap();
    assert_eq!(viewer.camera().unwrap().position, Point3::new(0.0, 5.0, 0.0));
}

#[test]
fn zoom_after_orbiting_follows_the_new_direction() {
    let mut viewer = viewer_for("unused.obj");
    let mut controls = OrbitControls::default();
    controls.settings.enable_damping = false;

    viewer.dispatch(ViewerEvent::SelectView("front".into())).unwrap();
    controls.rotate(std::f32::consts::FRAC_PI_2 / 0.8, 0.0);
    controls.update(viewer.camera_mut().unwrap());

    viewer.dispatch(ViewerEvent::ZoomSlider(2.0)).unwrap();
    let position = viewer.camera().unwrap().position.coords;
    assert_relative_eq!(position.norm(), 2.0, epsilon = 1e-5);
    // The drag swung the camera a quarter turn away from +Z
    assert_relative_eq!(position.normalize().dot(&Vector3::z()), 0.0, epsilon = 1e-4);
}

#[test]
fn scale_slider_never_moves_the_camera() {
    let mut viewer = viewer_for("unused.obj");
    viewer.dispatch(ViewerEvent::SelectView("isometric".into())).unwrap();
    let before = viewer.camera().unwrap().clone();

    for raw in [0.0, 0.0005, 0.02, 0.37, 9.0] {
        viewer.dispatch(ViewerEvent::ScaleSlider(raw)).unwrap();
        assert_eq!(viewer.camera().unwrap(), &before);
        let scale = viewer.state().model_scale;
        assert!((0.001..=0.5).contains(&scale));
    }
}

#[test]
fn highlights_track_exact_values() {
    let mut viewer = viewer_for("unused.obj");
    viewer.dispatch(ViewerEvent::OpenSettings).unwrap();

    let active = |viewer: &ModelViewer| {
        viewer
            .settings_panel()
            .unwrap()
            .zooms
            .into_iter()
            .filter(|c| c.active)
            .map(|c| c.label)
            .collect::<Vec<_>>()
    };

    assert_eq!(active(&viewer), vec!["Far (15x)".to_string()]);
    viewer.dispatch(ViewerEvent::ZoomSlider(3.0)).unwrap();
    assert_eq!(active(&viewer), vec!["Close (3x)".to_string()]);
    viewer.dispatch(ViewerEvent::ZoomSlider(3.3)).unwrap();
    assert!(active(&viewer).is_empty());
}
