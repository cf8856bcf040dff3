//! Component props, readable from JSON

use serde::{Deserialize, Serialize};

use crate::controller::{DEFAULT_SCALE, DEFAULT_ZOOM};
use crate::error::ViewerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerProps {
    /// Locator of the OBJ resource
    pub url: String,
    #[serde(default = "default_zoom")]
    pub initial_zoom: f32,
    #[serde(default = "default_scale")]
    pub initial_scale: f32,
    /// Whether the settings panel starts expanded
    pub show_settings: bool,
    #[serde(default)]
    pub class_name: String,
    /// Inline CSS applied to the container
    #[serde(default)]
    pub style: String,
    /// Overlay content drawn above the canvas
    #[serde(default)]
    pub children: Option<String>,
}

fn default_zoom() -> f32 {
    DEFAULT_ZOOM
}

fn default_scale() -> f32 {
    DEFAULT_SCALE
}

impl ViewerProps {
    pub fn new(url: impl Into<String>, show_settings: bool) -> Self {
        Self {
            url: url.into(),
            initial_zoom: DEFAULT_ZOOM,
            initial_scale: DEFAULT_SCALE,
            show_settings,
            class_name: String::new(),
            style: String::new(),
            children: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        serde_json::from_str(json).map_err(|e| ViewerError::InvalidProps(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ViewerError> {
        serde_json::to_string(self).map_err(|e| ViewerError::InvalidProps(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let props = ViewerProps::from_json(r#"{"url": "/models/bunny.obj", "showSettings": false}"#)
            .unwrap();
        assert_eq!(props, ViewerProps::new("/models/bunny.obj", false));
        assert_eq!(props.initial_zoom, 8.0);
        assert_eq!(props.initial_scale, 0.02);
    }

    #[test]
    fn test_camel_case_fields() {
        let props = ViewerProps::from_json(
            r#"{
                "url": "a.obj",
                "initialZoom": 15,
                "initialScale": 0.1,
                "showSettings": true,
                "className": "hero",
                "style": "height: 400px",
                "children": "<span>Loading</span>"
            }"#,
        )
        .unwrap();
        assert_eq!(props.initial_zoom, 15.0);
        assert_eq!(props.class_name, "hero");
        assert_eq!(props.children.as_deref(), Some("<span>Loading</span>"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = ViewerProps::from_json(r#"{"url": "a.obj"}"#).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidProps(msg) if msg.contains("showSettings")));
    }
}
