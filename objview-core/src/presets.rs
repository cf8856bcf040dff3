//! Fixed preset tables offered by the settings panel.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};
use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;

/// Named camera placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    Isometric,
    Perspective,
}

impl ViewName {
    pub const ALL: [ViewName; 8] = [
        ViewName::Front,
        ViewName::Back,
        ViewName::Left,
        ViewName::Right,
        ViewName::Top,
        ViewName::Bottom,
        ViewName::Isometric,
        ViewName::Perspective,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Front => "front",
            ViewName::Back => "back",
            ViewName::Left => "left",
            ViewName::Right => "right",
            ViewName::Top => "top",
            ViewName::Bottom => "bottom",
            ViewName::Isometric => "isometric",
            ViewName::Perspective => "perspective",
        }
    }

    pub fn preset(self) -> &'static CameraPreset {
        // ALL and CAMERA_PRESETS share the same order
        &CAMERA_PRESETS[self as usize]
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewName::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| ViewerError::UnknownView(s.to_string()))
    }
}

/// Absolute camera transform for a named view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub view: ViewName,
    pub position: [f32; 3],
    /// Euler angles in radians
    pub rotation: [f32; 3],
}

pub static CAMERA_PRESETS: [CameraPreset; 8] = [
    CameraPreset {
        view: ViewName::Front,
        position: [0.0, 0.0, 5.0],
        rotation: [0.0, 0.0, 0.0],
    },
    CameraPreset {
        view: ViewName::Back,
        position: [0.0, 0.0, -5.0],
        rotation: [0.0, PI, 0.0],
    },
    CameraPreset {
        view: ViewName::Left,
        position: [-5.0, 0.0, 0.0],
        rotation: [0.0, FRAC_PI_2, 0.0],
    },
    CameraPreset {
        view: ViewName::Right,
        position: [5.0, 0.0, 0.0],
        rotation: [0.0, -FRAC_PI_2, 0.0],
    },
    CameraPreset {
        view: ViewName::Top,
        position: [0.0, 5.0, 0.0],
        rotation: [-FRAC_PI_2, 0.0, 0.0],
    },
    CameraPreset {
        view: ViewName::Bottom,
        position: [0.0, -5.0, 0.0],
        rotation: [FRAC_PI_2, 0.0, 0.0],
    },
    CameraPreset {
        view: ViewName::Isometric,
        position: [5.0, 5.0, 5.0],
        rotation: [0.0, FRAC_PI_4, 0.0],
    },
    CameraPreset {
        view: ViewName::Perspective,
        position: [3.0, 3.0, 3.0],
        rotation: [0.0, FRAC_PI_6, 0.0],
    },
];

/// Named camera distance from the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPreset {
    pub name: &'static str,
    pub distance: f32,
}

/// Ordered far to near
pub const ZOOM_PRESETS: [ZoomPreset; 8] = [
    ZoomPreset {
        name: "Ultra Far",
        distance: 25.0,
    },
    ZoomPreset {
        name: "Far",
        distance: 15.0,
    },
    ZoomPreset {
        name: "Medium",
        distance: 8.0,
    },
    ZoomPreset {
        name: "Close",
        distance: 3.0,
    },
    ZoomPreset {
        name: "Very Close",
        distance: 1.5,
    },
    ZoomPreset {
        name: "Extreme Close",
        distance: 0.5,
    },
    ZoomPreset {
        name: "Micro Close",
        distance: 0.2,
    },
    ZoomPreset {
        name: "Nano Close",
        distance: 0.1,
    },
];

/// Named uniform model scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePreset {
    pub name: &'static str,
    pub scale: f32,
}

/// Ordered tiny to massive
pub const SCALE_PRESETS: [ScalePreset; 6] = [
    ScalePreset {
        name: "Tiny",
        scale: 0.005,
    },
    ScalePreset {
        name: "Small",
        scale: 0.01,
    },
    ScalePreset {
        name: "Normal",
        scale: 0.02,
    },
    ScalePreset {
        name: "Large",
        scale: 0.05,
    },
    ScalePreset {
        name: "Huge",
        scale: 0.1,
    },
    ScalePreset {
        name: "Massive",
        scale: 0.2,
    },
];

/// Named background fill, a CSS color or gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPreset {
    pub name: &'static str,
    pub value: &'static str,
}

pub const BACKGROUND_PRESETS: [BackgroundPreset; 10] = [
    BackgroundPreset {
        name: "Black",
        value: "#000000",
    },
    BackgroundPreset {
        name: "Dark Gray",
        value: "#1a1a1a",
    },
    BackgroundPreset {
        name: "Navy",
        value: "#0a0a2a",
    },
    BackgroundPreset {
        name: "Dark Green",
        value: "#0a2a0a",
    },
    BackgroundPreset {
        name: "Dark Red",
        value: "#2a0a0a",
    },
    BackgroundPreset {
        name: "Purple",
        value: "#2a0a2a",
    },
    BackgroundPreset {
        name: "White",
        value: "#ffffff",
    },
    BackgroundPreset {
        name: "Light Gray",
        value: "#f0f0f0",
    },
    BackgroundPreset {
        name: "Sky Blue",
        value: "#87CEEB",
    },
    BackgroundPreset {
        name: "Gradient",
        value: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_table_order_matches_enum() {
        for view in ViewName::ALL {
            assert_eq!(view.preset().view, view);
        }
    }

    #[test]
    fn test_view_names_round_trip() {
        for view in ViewName::ALL {
            assert_eq!(view.as_str().parse::<ViewName>(), Ok(view));
        }
        assert_eq!(
            "diagonal".parse::<ViewName>(),
            Err(ViewerError::UnknownView("diagonal".to_string()))
        );
        assert!("Front".parse::<ViewName>().is_err());
    }

    #[test]
    fn test_zoom_presets_run_far_to_near() {
        assert!(ZOOM_PRESETS.windows(2).all(|w| w[0].distance > w[1].distance));
    }

    #[test]
    fn test_scale_presets_run_tiny_to_massive() {
        assert!(SCALE_PRESETS.windows(2).all(|w| w[0].scale < w[1].scale));
    }
}
