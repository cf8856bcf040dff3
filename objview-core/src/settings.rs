//! Settings panel view model.
//!
//! Nothing here holds state: the panel is rebuilt from a [`ViewerState`]
//! snapshot and every clickable item carries the event it dispatches.

use serde::Serialize;

use crate::presets::{ViewName, BACKGROUND_PRESETS, SCALE_PRESETS, ZOOM_PRESETS};
use crate::viewer::{ViewerEvent, ViewerState};

/// Range input with a fixed decimal step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slider {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    /// Decimal places of `step`
    pub decimals: u32,
}

pub const SCALE_SLIDER: Slider = Slider {
    min: 0.001,
    max: 0.5,
    step: 0.001,
    decimals: 3,
};

pub const ZOOM_SLIDER: Slider = Slider {
    min: 0.5,
    max: 50.0,
    step: 0.1,
    decimals: 1,
};

impl Slider {
    /// The value the control would report for raw input: snapped to the
    /// step grid and clamped to the range.
    ///
    /// Works in integer step units so that a snapped value is the same
    /// float as the equivalent decimal literal.
    pub fn snap(&self, raw: f32) -> f32 {
        let scale = 10f32.powi(self.decimals as i32);
        let step = (self.step * scale).round().max(1.0);
        let lo = (self.min * scale).round();
        let hi = (self.max * scale).round();
        let raw = if raw.is_nan() { self.min } else { raw };

        let units = ((raw * scale - lo) / step).round() * step + lo;
        units.clamp(lo, hi) / scale
    }

    /// Where the thumb sits for a value that may lie outside the range
    pub fn thumb(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub label: String,
    pub active: bool,
    #[serde(skip)]
    pub event: ViewerEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleButton {
    pub label: &'static str,
    /// Whether the toggled feature is currently on
    pub on: bool,
    #[serde(skip)]
    pub event: ViewerEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderView {
    pub slider: Slider,
    pub thumb: f32,
    pub text: String,
}

pub const CONTROL_HELP: [&str; 10] = [
    "Left click + drag = Rotate 360°",
    "Right click + drag = Pan",
    "Scroll wheel = Zoom",
    "Click buttons for preset views",
    "Toggle grid on/off",
    "Auto-rotate for continuous 360°",
    "Change background color",
    "Enhanced zoom controls",
    "Improved lighting for all angles",
    "Scale model size up/down",
];

/// The expanded settings panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsPanel {
    pub help: &'static [&'static str],
    pub grid: ToggleButton,
    pub auto_rotate: ToggleButton,
    pub scales: Vec<Choice>,
    pub scale_slider: SliderView,
    pub views: Vec<Choice>,
    pub background: String,
    pub backgrounds: Vec<Choice>,
    pub zooms: Vec<Choice>,
    pub zoom_slider: SliderView,
}

impl SettingsPanel {
    pub fn build(state: &ViewerState) -> Self {
        let grid = ToggleButton {
            label: if state.show_grid { "Hide Grid" } else { "Show Grid" },
            on: state.show_grid,
            event: ViewerEvent::ToggleGrid,
        };
        let auto_rotate = ToggleButton {
            label: if state.auto_rotate {
                "Stop Auto-Rotate"
            } else {
                "Start Auto-Rotate"
            },
            on: state.auto_rotate,
            event: ViewerEvent::ToggleAutoRotate,
        };

        let scales = SCALE_PRESETS
            .iter()
            .map(|preset| Choice {
                label: format!("{} ({})", preset.name, preset.scale),
                active: state.model_scale == preset.scale,
                event: ViewerEvent::SelectScale(preset.scale),
            })
            .collect();

        let views = ViewName::ALL
            .iter()
            .map(|view| Choice {
                label: view.to_string(),
                active: state.current_view == view.as_str(),
                event: ViewerEvent::SelectView(view.to_string()),
            })
            .collect();

        let backgrounds = BACKGROUND_PRESETS
            .iter()
            .map(|preset| Choice {
                label: preset.name.to_string(),
                active: state.background == preset.value,
                event: ViewerEvent::SetBackground(preset.value.to_string()),
            })
            .collect();

        let zooms = ZOOM_PRESETS
            .iter()
            .map(|preset| Choice {
                label: format!("{} ({}x)", preset.name, preset.distance),
                active: state.zoom == preset.distance,
                event: ViewerEvent::SelectZoom(preset.distance),
            })
            .collect();

        Self {
            help: &CONTROL_HELP,
            grid,
            auto_rotate,
            scales,
            scale_slider: SliderView {
                slider: SCALE_SLIDER,
                thumb: SCALE_SLIDER.thumb(state.model_scale),
                text: format!("Current Scale: {:.3}", state.model_scale),
            },
            views,
            background: state.background.clone(),
            backgrounds,
            zooms,
            zoom_slider: SliderView {
                slider: ZOOM_SLIDER,
                thumb: ZOOM_SLIDER.thumb(state.zoom),
                text: format!("Current Zoom: {:.1}x", state.zoom),
            },
        }
    }
}

/// Whether the collapsed settings affordance (gear) is shown
pub fn shows_gear(state: &ViewerState) -> bool {
    !state.settings_open
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ViewerState {
        ViewerState {
            current_view: "perspective".to_string(),
            show_grid: true,
            auto_rotate: false,
            background: "#ffffff".to_string(),
            zoom: 8.0,
            model_scale: 0.02,
            settings_open: true,
        }
    }

    fn active_labels(choices: &[Choice]) -> Vec<&str> {
        choices
            .iter()
            .filter(|c| c.active)
            .map(|c| c.label.as_str())
            .collect()
    }

    #[test]
    fn test_scale_slider_bounds() {
        assert_eq!(SCALE_SLIDER.snap(0.0), 0.001);
        assert_eq!(SCALE_SLIDER.snap(-3.0), 0.001);
        assert_eq!(SCALE_SLIDER.snap(2.0), 0.5);
        assert_eq!(SCALE_SLIDER.snap(f32::INFINITY), 0.5);
        assert_eq!(SCALE_SLIDER.snap(f32::NAN), 0.001);
    }

    #[test]
    fn test_snapped_values_equal_decimal_literals() {
        assert_eq!(SCALE_SLIDER.snap(0.0201), 0.02);
        assert_eq!(SCALE_SLIDER.snap(0.1), 0.1);
        assert_eq!(ZOOM_SLIDER.snap(1.52), 1.5);
        assert_eq!(ZOOM_SLIDER.snap(8.0), 8.0);
        assert_eq!(ZOOM_SLIDER.snap(0.1), 0.5);
        assert_eq!(ZOOM_SLIDER.snap(99.0), 50.0);
    }

    #[test]
    fn test_initial_panel_highlights() {
        let panel = SettingsPanel::build(&state());
        assert_eq!(active_labels(&panel.scales), vec!["Normal (0.02)"]);
        assert_eq!(active_labels(&panel.zooms), vec!["Medium (8x)"]);
        assert_eq!(active_labels(&panel.views), vec!["perspective"]);
        assert_eq!(active_labels(&panel.backgrounds), vec!["White"]);
        assert_eq!(panel.scale_slider.text, "Current Scale: 0.020");
        assert_eq!(panel.zoom_slider.text, "Current Zoom: 8.0x");
    }

    #[test]
    fn test_custom_value_highlights_nothing() {
        let mut s = state();
        s.model_scale = 0.021;
        s.zoom = 7.9;
        let panel = SettingsPanel::build(&s);
        assert!(active_labels(&panel.scales).is_empty());
        assert!(active_labels(&panel.zooms).is_empty());
    }

    #[test]
    fn test_toggle_labels() {
        let mut s = state();
        let panel = SettingsPanel::build(&s);
        assert_eq!(panel.grid.label, "Hide Grid");
        assert_eq!(panel.auto_rotate.label, "Start Auto-Rotate");

        s.show_grid = false;
        s.auto_rotate = true;
        let panel = SettingsPanel::build(&s);
        assert_eq!(panel.grid.label, "Show Grid");
        assert_eq!(panel.auto_rotate.label, "Stop Auto-Rotate");
    }

    #[test]
    fn test_out_of_range_zoom_pins_thumb() {
        let mut s = state();
        s.zoom = 0.1;
        let panel = SettingsPanel::build(&s);
        assert_eq!(panel.zoom_slider.thumb, 0.5);
        assert_eq!(active_labels(&panel.zooms), vec!["Nano Close (0.1x)"]);
    }

    #[test]
    fn test_gear_only_when_collapsed() {
        let mut s = state();
        assert!(!shows_gear(&s));
        s.settings_open = false;
        assert!(shows_gear(&s));
    }
}
