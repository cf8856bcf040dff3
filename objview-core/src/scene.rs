//! Static scene configuration and the capability a rendering host provides.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Mesh;
use crate::projection::Camera;

/// Light sources of the fixed rig
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { intensity: f32 },
    /// Shines from `position` towards the origin
    Directional {
        position: [f32; 3],
        intensity: f32,
    },
    Point {
        position: [f32; 3],
        intensity: f32,
    },
}

impl Light {
    /// Diffuse contribution at a surface point with unit normal `normal`
    pub fn illuminate(&self, point: &Point3<f32>, normal: &Vector3<f32>) -> f32 {
        let (to_light, intensity) = match *self {
            Light::Ambient { intensity } => return intensity,
            Light::Directional { position, intensity } => (Vector3::from(position), intensity),
            Light::Point { position, intensity } => {
                (Point3::from(position) - point, intensity)
            }
        };
        match to_light.try_normalize(f32::EPSILON) {
            Some(dir) => intensity * normal.dot(&dir).max(0.0),
            None => 0.0,
        }
    }
}

/// Lights every side of the model so no preset view ends up dark
pub static LIGHT_RIG: [Light; 9] = [
    Light::Ambient { intensity: 0.6 },
    Light::Directional {
        position: [10.0, 10.0, 5.0],
        intensity: 1.2,
    },
    Light::Directional {
        position: [-10.0, -10.0, -5.0],
        intensity: 0.8,
    },
    Light::Directional {
        position: [0.0, 10.0, 0.0],
        intensity: 0.6,
    },
    Light::Directional {
        position: [0.0, -10.0, 0.0],
        intensity: 0.4,
    },
    Light::Point {
        position: [5.0, 5.0, 5.0],
        intensity: 0.8,
    },
    Light::Point {
        position: [-5.0, -5.0, -5.0],
        intensity: 0.6,
    },
    Light::Point {
        position: [0.0, 0.0, 10.0],
        intensity: 0.4,
    },
    Light::Point {
        position: [0.0, 0.0, -10.0],
        intensity: 0.4,
    },
];

/// Total light reaching a point, summed over `lights`
pub fn irradiance(lights: &[Light], point: &Point3<f32>, normal: &Vector3<f32>) -> f32 {
    lights.iter().map(|light| light.illuminate(point, normal)).sum()
}

/// Ground grid overlay on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub size: [f32; 2],
    pub cell_size: f32,
    pub cell_thickness: f32,
    pub cell_color: Rgb,
    pub section_size: f32,
    pub section_thickness: f32,
    pub section_color: Rgb,
    pub fade_distance: f32,
    pub fade_strength: f32,
    pub follow_camera: bool,
    pub infinite: bool,
}

pub static GRID: GridConfig = GridConfig {
    size: [10.0, 10.0],
    cell_size: 1.0,
    cell_thickness: 0.5,
    cell_color: Rgb::new(0x6f, 0x6f, 0x6f),
    section_size: 5.0,
    section_thickness: 1.0,
    section_color: Rgb::new(0x9d, 0x4b, 0x4b),
    fade_distance: 30.0,
    fade_strength: 1.0,
    follow_camera: false,
    infinite: true,
};

/// One grid line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    /// Section lines are drawn heavier than cell lines
    pub section: bool,
}

impl GridConfig {
    /// Half-extent of the drawn area; an infinite grid is cut at the fade distance
    pub fn half_extent(&self) -> f32 {
        if self.infinite {
            self.fade_distance
        } else {
            self.size[0].max(self.size[1]) / 2.0
        }
    }

    pub fn lines(&self) -> Vec<GridLine> {
        let extent = self.half_extent();
        let cells = (extent / self.cell_size).floor() as i32;
        let per_section = (self.section_size / self.cell_size).round().max(1.0) as i32;
        let mut lines = Vec::with_capacity((cells as usize * 2 + 1) * 2);

        for i in -cells..=cells {
            let offset = i as f32 * self.cell_size;
            let section = i % per_section == 0;
            lines.push(GridLine {
                start: Point3::new(offset, 0.0, -extent),
                end: Point3::new(offset, 0.0, extent),
                section,
            });
            lines.push(GridLine {
                start: Point3::new(-extent, 0.0, offset),
                end: Point3::new(extent, 0.0, offset),
                section,
            });
        }
        lines
    }

    /// Opacity of the grid at `distance` from the camera
    pub fn fade(&self, distance: f32) -> f32 {
        let t = (distance / self.fade_distance).clamp(0.0, 1.0);
        (1.0 - t).powf(self.fade_strength)
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').filter(|d| d.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Best solid color for a CSS background value; gradients use their
    /// first hex stop
    pub fn from_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(color) = Self::from_hex(value) {
            return Some(color);
        }
        value.match_indices('#').find_map(|(at, _)| {
            let end = value[at + 1..]
                .find(|c: char| !c.is_ascii_hexdigit())
                .map_or(value.len(), |n| at + 1 + n);
            Self::from_hex(&value[at..end])
        })
    }

    /// Relative luminance in [0, 1]
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub camera: &'a Camera,
    /// The resolved model and its placement, absent while loading or failed
    pub model: Option<(&'a Mesh, Matrix4<f32>)>,
    pub grid: Option<&'a GridConfig>,
    pub lights: &'a [Light],
    /// CSS background value
    pub background: &'a str,
}

/// A rendering host: draws frames and owns the render loop
pub trait SceneHost {
    type Error;

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(Rgb::from_hex("#87CEEB"), Some(Rgb::new(0x87, 0xce, 0xeb)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("87ceeb"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_gradient_uses_first_stop() {
        let gradient = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";
        assert_eq!(Rgb::from_css(gradient), Some(Rgb::new(0x66, 0x7e, 0xea)));
        assert_eq!(Rgb::from_css("papayawhip"), None);
    }

    #[test]
    fn test_ambient_ignores_orientation() {
        let light = Light::Ambient { intensity: 0.6 };
        let down = Vector3::new(0.0, -1.0, 0.0);
        assert_eq!(light.illuminate(&Point3::origin(), &down), 0.6);
    }

    #[test]
    fn test_directional_light_is_lambertian() {
        let light = Light::Directional {
            position: [0.0, 10.0, 0.0],
            intensity: 1.0,
        };
        let up = Vector3::new(0.0, 1.0, 0.0);
        let side = Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(light.illuminate(&Point3::origin(), &up), 1.0);
        assert_relative_eq!(light.illuminate(&Point3::origin(), &side), 0.0);
        assert_relative_eq!(light.illuminate(&Point3::origin(), &-up), 0.0);
    }

    #[test]
    fn test_rig_lights_the_underside() {
        let down = Vector3::new(0.0, -1.0, 0.0);
        assert!(irradiance(&LIGHT_RIG, &Point3::origin(), &down) > 0.6);
    }

    #[test]
    fn test_grid_lines_cover_fade_distance() {
        let lines = GRID.lines();
        // 61 lines per axis for a 30-unit half extent at 1-unit cells
        assert_eq!(lines.len(), 122);
        assert!(lines.iter().filter(|l| l.section).count() == 26);
        assert_eq!(GRID.fade(0.0), 1.0);
        assert_eq!(GRID.fade(45.0), 0.0);
    }
}
