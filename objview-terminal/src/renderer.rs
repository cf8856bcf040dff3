//! ASCII rasterizer for terminal rendering

use std::convert::Infallible;
use std::io::Write;

use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use objview_core::scene::{irradiance, Frame, GridConfig, Light, Rgb, SceneHost};
use objview_core::{Camera, Mesh, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light level that maps to the top of the ramp
const FULL_BRIGHTNESS: f32 = 2.4;

/// Distance between grid samples along a line, in world units
const GRID_SAMPLE_STEP: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Grid { section: bool, fade: f32 },
    Surface(char),
}

/// ASCII renderer that converts a scene frame to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    background: Rgb,
    grid_colors: (Rgb, Rgb),
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::Empty; size],
            background: Rgb::new(255, 255, 255),
            grid_colors: (Rgb::new(0x6f, 0x6f, 0x6f), Rgb::new(0x9d, 0x4b, 0x4b)),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            background: self.background,
            grid_colors: self.grid_colors,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::Empty);
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> char {
        match self.cells[y * self.width + x] {
            Cell::Empty => ' ',
            Cell::Grid { section: true, .. } => '+',
            Cell::Grid { section: false, .. } => '·',
            Cell::Surface(c) => c,
        }
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        lights: &[Light],
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, lights);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        lights: &[Light],
    ) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Shade in world space at the centroid
        let centroid = Point3::from(
            triangle
                .vertices
                .iter()
                .map(|v| v.position.coords)
                .sum::<nalgebra::Vector3<f32>>()
                / 3.0,
        );
        let world_point = model_matrix.transform_point(&centroid);
        let normal = model_matrix
            .transform_vector(&triangle.shading_normal())
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(nalgebra::Vector3::zeros);
        let light = irradiance(lights, &world_point, &normal);

        let level = (light / FULL_BRIGHTNESS).clamp(0.0, 1.0);
        let index = (level * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let character = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x as usize, y as usize, depth, Cell::Surface(character));
                }
            }
        }
    }

    pub fn render_grid(&mut self, grid: &GridConfig, camera: &Camera) {
        self.grid_colors = (grid.cell_color, grid.section_color);
        let identity = Matrix4::identity();

        for line in grid.lines() {
            let length = (line.end - line.start).norm();
            let samples = (length / GRID_SAMPLE_STEP).ceil().max(1.0) as usize;
            for i in 0..=samples {
                let point = line.start + (line.end - line.start) * (i as f32 / samples as f32);
                let fade = grid.fade((point - camera.position).norm());
                if fade <= 0.05 {
                    continue;
                }
                if let Some((x, y, depth)) =
                    camera.project_to_screen(&point, &identity, self.width as u32, self.height as u32)
                {
                    let (x, y) = (x as usize, y as usize);
                    if x < self.width && y < self.height {
                        let section = line.section;
                        self.plot(x, y, depth, Cell::Grid { section, fade });
                    }
                }
            }
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f32, cell: Cell) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    /// Write the framebuffer to the terminal
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let bg = self.background;
        let dark_background = bg.luminance() < 0.5;
        writer.queue(SetBackgroundColor(rgb(bg)))?;

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = match self.cells[idx] {
                    Cell::Empty => rgb(bg),
                    Cell::Grid { section, fade } => {
                        let line = if section { self.grid_colors.1 } else { self.grid_colors.0 };
                        rgb(blend(bg, line, fade))
                    }
                    Cell::Surface(c) => surface_color(c, dark_background),
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(self.char_at(x, y)))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl SceneHost for AsciiRenderer {
    type Error = Infallible;

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Infallible> {
        self.clear();
        self.background = Rgb::from_css(frame.background).unwrap_or(Rgb::new(255, 255, 255));

        if let Some(grid) = frame.grid {
            self.render_grid(grid, frame.camera);
        }
        if let Some((mesh, model_matrix)) = frame.model {
            self.render_mesh(mesh, &model_matrix, frame.camera, frame.lights);
        }
        Ok(())
    }
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Mix `over` onto `under` with opacity `alpha`
fn blend(under: Rgb, over: Rgb, alpha: f32) -> Rgb {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * alpha).round() as u8;
    Rgb::new(mix(under.r, over.r), mix(under.g, over.g), mix(under.b, over.b))
}

/// Surface color by ramp position, picked to contrast with the background
fn surface_color(c: char, dark_background: bool) -> Color {
    let level = LUMINOSITY_RAMP.iter().position(|&r| r == c).unwrap_or(0);
    let bright = level >= LUMINOSITY_RAMP.len() / 2;
    match (dark_background, bright) {
        (true, true) => Color::White,
        (true, false) => Color::Grey,
        (false, true) => Color::DarkBlue,
        (false, false) => Color::DarkGrey,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use objview_core::scene::{GRID, LIGHT_RIG};
    use objview_core::{Transform, Vertex};

    fn camera_facing_origin(distance: f32) -> Camera {
        let mut camera = Camera::new(40, 20);
        camera.position = Point3::new(0.0, 0.0, distance);
        camera.look_at(Point3::origin());
        camera
    }

    fn big_quad() -> Mesh {
        let v = |x: f32, y: f32| Vertex::new(Point3::new(x, y, 0.0), nalgebra::Vector3::z());
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0)));
        mesh.add_triangle(Triangle::new(v(-1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)));
        mesh
    }

    #[test]
    fn test_barycentric_center() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-6);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-6);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_has_no_coordinates() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_empty_frame_is_blank() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let camera = camera_facing_origin(5.0);
        let frame = Frame {
            camera: &camera,
            model: None,
            grid: None,
            lights: &LIGHT_RIG,
            background: "#000000",
        };
        SceneHost::draw(&mut renderer, &frame).unwrap();
        assert!((0..20).all(|y| (0..40).all(|x| renderer.char_at(x, y) == ' ')));
    }

    #[test]
    fn test_model_covers_screen_center() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let camera = camera_facing_origin(3.0);
        let mesh = big_quad();
        let frame = Frame {
            camera: &camera,
            model: Some((&mesh, Matrix4::identity())),
            grid: None,
            lights: &LIGHT_RIG,
            background: "#ffffff",
        };
        SceneHost::draw(&mut renderer, &frame).unwrap();
        assert_ne!(renderer.char_at(20, 10), ' ');
        assert_eq!(renderer.char_at(0, 0), ' ');
    }

    #[test]
    fn test_tiny_scale_shrinks_the_model() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let camera = camera_facing_origin(3.0);
        let mesh = big_quad();
        renderer.render_mesh(&mesh, &Transform::uniform_scale_matrix(0.001), &camera, &LIGHT_RIG);
        let covered = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != ' ')
            .count();
        assert!(covered <= 1);
    }

    #[test]
    fn test_grid_visible_from_above() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let mut camera = Camera::new(40, 20);
        camera.position = Point3::new(0.0, 5.0, 5.0);
        camera.look_at(Point3::origin());
        renderer.render_grid(&GRID, &camera);
        let grid_cells = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| matches!(renderer.char_at(x, y), '·' | '+'))
            .count();
        assert!(grid_cells > 0);
    }

    #[test]
    fn test_zero_width_terminal_draws_nothing() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let mut camera = camera_facing_origin(3.0);
        renderer.resize(0, 20);
        camera.set_viewport(0, 20);
        let mesh = big_quad();
        let frame = Frame {
            camera: &camera,
            model: Some((&mesh, Matrix4::identity())),
            grid: Some(&GRID),
            lights: &LIGHT_RIG,
            background: "#ffffff",
        };
        SceneHost::draw(&mut renderer, &frame).unwrap();
        assert_eq!(renderer.size(), (0, 20));
    }

    #[test]
    fn test_present_writes_rows() {
        let renderer = AsciiRenderer::new(4, 2);
        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }
}
