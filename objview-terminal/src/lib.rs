//! Terminal host for the OBJ viewer

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use log::warn;
use objview_core::presets::{ViewName, BACKGROUND_PRESETS, SCALE_PRESETS, ZOOM_PRESETS};
use objview_core::scene::SceneHost;
use objview_core::settings::{shows_gear, SettingsPanel, SCALE_SLIDER, ZOOM_SLIDER};
use objview_core::{Camera, FileLoader, ModelViewer, OrbitControls, ViewerEvent};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Keyboard slider nudges move this many slider steps
const SLIDER_NUDGE_STEPS: f32 = 5.0;

/// Background of the active preset in the settings panel
const HIGHLIGHT: Color = Color::Rgb {
    r: 0xd0,
    g: 0x24,
    b: 0x5e,
};

/// Radians of orbit per key press
const KEY_ORBIT_STEP: f32 = 0.15;

/// Radians of orbit per dragged cell
const DRAG_ORBIT_STEP: f32 = 0.05;

/// What a key press or mouse gesture asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Viewer(ViewerEvent),
    Orbit { azimuth: f32, polar: f32 },
    Pan { right: f32, up: f32 },
    Dolly(f32),
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    viewer: ModelViewer,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    drag_origin: Option<(u16, u16)>,
}

impl TerminalApp {
    /// Wrap a viewer, attach a camera sized to the terminal and resolve the model
    pub fn new(mut viewer: ModelViewer) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let render_height = height.saturating_sub(1).max(1);

        viewer
            .attach_camera(Camera::new(width as u32, render_height as u32))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        viewer.load_model(&FileLoader);

        Ok(Self {
            viewer,
            controls: OrbitControls::default(),
            renderer: AsciiRenderer::new(width as usize, render_height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            drag_origin: None,
        })
    }

    pub fn viewer(&self) -> &ModelViewer {
        &self.viewer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let input = event::read()?;
                self.handle_event(input)?;
            }

            self.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, input: Event) -> io::Result<()> {
        let command = match input {
            Event::Key(key) => key_command(&key, &self.viewer),
            Event::Mouse(mouse) => self.mouse_command(&mouse),
            Event::Resize(width, height) => {
                let render_height = height.saturating_sub(1).max(1);
                self.renderer.resize(width as usize, render_height as usize);
                if let Some(camera) = self.viewer.camera_mut() {
                    camera.set_viewport(width as u32, render_height as u32);
                }
                None
            }
            _ => None,
        };
        if let Some(command) = command {
            self.apply(command);
        }
        Ok(())
    }

    fn mouse_command(&mut self, mouse: &MouseEvent) -> Option<Command> {
        match mouse.kind {
            MouseEventKind::Down(_) => {
                self.drag_origin = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Up(_) => {
                self.drag_origin = None;
                None
            }
            MouseEventKind::Drag(button) => {
                let (x0, y0) = self.drag_origin.replace((mouse.column, mouse.row))?;
                let dx = mouse.column as f32 - x0 as f32;
                let dy = mouse.row as f32 - y0 as f32;
                match button {
                    MouseButton::Left => Some(Command::Orbit {
                        azimuth: dx * DRAG_ORBIT_STEP,
                        polar: dy * DRAG_ORBIT_STEP,
                    }),
                    _ => Some(Command::Pan {
                        right: -dx * 0.01,
                        up: dy * 0.02,
                    }),
                }
            }
            MouseEventKind::ScrollUp => Some(Command::Dolly(1.0)),
            MouseEventKind::ScrollDown => Some(Command::Dolly(-1.0)),
            _ => None,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::Viewer(event) => {
                if let Err(err) = self.viewer.dispatch(event) {
                    warn!("{err}");
                }
            }
            Command::Orbit { azimuth, polar } => self.controls.rotate(azimuth, polar),
            Command::Pan { right, up } => {
                if let Some(camera) = self.viewer.camera() {
                    self.controls.pan(right, up, camera);
                }
            }
            Command::Dolly(steps) => self.controls.dolly(steps),
        }
    }

    fn update(&mut self) {
        self.controls.auto_rotate = self.viewer.auto_rotate();
        if let Some(camera) = self.viewer.camera_mut() {
            self.controls.update(camera);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        if let Some(frame) = self.viewer.frame() {
            if let Err(never) = self.renderer.draw(&frame) {
                match never {}
            }
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.present(&mut stdout)?;
        self.draw_overlay(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn draw_overlay<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let state = self.viewer.state();
        let status = format!(
            " objview | {} | view {} | zoom {:.1} | scale {:.3} | FPS {:.1} ",
            model_status(&self.viewer),
            state.current_view,
            state.zoom,
            state.model_scale,
            self.fps,
        );
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(status),
            terminal::Clear(terminal::ClearType::UntilNewLine),
        )?;

        if shows_gear(&state) {
            let (width, _) = self.renderer.size();
            queue!(
                out,
                cursor::MoveTo(width.saturating_sub(16) as u16, 0),
                Print("[Tab] ⚙ Settings"),
            )?;
        } else if let Some(panel) = self.viewer.settings_panel() {
            draw_panel(out, &panel)?;
        }

        if let Some(children) = self.viewer.children() {
            let (_, height) = self.renderer.size();
            queue!(
                out,
                cursor::MoveTo(1, height as u16),
                SetForegroundColor(Color::White),
                Print(children),
            )?;
        }

        queue!(out, ResetColor)?;
        Ok(())
    }
}

/// Load state for the status line; a ready model reports its scaled extents
fn model_status(viewer: &ModelViewer) -> String {
    use objview_core::ModelState;
    match viewer.model().state() {
        ModelState::Pending => "loading".to_string(),
        ModelState::Failed(_) => "failed to load".to_string(),
        ModelState::Ready(mesh) if mesh.is_empty() => "empty model".to_string(),
        ModelState::Ready(mesh) => {
            let triangles = mesh.triangles.len();
            match mesh.bounds() {
                Some(bounds) => {
                    let size = bounds.size() * viewer.state().model_scale;
                    format!(
                        "{triangles} tris, {:.2} x {:.2} x {:.2}",
                        size.x, size.y, size.z
                    )
                }
                None => format!("{triangles} tris"),
            }
        }
    }
}

/// Text lines of the expanded settings panel
pub fn panel_lines(panel: &SettingsPanel) -> Vec<(String, bool)> {
    let mut lines = vec![("Settings  [Tab] close".to_string(), false)];
    lines.push(("Controls:".to_string(), false));
    lines.extend(panel.help.iter().map(|h| (format!("  {h}"), false)));
    lines.push((format!("[g] {}   [r] {}", panel.grid.label, panel.auto_rotate.label), false));

    lines.push(("Model Scale [c/v] [ [ ] ]:".to_string(), false));
    lines.extend(panel.scales.iter().map(|c| (format!("  {}", c.label), c.active)));
    lines.push((format!("  {}", panel.scale_slider.text), false));

    lines.push(("Perspective Views [1-8]:".to_string(), false));
    lines.extend(
        panel
            .views
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("  {} {}", i + 1, c.label), c.active)),
    );

    lines.push((format!("Background [b]: {}", panel.background), false));

    lines.push(("Zoom Level [z/x] [+/-]:".to_string(), false));
    lines.extend(panel.zooms.iter().map(|c| (format!("  {}", c.label), c.active)));
    lines.push((format!("  {}", panel.zoom_slider.text), false));
    lines
}

fn draw_panel<W: Write>(out: &mut W, panel: &SettingsPanel) -> io::Result<()> {
    let lines = panel_lines(panel);
    let width = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0) + 2;

    for (row, (text, active)) in lines.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16 + 1))?;
        if *active {
            queue!(
                out,
                SetBackgroundColor(HIGHLIGHT),
                SetForegroundColor(Color::White),
                SetAttribute(Attribute::Bold),
            )?;
        } else {
            queue!(out, SetBackgroundColor(Color::White), SetForegroundColor(Color::Black))?;
        }
        queue!(
            out,
            Print(format!(" {text:<width$}", width = width - 1)),
            SetAttribute(Attribute::Reset),
        )?;
    }
    Ok(())
}

/// Map a key press to a command, reading current state for cycling keys
pub fn key_command(key: &KeyEvent, viewer: &ModelViewer) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let state = viewer.state();
    let event = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('w') | KeyCode::Up => return Some(orbit(0.0, -KEY_ORBIT_STEP)),
        KeyCode::Char('s') | KeyCode::Down => return Some(orbit(0.0, KEY_ORBIT_STEP)),
        KeyCode::Char('a') | KeyCode::Left => return Some(orbit(-KEY_ORBIT_STEP, 0.0)),
        KeyCode::Char('d') | KeyCode::Right => return Some(orbit(KEY_ORBIT_STEP, 0.0)),
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            ViewerEvent::SelectView(ViewName::ALL[index].to_string())
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            ViewerEvent::ZoomSlider(state.zoom - ZOOM_SLIDER.step * SLIDER_NUDGE_STEPS)
        }
        KeyCode::Char('-') => {
            ViewerEvent::ZoomSlider(state.zoom + ZOOM_SLIDER.step * SLIDER_NUDGE_STEPS)
        }
        KeyCode::Char(']') => {
            ViewerEvent::ScaleSlider(state.model_scale + SCALE_SLIDER.step * SLIDER_NUDGE_STEPS)
        }
        KeyCode::Char('[') => {
            ViewerEvent::ScaleSlider(state.model_scale - SCALE_SLIDER.step * SLIDER_NUDGE_STEPS)
        }
        KeyCode::Char(c @ ('z' | 'x')) => {
            let distances: Vec<f32> = ZOOM_PRESETS.iter().map(|p| p.distance).collect();
            ViewerEvent::SelectZoom(cycle(&distances, &state.zoom, c == 'z'))
        }
        KeyCode::Char(c @ ('c' | 'v')) => {
            let scales: Vec<f32> = SCALE_PRESETS.iter().map(|p| p.scale).collect();
            ViewerEvent::SelectScale(cycle(&scales, &state.model_scale, c == 'v'))
        }
        KeyCode::Char('b') => {
            let values: Vec<&str> = BACKGROUND_PRESETS.iter().map(|p| p.value).collect();
            let current = state.background.as_str();
            ViewerEvent::SetBackground(cycle(&values, &current, true).to_string())
        }
        KeyCode::Char('g') => ViewerEvent::ToggleGrid,
        KeyCode::Char('r') => ViewerEvent::ToggleAutoRotate,
        KeyCode::Tab if state.settings_open => ViewerEvent::CloseSettings,
        KeyCode::Tab => ViewerEvent::OpenSettings,
        _ => return None,
    };
    Some(Command::Viewer(event))
}

fn orbit(azimuth: f32, polar: f32) -> Command {
    Command::Orbit { azimuth, polar }
}

/// Step to the next (or previous) entry after the one equal to `current`.
/// A value matching no entry starts from the front (or back).
fn cycle<T: PartialEq + Copy>(values: &[T], current: &T, forward: bool) -> T {
    let len = values.len();
    let next = match values.iter().position(|v| v == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    values[next]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use objview_core::ViewerProps;

    fn viewer() -> ModelViewer {
        ModelViewer::new(ViewerProps::new("model.obj", false)).unwrap()
    }

    #[test]
    fn test_status_reports_scaled_extents() {
        let mut viewer = viewer();
        assert_eq!(model_status(&viewer), "loading");

        viewer.model_mut().resolve(
            "model.obj",
            objview_core::obj::parse_obj("v 0 0 0\nv 100 0 0\nv 0 50 0\nf 1 2 3\n"),
        );
        assert_eq!(model_status(&viewer), "1 tris, 2.00 x 1.00 x 0.00");

        viewer
            .model_mut()
            .resolve("model.obj", objview_core::obj::parse_obj("# nothing\n"));
        assert_eq!(model_status(&viewer), "empty model");
    }

    fn press(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    #[test]
    fn test_number_keys_select_views() {
        let viewer = viewer();
        assert_eq!(
            key_command(&press(KeyCode::Char('1')), &viewer),
            Some(Command::Viewer(ViewerEvent::SelectView("front".to_string())))
        );
        assert_eq!(
            key_command(&press(KeyCode::Char('8')), &viewer),
            Some(Command::Viewer(ViewerEvent::SelectView("perspective".to_string())))
        );
        assert_eq!(key_command(&press(KeyCode::Char('9')), &viewer), None);
    }

    #[test]
    fn test_arrow_keys_orbit() {
        let viewer = viewer();
        assert_eq!(
            key_command(&press(KeyCode::Left), &viewer),
            Some(orbit(-KEY_ORBIT_STEP, 0.0))
        );
        assert_eq!(
            key_command(&press(KeyCode::Char('w')), &viewer),
            Some(orbit(0.0, -KEY_ORBIT_STEP))
        );
    }

    #[test]
    fn test_zoom_cycle_moves_closer() {
        let viewer = viewer();
        // Initial zoom 8 is the Medium preset; the next one in is Close
        assert_eq!(
            key_command(&press(KeyCode::Char('z')), &viewer),
            Some(Command::Viewer(ViewerEvent::SelectZoom(3.0)))
        );
        assert_eq!(
            key_command(&press(KeyCode::Char('x')), &viewer),
            Some(Command::Viewer(ViewerEvent::SelectZoom(15.0)))
        );
    }

    #[test]
    fn test_cycle_wraps_and_starts_fresh() {
        assert_eq!(cycle(&[1, 2, 3], &3, true), 1);
        assert_eq!(cycle(&[1, 2, 3], &1, false), 3);
        assert_eq!(cycle(&[1, 2, 3], &7, true), 1);
        assert_eq!(cycle(&[1, 2, 3], &7, false), 3);
    }

    #[test]
    fn test_background_cycles_from_white() {
        let viewer = viewer();
        assert_eq!(
            key_command(&press(KeyCode::Char('b')), &viewer),
            Some(Command::Viewer(ViewerEvent::SetBackground("#f0f0f0".to_string())))
        );
    }

    #[test]
    fn test_tab_toggles_panel() {
        let mut viewer = viewer();
        assert_eq!(
            key_command(&press(KeyCode::Tab), &viewer),
            Some(Command::Viewer(ViewerEvent::OpenSettings))
        );
        viewer.dispatch(ViewerEvent::OpenSettings).unwrap();
        assert_eq!(
            key_command(&press(KeyCode::Tab), &viewer),
            Some(Command::Viewer(ViewerEvent::CloseSettings))
        );
    }

    #[test]
    fn test_panel_lines_mark_active_presets() {
        let mut viewer = viewer();
        viewer.dispatch(ViewerEvent::OpenSettings).unwrap();
        let lines = panel_lines(&viewer.settings_panel().unwrap());
        let active: Vec<&str> = lines
            .iter()
            .filter(|(_, active)| *active)
            .map(|(text, _)| text.trim())
            .collect();
        assert_eq!(active, vec!["Normal (0.02)", "8 perspective", "Medium (8x)"]);
    }
}
