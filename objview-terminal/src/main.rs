//! objview - view an OBJ model in the terminal
//!
//! Controls:
//!   - WASD / Arrow Keys / left drag: Orbit
//!   - Right drag: Pan, scroll: Dolly
//!   - 1-8: Preset views
//!   - +/- and [/]: Zoom and scale sliders
//!   - Z/X and C/V: Step through zoom and scale presets
//!   - G: Grid, R: Auto-rotate, B: Background
//!   - Tab: Settings panel
//!   - Q/ESC: Quit

use clap::Parser;
use log::info;
use objview_core::{ModelViewer, ViewerProps};
use objview_terminal::TerminalApp;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "objview", version, about = "Terminal OBJ model viewer")]
struct Args {
    /// Path to the .obj file
    path: PathBuf,

    /// Initial zoom slider value
    #[arg(long)]
    zoom: Option<f32>,

    /// Initial uniform model scale
    #[arg(long)]
    scale: Option<f32>,

    /// Start with the settings panel open
    #[arg(long)]
    settings: bool,

    /// JSON file with viewer props; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

fn props_from_args(args: &Args) -> io::Result<ViewerProps> {
    let url = args.path.to_string_lossy().into_owned();
    let mut props = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            ViewerProps::from_json(&json)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        }
        None => ViewerProps::new(url.clone(), args.settings),
    };

    props.url = url;
    props.show_settings |= args.settings;
    if let Some(zoom) = args.zoom {
        props.initial_zoom = zoom;
    }
    if let Some(scale) = args.scale {
        props.initial_scale = scale;
    }
    Ok(props)
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let props = props_from_args(&args)?;
    info!("opening {}", props.url);
    let viewer = ModelViewer::new(props)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut app = TerminalApp::new(viewer)?;
    app.run()
}
