mod app;
mod camera;
mod components;
mod config;
mod engine;
mod error;
mod lighting;
mod renderer;
mod scene;
mod systems;

use std::path::PathBuf;

use anyhow::Context;
use app::DemoApp;
use clap::Parser;
use config::RendererConfig;
use engine::input::InputState;
use engine::time::FrameTimer;
use engine::window::GameWindow;

#[derive(Parser)]
#[command(name = "umbra", about = "Shadow-mapped forward renderer demo")]
struct Args {
    /// TOML config file; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit after rendering this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Present immediately instead of waiting for vblank
    #[arg(long)]
    no_vsync: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };

    let sdl = sdl2::init()
        .map_err(anyhow::Error::msg)
        .context("Failed to init SDL2")?;
    let vsync = config.window.vsync && !args.no_vsync;
    let window = GameWindow::new(&sdl, &config.window, vsync).context("Failed to create window")?;

    let mut app = DemoApp::new(&config).context("Failed to build scene")?;

    sdl.mouse().set_relative_mouse_mode(true);

    let mut event_pump = sdl
        .event_pump()
        .map_err(anyhow::Error::msg)
        .context("Failed to get event pump")?;
    let mut input = InputState::new();
    let mut timer = FrameTimer::new();

    loop {
        timer.tick();
        input.update(&mut event_pump);
        if input.should_quit() {
            break;
        }
        if input.resized {
            let (w, h) = window.drawable_size();
            log::debug!("Drawable resized to {w}x{h}");
        }

        app.update(&input, timer.dt);
        app.render(&window);
        window.swap();

        if args.frames.is_some_and(|limit| timer.frames >= limit) {
            log::info!("Rendered {} frames, exiting", timer.frames);
            break;
        }
    }

    Ok(())
}
