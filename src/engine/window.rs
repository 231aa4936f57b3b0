use sdl2::video::{GLContext, GLProfile, SwapInterval, Window};
use sdl2::Sdl;

use crate::config::WindowConfig;
use crate::error::{RenderError, Result};

pub struct GameWindow {
    _gl_context: GLContext,
    window: Window,
}

impl GameWindow {
    /// Open a window with a GL 3.3 core context and load GL entry points.
    pub fn new(sdl: &Sdl, config: &WindowConfig, vsync: bool) -> Result<Self> {
        let video = sdl.video().map_err(RenderError::Window)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let window = video
            .window(&config.title, config.width, config.height)
            .opengl()
            .position_centered()
            .build()
            .map_err(|e| RenderError::Window(e.to_string()))?;

        let gl_context = window.gl_create_context().map_err(RenderError::Window)?;

        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);

        let interval = if vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = video.gl_set_swap_interval(interval) {
            log::warn!("Could not set swap interval: {e}");
        }

        let (w, h) = window.drawable_size();
        log::info!("Opened {}x{} window ({w}x{h} drawable)", config.width, config.height);

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    /// Framebuffer size in pixels, for the lit pass viewport.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.window.drawable_size();
        w as f32 / h.max(1) as f32
    }
}
