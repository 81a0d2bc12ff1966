//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context the demo renders into.

use std::sync::Arc;

use sdl2::video::{FullscreenType, GLProfile, SwapInterval};

use crate::{config::WindowConfig, error::ClientError};

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] with a window described by `config` and a current
    /// OpenGL 3.3 core context. The width and height are ignored in fullscreen.
    pub fn new(config: &WindowConfig) -> Result<Self, ClientError> {
        let sdl = sdl2::init().map_err(ClientError::Sdl)?;
        let video_subsystem = sdl.video().map_err(ClientError::Sdl)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let (width, height) = if config.fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(ClientError::Sdl)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (config.width, config.height)
        };

        let mut window = video_subsystem
            .window(&config.title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| ClientError::Sdl(e.to_string()))?;
        window
            .set_fullscreen(if config.fullscreen {
                FullscreenType::Desktop
            } else {
                FullscreenType::Off
            })
            .map_err(ClientError::Sdl)?;

        let gl_context = window.gl_create_context().map_err(ClientError::Sdl)?;
        window
            .gl_make_current(&gl_context)
            .map_err(ClientError::Sdl)?;

        let interval = if config.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("Could not set swap interval {interval:?}: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(ClientError::Sdl)?;

        log::info!(
            "Opened {}x{} window with an OpenGL 3.3 core context",
            width,
            height
        );

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }
}
