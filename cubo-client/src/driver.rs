//! The SDL2 animation driver.

use std::{sync::Arc, time::Instant};

use cubo_core::{AnimationDriver, GlowSurface};
use sdl2::event::{Event, WindowEvent};

use crate::app::App;

/// Presents the previous frame, pumps window events and timestamps the next frame.
///
/// Only window close and resize are handled; the demo takes no input.
pub struct SdlDriver {
    app: App,
    surface: Arc<GlowSurface>,
    epoch: Instant,
    presented: bool,
}

impl SdlDriver {
    pub fn new(app: App, surface: Arc<GlowSurface>) -> Self {
        Self {
            app,
            surface,
            epoch: Instant::now(),
            presented: false,
        }
    }
}

impl AnimationDriver for SdlDriver {
    fn request_frame(&mut self) -> Option<f64> {
        if self.presented {
            self.app.window.gl_swap_window();
        }
        self.presented = true;

        for event in self.app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => return None,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = self.app.window.drawable_size();
                    self.surface.resize(width, height);
                    log::debug!("Drawable resized to {width}x{height}");
                }
                _ => {}
            }
        }

        Some(self.epoch.elapsed().as_secs_f64() * 1000.0)
    }
}
