//! Driving the pipeline from host animation ticks.

use crate::{error::PipelineError, pipeline::Pipeline, surface::Surface};

/// A per-frame scheduler supplied by the host.
pub trait AnimationDriver {
    /// Waits for the next animation tick and returns its timestamp in milliseconds.
    ///
    /// Timestamps increase monotonically. Returns `None` once the host has torn the surface
    /// down.
    fn request_frame(&mut self) -> Option<f64>;
}

/// Turns timestamps into elapsed time and hands each tick to the pipeline.
#[derive(Debug, Default, Clone)]
pub struct RenderLoop {
    /// Previous timestamp in seconds. Starts at zero, so the first frame sees the whole
    /// time since the driver's epoch.
    then: f64,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the tick at `now_ms` and returns the seconds elapsed since the previous one.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let now = now_ms / 1000.0;
        let elapsed = now - self.then;
        self.then = now;
        self.frames += 1;
        elapsed as f32
    }

    /// Number of ticks processed.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Renders one frame per driver tick until the driver stops or a frame fails.
    pub fn run<D, S>(
        &mut self,
        driver: &mut D,
        pipeline: &mut Pipeline<S>,
    ) -> Result<(), PipelineError>
    where
        D: AnimationDriver,
        S: Surface,
    {
        while let Some(now_ms) = driver.request_frame() {
            let elapsed = self.advance(now_ms);
            pipeline.render_frame(elapsed)?;
        }
        log::debug!("Animation driver stopped after {} frames", self.frames);
        Ok(())
    }
}
