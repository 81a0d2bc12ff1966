use std::{path::PathBuf, process::ExitCode, sync::Arc};

use cubo_core::{GlowSurface, Pipeline, RenderLoop};

use crate::{app::App, config::ClientConfig, driver::SdlDriver, error::ClientError};

mod app;
mod config;
mod driver;
mod error;
mod logging;

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let config = match ClientConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(logging::effective_level(config.log_level)) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ClientConfig) -> Result<(), ClientError> {
    let pipeline_config = config.pipeline_config()?;

    let app = App::new(&config.window)?;
    let (width, height) = app.window.drawable_size();
    let surface = Arc::new(GlowSurface::new(&app.gl, width, height));

    // Declared before the pipeline so the GL context outlives every GL object.
    let mut driver = SdlDriver::new(app, Arc::clone(&surface));
    let mut pipeline = Pipeline::new(&surface, &pipeline_config)?;

    let mut render_loop = RenderLoop::new();
    render_loop.run(&mut driver, &mut pipeline)?;

    log::info!("Rendered {} frames", render_loop.frames());
    Ok(())
}
