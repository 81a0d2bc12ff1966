//! Client configuration.
//!
//! The config is a JSON file; every field is optional. It is looked up at the path given on
//! the command line, then at `<config dir>/cubo/config.json`, and otherwise the defaults are
//! used.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use cubo_core::{PipelineConfig, TextureSource, ViewConfig};
use log::LevelFilter;
use serde::Deserialize;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cubo".to_string(),
            width: 640,
            height: 480,
            fullscreen: false,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub window: WindowConfig,
    /// Image shown on every face of the cube. The built-in checkerboard if unset.
    pub texture: Option<PathBuf>,
    /// Replaces the built-in vertex shader.
    pub vertex_shader: Option<PathBuf>,
    /// Replaces the built-in fragment shader.
    pub fragment_shader: Option<PathBuf>,
    pub view: ViewConfig,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            texture: None,
            vertex_shader: None,
            fragment_shader: None,
            view: ViewConfig::default(),
            log_level: LevelFilter::Info,
        }
    }
}

impl ClientConfig {
    /// Where the config is looked for when no path is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cubo").join("config.json"))
    }

    /// Loads the config from `explicit`, or from [`ClientConfig::default_path`] if that file
    /// exists, or falls back to the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ClientError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|e| ClientError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|source| ClientError::Config { path, source })
    }

    /// Builds the pipeline config, reading any shader overrides from disk.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ClientError> {
        let defaults = PipelineConfig::default();
        Ok(PipelineConfig {
            vertex_source: read_override(self.vertex_shader.as_deref(), defaults.vertex_source)?,
            fragment_source: read_override(
                self.fragment_shader.as_deref(),
                defaults.fragment_source,
            )?,
            mesh: defaults.mesh,
            texture: match &self.texture {
                Some(path) => TextureSource::File(path.clone()),
                None => defaults.texture,
            },
            view: self.view,
        })
    }
}

fn read_override(
    path: Option<&Path>,
    fallback: Cow<'static, str>,
) -> Result<Cow<'static, str>, ClientError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map(Cow::Owned)
            .map_err(|e| ClientError::io(path, e)),
        None => Ok(fallback),
    }
}
