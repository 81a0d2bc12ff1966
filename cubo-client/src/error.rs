use std::path::PathBuf;

use cubo_core::PipelineError;

/// Everything that can stop the client before or during rendering.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ClientError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClientError::Io {
            path: path.into(),
            source,
        }
    }
}
