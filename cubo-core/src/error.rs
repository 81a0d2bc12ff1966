//! Error types shared by every stage of the pipeline.

use std::fmt;

/// The stage of program construction that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompileStage {
    Vertex,
    Fragment,
    Link,
}

impl fmt::Display for CompileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileStage::Vertex => write!(f, "vertex"),
            CompileStage::Fragment => write!(f, "fragment"),
            CompileStage::Link => write!(f, "link"),
        }
    }
}

/// Fatal pipeline errors. None of these are retried; the render loop stops on the first one.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {log}")]
    Compile { stage: CompileStage, log: String },

    #[error("failed to allocate {resource}: {reason}")]
    ResourceAllocation {
        resource: &'static str,
        reason: String,
    },

    #[error("linked program does not expose `{name}`")]
    MissingBinding { name: &'static str },

    #[error("graphics driver reported error 0x{0:04X}")]
    Driver(u32),
}

impl PipelineError {
    pub(crate) fn allocation(resource: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::ResourceAllocation {
            resource,
            reason: reason.into(),
        }
    }

    /// Returns the failing stage if this is a compile or link error.
    pub fn compile_stage(&self) -> Option<CompileStage> {
        match self {
            PipelineError::Compile { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
