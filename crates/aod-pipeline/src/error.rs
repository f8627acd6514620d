//! Error types for the AOD pipeline.

use gdal_tools::{ParseError, ToolError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while processing rasters.
///
/// Per-file variants are captured into result structs; only the fatal ones
/// (see [`PipelineError::is_fatal`]) escape a directory run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Failed to parse tool output: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    NoValidData(String),

    #[error("No pixels found in specified zone")]
    NoPixelsInZone,

    #[error("No valid AOD pixels in specified zone")]
    NoValidPixelsInZone,

    #[error("Failed to read directory {path:?}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No TIF files found in directory {0:?}")]
    NoRasterFiles(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Directory-level conditions that stop a whole run.
    pub fn is_fatal(&self) -> bool {
        match self {
            PipelineError::Tool(e) => e.is_unavailable(),
            PipelineError::DirectoryUnreadable { .. } | PipelineError::NoRasterFiles(_) => true,
            _ => false,
        }
    }

    /// Text stored in a per-file `error` field.
    ///
    /// A failed tool run reports its own stderr when it wrote any.
    pub fn file_message(&self) -> String {
        match self {
            PipelineError::Tool(e) => match e.stderr() {
                Some(stderr) if !stderr.is_empty() => stderr.to_string(),
                _ => e.to_string(),
            },
            other => other.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
