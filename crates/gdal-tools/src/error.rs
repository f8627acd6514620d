//! Error types for GDAL tool invocation and report parsing.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Failures running an external GDAL executable.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable is missing or cannot be invoked at all.
    #[error("{tool} is not available at {path:?}: {source}")]
    Unavailable {
        tool: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS refused to start the process for another reason.
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited non-zero.
    #[error("{tool} failed ({}): {stderr}", exit_label(.code))]
    Execution {
        tool: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    /// The process did not finish within the configured bound and was killed.
    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: &'static str, after: Duration },

    /// Reading tool output or the intermediate grid failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// True when the pipeline as a whole cannot proceed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ToolError::Unavailable { .. })
    }

    /// Captured stderr, if the tool got far enough to produce any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ToolError::Execution { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {}", c),
        None => "terminated by signal".to_string(),
    }
}

/// Expected content missing from otherwise successful tool output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("ASCII grid contains no data rows")]
    EmptyGrid,
}
