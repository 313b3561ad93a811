// ============================================================
// Layer 3: Pipeline Error Taxonomy
// ============================================================
// Every component returns PipelineResult<T>. The variants map
// one-to-one onto the failure classes an operator can act on:
//
//   Format        - the input file is malformed
//   InvalidConfig - split fraction, alpha or subset sizes are unusable
//   Numeric       - the regularised normal equations have no stable solution
//   Io / Json     - the filesystem or an output encoder failed
//   Recorder      - the run recorder rejected a call
//   Plot          - the actual-vs-predicted image could not be written
//
// None of them are recovered from locally: the run stops and the
// error travels up to main unchanged.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::state::PipelineState;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("format error: {0}")]
    Format(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("numeric error: {0}")]
    Numeric(String),

    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("run recorder: {0}")]
    Recorder(String),

    #[error("plot rendering failed: {0}")]
    Plot(String),

    #[error("illegal pipeline transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: PipelineState,
        to:   PipelineState,
    },
}

impl PipelineError {
    /// Attach a path to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
