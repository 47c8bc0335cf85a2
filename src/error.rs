use std::path::PathBuf;
use thiserror::Error;

use crate::locus::NamingScheme;

/// Errors raised by an aligner backend while producing an alignment
#[derive(Error, Debug)]
pub enum AlignError {
    #[error("{tool} binary not found on PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("alignment contains no sequences")]
    Empty,

    #[error("row {id} has {found} columns, expected {expected}")]
    Ragged {
        id: String,
        found: usize,
        expected: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run-level errors. Everything here aborts the whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("requested {requested} cores but only {available} are available")]
    InsufficientCores { requested: usize, available: usize },

    #[error("output directory {0} exists and removal was not confirmed")]
    OutputDirExists(PathBuf),

    #[error("identifier {identifier:?} has no valid {scheme} locus field")]
    InvalidIdentifier {
        identifier: String,
        scheme: NamingScheme,
    },

    #[error("failed to read sequences from {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("aligner preflight failed: {0}")]
    AlignerUnavailable(#[source] AlignError),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
