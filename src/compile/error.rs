use crate::targets::MAX_CONCURRENCY;
use thiserror::Error;

/// Problems with the requested compilation detected before any build tool
/// process is started.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid entry: {reason}")]
    InvalidEntry { reason: String },

    #[error("maxConcurrency must be between 1 and {MAX_CONCURRENCY} (got {value})")]
    InvalidConcurrency { value: usize },

    #[error("At least one target has to be provided!")]
    NoTargetsSelected,

    #[error("Failed to load {path}: {reason}")]
    Config { path: String, reason: String },
}

/// Errors that abort a whole `compile` run. Per-target failures are not
/// errors; they are reported in the summary.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}
