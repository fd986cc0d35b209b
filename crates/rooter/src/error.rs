//! Error types surfaced by the top-level operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;

/// Errors that can occur while resolving, finding or loading modules
#[derive(Debug, Error)]
pub enum RooterError {
    /// Malformed input (e.g. a fragment with a NUL byte, a non-UTF-8 pattern)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Resolved load target does not exist or is not a file
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Located file failed to evaluate
    #[error("Failed to load module {}: {source}", .path.display())]
    ModuleLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// Invalid glob pattern syntax
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Configuration could not be read
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RooterError {
    pub(crate) fn module_load(path: impl Into<PathBuf>, source: impl Into<LoadError>) -> Self {
        RooterError::ModuleLoad {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RooterError>;
