//! Module evaluation
//!
//! A module is a file evaluated into an opaque [`serde_json::Value`]. The
//! evaluator is picked by file extension from a [`ModuleLoader`] registry.
//! Built-in formats:
//! - `json` parsed with serde_json
//! - `toml` parsed with toml
//! - `txt` kept verbatim as a string
//!
//! Other formats plug in through [`Evaluate`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{Result, RooterError};

/// Why a located file could not be turned into a module
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the file failed (including invalid UTF-8)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML syntax error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No evaluator is registered for the file extension
    #[error("No evaluator registered for extension {0:?}")]
    UnsupportedExtension(String),

    /// Failure raised by a caller-supplied evaluator
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
    /// Wrap an arbitrary evaluator error.
    pub fn custom(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        LoadError::Custom(error.into())
    }
}

/// A loaded module
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    path: PathBuf,
    exports: Value,
}

impl Module {
    /// Wrap an already evaluated value
    pub fn new(path: impl Into<PathBuf>, exports: Value) -> Self {
        Self {
            path: path.into(),
            exports,
        }
    }

    /// Absolute path the module was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value produced by evaluating the file
    pub fn exports(&self) -> &Value {
        &self.exports
    }

    /// Take the evaluated value
    pub fn into_exports(self) -> Value {
        self.exports
    }
}

/// Turns file contents into a module value.
pub trait Evaluate: Send + Sync {
    fn evaluate(&self, path: &Path, source: &str) -> std::result::Result<Value, LoadError>;
}

impl<F> Evaluate for F
where
    F: Fn(&Path, &str) -> std::result::Result<Value, LoadError> + Send + Sync,
{
    fn evaluate(&self, path: &Path, source: &str) -> std::result::Result<Value, LoadError> {
        self(path, source)
    }
}

/// Built-in module formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Toml,
    Text,
}

impl Format {
    fn parse(self, source: &str) -> std::result::Result<Value, LoadError> {
        match self {
            Format::Json => Ok(serde_json::from_str(source)?),
            Format::Toml => Ok(toml::from_str(source)?),
            Format::Text => Ok(Value::String(source.to_string())),
        }
    }
}

impl Evaluate for Format {
    fn evaluate(&self, _path: &Path, source: &str) -> std::result::Result<Value, LoadError> {
        self.parse(source)
    }
}

/// Extension-keyed evaluator registry
#[derive(Clone)]
pub struct ModuleLoader {
    evaluators: HashMap<String, Arc<dyn Evaluate>>,
}

impl ModuleLoader {
    /// A loader with no evaluators registered
    pub fn empty() -> Self {
        Self {
            evaluators: HashMap::new(),
        }
    }

    /// A loader with the built-in `json`, `toml` and `txt` formats
    pub fn new() -> Self {
        let mut loader = Self::empty();
        loader
            .register("json", Format::Json)
            .register("toml", Format::Toml)
            .register("txt", Format::Text);
        loader
    }

    /// Register (or replace) the evaluator for `extension` (without the dot).
    pub fn register(
        &mut self,
        extension: impl Into<String>,
        evaluator: impl Evaluate + 'static,
    ) -> &mut Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        self.evaluators.insert(extension, Arc::new(evaluator));
        self
    }

    /// Whether an evaluator exists for the file's extension
    pub fn supports(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.evaluators.contains_key(ext))
    }

    /// Registered extensions, sorted
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.evaluators.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Evaluate the file at `path`. Always reads from disk.
    pub fn load(&self, path: &Path) -> Result<Module> {
        if !path.is_file() {
            return Err(RooterError::FileNotFound(path.to_path_buf()));
        }

        let extension = extension_of(path).unwrap_or_default();
        let evaluator = self.evaluators.get(extension).ok_or_else(|| {
            RooterError::module_load(path, LoadError::UnsupportedExtension(extension.to_string()))
        })?;

        let source = fs::read_to_string(path).map_err(|e| RooterError::module_load(path, e))?;
        let exports = evaluator
            .evaluate(path, &source)
            .map_err(|e| RooterError::module_load(path, e))?;

        tracing::debug!(path = %path.display(), "module evaluated");
        Ok(Module::new(path, exports))
    }
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("extensions", &self.extensions())
            .finish()
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
