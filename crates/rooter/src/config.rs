//! Configuration file parsing (rooter.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::loader::{Format, ModuleLoader};

/// File name looked up by [`find_config`]
pub const CONFIG_FILE: &str = "rooter.toml";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Rooter configuration (rooter.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RooterConfig {
    /// Root directory. Relative values are taken relative to the directory
    /// holding the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Glob matching behaviour
    #[serde(default)]
    pub glob: GlobConfig,

    /// Module evaluation settings
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Directory the config was read from, if any
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Glob matching options, mirroring `glob::MatchOptions`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobConfig {
    pub case_sensitive: bool,
    pub require_literal_separator: bool,
    pub require_literal_leading_dot: bool,
}

impl Default for GlobConfig {
    fn default() -> Self {
        let options = glob::MatchOptions::new();
        Self {
            case_sensitive: options.case_sensitive,
            require_literal_separator: options.require_literal_separator,
            require_literal_leading_dot: options.require_literal_leading_dot,
        }
    }
}

impl From<GlobConfig> for glob::MatchOptions {
    fn from(config: GlobConfig) -> Self {
        glob::MatchOptions {
            case_sensitive: config.case_sensitive,
            require_literal_separator: config.require_literal_separator,
            require_literal_leading_dot: config.require_literal_leading_dot,
        }
    }
}

/// Extra extension-to-format mappings, on top of the built-in ones
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoaderConfig {
    #[serde(default)]
    pub extensions: HashMap<String, Format>,
}

impl LoaderConfig {
    /// Build a loader with the built-in formats plus the configured mappings
    pub fn build(&self) -> ModuleLoader {
        let mut loader = ModuleLoader::new();
        for (extension, format) in &self.extensions {
            loader.register(extension.as_str(), *format);
        }
        loader
    }
}

impl RooterConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: RooterConfig = content.parse()?;
        // A bare file name has an empty parent; anchor it first.
        let path = std::path::absolute(path)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Directory that `root` is relative to, falling back to the current
    /// working directory for configs that were not read from disk
    pub fn root_dir(&self) -> Result<PathBuf, ConfigError> {
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(match &self.root {
            Some(root) => base.join(root),
            None => base,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            if root.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError("root must not be empty".to_string()));
            }
        }

        for extension in self.loader.extensions.keys() {
            if extension.trim_start_matches('.').is_empty() {
                return Err(ConfigError::ValidationError(
                    "loader extension must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Glob options for the finder
    pub fn match_options(&self) -> glob::MatchOptions {
        self.glob.into()
    }
}

impl FromStr for RooterConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: RooterConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// Walk up from `start_dir` looking for a rooter.toml
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}
