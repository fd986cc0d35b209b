//! Rooter
//!
//! Root-anchored file helpers:
//! - Path resolution against a fixed root directory
//! - Glob discovery of files under the root
//! - Module loading, cached by absolute path or fresh from disk
//! - Find-and-load of every file a set of patterns matches
//!
//! ```no_run
//! use rooter::Rooter;
//!
//! let rooter = Rooter::new("config").unwrap();
//! let defaults = rooter.require(["defaults.toml"]).unwrap();
//! let overlays = rooter.find_and_execute(["overlays/*.json", "local/*.json"]).unwrap();
//! # let _ = (defaults, overlays);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod loader;
pub mod path;
pub mod pattern;
mod rooter;

pub use cache::{CacheStats, ModuleCache};
pub use config::{find_config, ConfigError, GlobConfig, LoaderConfig, RooterConfig, CONFIG_FILE};
pub use error::{Result, RooterError};
pub use loader::{Evaluate, Format, LoadError, Module, ModuleLoader};
pub use pattern::Pattern;
pub use rooter::Rooter;
