//! The root-anchored facade over path resolution, discovery and loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::MatchOptions;

use crate::cache::ModuleCache;
use crate::config::RooterConfig;
use crate::error::Result;
use crate::finder;
use crate::loader::{Module, ModuleLoader};
use crate::path;
use crate::pattern::Pattern;

/// Resolves, finds and loads files relative to a fixed root directory.
///
/// Cached loads go through a [`ModuleCache`]: the process-wide one unless
/// [`Rooter::with_cache`] supplied another.
#[derive(Debug, Clone)]
pub struct Rooter {
    root: PathBuf,
    options: MatchOptions,
    loader: Arc<ModuleLoader>,
    cache: Arc<ModuleCache>,
}

impl Rooter {
    /// Create a rooter for `root`. Relative roots are anchored at the
    /// current working directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            root: path::absolute_root(root.as_ref())?,
            options: MatchOptions::new(),
            loader: Arc::new(ModuleLoader::new()),
            cache: ModuleCache::global(),
        })
    }

    /// Create a rooter from a parsed rooter.toml
    pub fn from_config(config: &RooterConfig) -> Result<Self> {
        let root = config.root_dir()?;
        Ok(Self::new(root)?
            .with_match_options(config.match_options())
            .with_loader(config.loader.build()))
    }

    /// Use `cache` for cached loads instead of the process-wide one
    pub fn with_cache(mut self, cache: Arc<ModuleCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the evaluator registry
    pub fn with_loader(mut self, loader: ModuleLoader) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Set the glob options used by `find`
    pub fn with_match_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// The absolute root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The cache backing `require`
    pub fn cache(&self) -> &Arc<ModuleCache> {
        &self.cache
    }

    /// The evaluator registry
    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    /// Join the root with `fragments` into an absolute path.
    pub fn resolve<I, S>(&self, fragments: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        path::resolve(&self.root, fragments)
    }

    /// Express an absolute path relative to the root.
    pub fn relative(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        path::relative(&self.root, path.as_ref())
    }

    /// Expand glob patterns under the root.
    pub fn find(&self, patterns: impl Into<Pattern>) -> Result<Vec<PathBuf>> {
        finder::find(&self.root, &patterns.into(), self.options)
    }

    /// Load the module at `fragments`, reusing a cached result if present.
    pub fn require<I, S>(&self, fragments: I) -> Result<Arc<Module>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.resolve(fragments)?;
        self.cache.get_or_load(&path, &self.loader)
    }

    /// Load the module at `fragments` fresh from disk. The cache entry is
    /// replaced with the new result.
    pub fn execute<I, S>(&self, fragments: I) -> Result<Arc<Module>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.resolve(fragments)?;
        self.cache.refresh(&path, &self.loader)
    }

    /// [`find`](Self::find), then [`require`](Self::require) every match in
    /// order. The first failure aborts with no partial result.
    pub fn find_and_require(&self, patterns: impl Into<Pattern>) -> Result<Vec<Arc<Module>>> {
        self.find(patterns)?
            .iter()
            .map(|path| self.cache.get_or_load(path, &self.loader))
            .collect()
    }

    /// [`find`](Self::find), then [`execute`](Self::execute) every match in
    /// order. The first failure aborts with no partial result.
    pub fn find_and_execute(&self, patterns: impl Into<Pattern>) -> Result<Vec<Arc<Module>>> {
        self.find(patterns)?
            .iter()
            .map(|path| self.cache.refresh(path, &self.loader))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_makes_root_absolute() {
        let rooter = Rooter::new("some/relative/../dir").unwrap();
        assert!(rooter.root().is_absolute());
        assert!(rooter.root().ends_with("some/dir"));
    }

    #[test]
    fn test_default_cache_is_global() {
        let rooter = Rooter::new("/tmp").unwrap();
        assert!(Arc::ptr_eq(rooter.cache(), &ModuleCache::global()));
    }

    #[test]
    fn test_from_config_applies_settings() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("mods")).unwrap();
        fs::write(temp.path().join("mods").join("A.JS"), "1").unwrap();
        let config_path = temp.path().join("rooter.toml");
        fs::write(
            &config_path,
            "root = \"mods\"\n[glob]\ncase_sensitive = false\n[loader.extensions]\nJS = \"json\"\n",
        )
        .unwrap();

        let config = RooterConfig::from_file(&config_path).unwrap();
        let rooter = Rooter::from_config(&config)
            .unwrap()
            .with_cache(Arc::new(ModuleCache::new()));

        assert_eq!(rooter.root(), path::normalize(&temp.path().join("mods")).as_path());
        let modules = rooter.find_and_require("*.js").unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].exports(), &serde_json::json!(1));
    }
}
