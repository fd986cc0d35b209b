//! Module cache
//!
//! Loaded modules memoized by absolute path. Entries are never revalidated
//! against the filesystem; a fresh load (see [`ModuleCache::refresh`])
//! replaces an entry explicitly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::Result;
use crate::loader::{Module, ModuleLoader};

static GLOBAL: Lazy<Arc<ModuleCache>> = Lazy::new(|| Arc::new(ModuleCache::new()));

#[derive(Debug, Default)]
struct Inner {
    modules: HashMap<PathBuf, Arc<Module>>,
    hits: usize,
    misses: usize,
}

/// Path-keyed cache of loaded modules
#[derive(Debug, Default)]
pub struct ModuleCache {
    inner: RwLock<Inner>,
}

impl ModuleCache {
    /// Create a new empty module cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by every `Rooter` that was not given
    /// its own
    pub fn global() -> Arc<ModuleCache> {
        Arc::clone(&GLOBAL)
    }

    /// Return the cached module for `path`, loading and storing it on a miss.
    ///
    /// A failed load leaves the cache untouched.
    pub fn get_or_load(&self, path: &Path, loader: &ModuleLoader) -> Result<Arc<Module>> {
        {
            let mut inner = self.inner.write();
            if let Some(module) = inner.modules.get(path).cloned() {
                inner.hits += 1;
                tracing::debug!(path = %path.display(), "module cache hit");
                return Ok(module);
            }
            inner.misses += 1;
        }

        tracing::debug!(path = %path.display(), "module cache miss");
        let module = Arc::new(loader.load(path)?);

        // Another caller may have loaded the same path meanwhile; the first
        // stored entry wins so every caller sees one identity.
        let mut inner = self.inner.write();
        let entry = inner
            .modules
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::clone(&module));
        Ok(Arc::clone(entry))
    }

    /// Load `path` from disk regardless of the cache and store the result,
    /// replacing any previous entry.
    pub fn refresh(&self, path: &Path, loader: &ModuleLoader) -> Result<Arc<Module>> {
        let module = Arc::new(loader.load(path)?);
        let previous = self
            .inner
            .write()
            .modules
            .insert(path.to_path_buf(), Arc::clone(&module));

        tracing::debug!(
            path = %path.display(),
            replaced = previous.is_some(),
            "module cache refreshed"
        );
        Ok(module)
    }

    /// Get a module from the cache without loading
    pub fn get(&self, path: &Path) -> Option<Arc<Module>> {
        self.inner.read().modules.get(path).cloned()
    }

    /// Remove a module from the cache
    pub fn invalidate(&self, path: &Path) -> Option<Arc<Module>> {
        self.inner.write().modules.remove(path)
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.modules.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    /// Check if a path is in the cache
    pub fn contains(&self, path: &Path) -> bool {
        self.inner.read().modules.contains_key(path)
    }

    /// Get the number of cached modules
    pub fn len(&self) -> usize {
        self.inner.read().modules.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().modules.is_empty()
    }

    /// Get all cached module paths, sorted
    pub fn cached_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.inner.read().modules.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats {
            entries: inner.modules.len(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached entries
    pub entries: usize,
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl CacheStats {
    /// Get cache hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
