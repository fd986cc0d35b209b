//! Glob discovery under a root directory.
//!
//! Pattern syntax and directory traversal order belong to the `glob` crate.
//! This module only anchors patterns at the root and stitches the per-pattern
//! results together.

use std::collections::HashSet;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use glob::MatchOptions;

use crate::error::{Result, RooterError};
use crate::path;
use crate::pattern::Pattern;

/// Expand `patterns` under `root`.
///
/// Results keep the matcher's order within each pattern and the caller's
/// order across patterns. A path matched by more than one pattern is
/// reported once, at its first position.
pub fn find(root: &Path, patterns: &Pattern, options: MatchOptions) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for raw in patterns.flatten() {
        let anchored = anchor(root, raw)?;
        let mut count = 0usize;

        for entry in glob::glob_with(&anchored, options)? {
            match entry {
                Ok(found) => {
                    if seen.insert(found.clone()) {
                        matches.push(found);
                        count += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(pattern = %anchored, error = %e, "skipping unreadable glob entry");
                }
            }
        }

        tracing::debug!(pattern = %anchored, count, "glob expanded");
    }

    Ok(matches)
}

/// Resolve a pattern against the root and escape the leading components it
/// shares with the root, so that glob metacharacters in the root directory
/// (or in an ancestor a `..` pattern climbs into) match literally.
fn anchor(root: &Path, raw: &str) -> Result<String> {
    let resolved = path::resolve(root, [raw])?;

    let shared: PathBuf = resolved
        .components()
        .zip(root.components())
        .take_while(|(ours, theirs)| ours == theirs)
        .map(|(component, _)| component)
        .collect();
    let rest = resolved.strip_prefix(&shared).unwrap_or(resolved.as_path());

    let prefix = glob::Pattern::escape(utf8(&shared)?);
    let rest = utf8(rest)?;
    Ok(match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => prefix,
        (false, false) if prefix.ends_with(MAIN_SEPARATOR) => format!("{}{}", prefix, rest),
        (false, false) => format!("{}{}{}", prefix, MAIN_SEPARATOR, rest),
    })
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        RooterError::InvalidArgument(format!("pattern path {:?} is not valid UTF-8", path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            let file = dir.join(name);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(file, "{}").unwrap();
        }
    }

    #[test]
    fn test_anchor_escapes_root() {
        let anchored = anchor(Path::new("/srv/[app]"), "*.json").unwrap();
        assert_eq!(anchored, "/srv/[[]app[]]/*.json");
    }

    #[test]
    fn test_anchor_outside_root_escapes_shared_ancestors() {
        let anchored = anchor(Path::new("/srv/app"), "../shared/*.json").unwrap();
        assert_eq!(anchored, "/srv/shared/*.json");

        let anchored = anchor(Path::new("/srv/[x]/app"), "../*.json").unwrap();
        assert_eq!(anchored, "/srv/[[]x[]]/*.json");
    }

    #[test]
    fn test_find_above_root_with_metacharacters() {
        let temp = tempfile::tempdir().unwrap();
        let base = path::absolute_root(temp.path()).unwrap();
        let root = base.join("[x]").join("root");
        fs::create_dir_all(&root).unwrap();
        touch(&base.join("[x]"), &["a.json"]);

        let found = find(&root, &"../*.json".into(), MatchOptions::new()).unwrap();
        assert_eq!(found, vec![base.join("[x]").join("a.json")]);
    }

    #[test]
    fn test_find_matches_extension() {
        let temp = tempfile::tempdir().unwrap();
        let root = path::absolute_root(temp.path()).unwrap();
        touch(&root, &["a.js", "b.js", "c.txt"]);

        let found = find(&root, &"*.js".into(), MatchOptions::new()).unwrap();
        assert_eq!(found, vec![root.join("a.js"), root.join("b.js")]);
    }

    #[test]
    fn test_find_concatenates_without_resorting() {
        let temp = tempfile::tempdir().unwrap();
        let root = path::absolute_root(temp.path()).unwrap();
        touch(&root, &["a.toml", "b.json", "z.json"]);

        let found = find(&root, &["*.json", "*.toml"].into(), MatchOptions::new()).unwrap();
        assert_eq!(
            found,
            vec![root.join("b.json"), root.join("z.json"), root.join("a.toml")]
        );
    }

    #[test]
    fn test_find_deduplicates() {
        let temp = tempfile::tempdir().unwrap();
        let root = path::absolute_root(temp.path()).unwrap();
        touch(&root, &["a.json", "b.json"]);

        let found = find(&root, &["b.json", "*.json"].into(), MatchOptions::new()).unwrap();
        assert_eq!(found, vec![root.join("b.json"), root.join("a.json")]);
    }

    #[test]
    fn test_find_missing_directory_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let root = path::absolute_root(temp.path()).unwrap();

        let found = find(&root, &"nowhere/**/*.json".into(), MatchOptions::new()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_invalid_pattern() {
        let temp = tempfile::tempdir().unwrap();
        let root = path::absolute_root(temp.path()).unwrap();

        let result = find(&root, &"[".into(), MatchOptions::new());
        assert!(matches!(result, Err(RooterError::Pattern(_))));
    }
}
