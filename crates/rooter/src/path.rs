//! Root-relative path resolution
//!
//! Joins a root directory with caller-supplied fragments. Resolution is
//! lexical: nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, RooterError};

/// Turn a caller-supplied root into an absolute, normalized directory path.
///
/// Relative roots are anchored at the current working directory.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(root).map_err(|e| {
        RooterError::InvalidArgument(format!("root {:?} cannot be made absolute: {}", root, e))
    })?;
    Ok(normalize(&absolute))
}

/// Resolve `fragments` against `root`.
///
/// Fragments are joined in order. Leading separators are stripped, so
/// `"/lib"` and `"lib"` name the same child of the root. A first fragment
/// that is already an absolute path under `root` is kept as-is, which makes
/// resolving a previously resolved path a no-op.
pub fn resolve<I, S>(root: &Path, fragments: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = root.to_path_buf();

    for (index, fragment) in fragments.into_iter().enumerate() {
        let fragment = fragment.as_ref();
        if fragment.contains('\0') {
            return Err(RooterError::InvalidArgument(format!(
                "path fragment {:?} contains a NUL byte",
                fragment
            )));
        }

        if index == 0 {
            let candidate = Path::new(fragment);
            if candidate.is_absolute() && normalize(candidate).starts_with(root) {
                joined = candidate.to_path_buf();
                continue;
            }
        }

        joined.push(fragment.trim_start_matches(std::path::is_separator));
    }

    Ok(normalize(&joined))
}

/// Lexically normalize a path: drop `.` and let `..` cancel the previous
/// normal component. `..` never climbs above the filesystem root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Express `path` relative to `root`.
pub fn relative(root: &Path, path: &Path) -> Result<PathBuf> {
    normalize(path)
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| {
            RooterError::InvalidArgument(format!(
                "{} is not within root {}",
                path.display(),
                root.display()
            ))
        })
}
