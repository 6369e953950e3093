//! Filesystem primitives shared by the planner, the executor and features.

use crate::error::{Error, Result};
use log::debug;
use std::collections::VecDeque;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Most symlinks followed while resolving one path.
const MAX_SYMLINK_HOPS: usize = 40;

/// Joins `relative` onto `root`, refusing any result outside `root`.
///
/// Both sides are resolved before comparison: every symlink is followed, even
/// one whose target does not exist yet, and components missing on disk are
/// normalized lexically. The ancestor check compares path components, never
/// string prefixes.
///
/// # Errors
/// * `Error::AbsolutePath` if `relative` is absolute
/// * `Error::PathTraversal` if the joined path resolves outside `root`, or
///   crosses a symlink that cannot be resolved
pub fn safe_join<P: AsRef<Path>, R: AsRef<Path>>(root: P, relative: R) -> Result<PathBuf> {
    let root = root.as_ref();
    let relative = relative.as_ref();
    let traversal = || Error::PathTraversal {
        path: relative.display().to_string(),
        root: root.display().to_string(),
    };

    if relative.is_absolute() || relative.has_root() {
        return Err(Error::AbsolutePath { path: relative.display().to_string() });
    }

    let resolved_root = resolve(root).map_err(Error::IoError)?;
    let combined = resolve(&root.join(relative)).map_err(|e| {
        debug!("Cannot resolve '{}': {e}", relative.display());
        traversal()
    })?;

    if combined != resolved_root && !combined.starts_with(&resolved_root) {
        return Err(traversal());
    }

    Ok(combined)
}

/// Makes `path` absolute and follows every symlink in it, including dangling ones.
///
/// Components that do not exist are kept as they are.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let mut pending: VecDeque<PathBuf> = std::path::absolute(path)?
        .components()
        .map(|component| PathBuf::from(component.as_os_str()))
        .collect();
    let mut resolved = PathBuf::new();
    let mut hops = 0;

    while let Some(part) = pending.pop_front() {
        match part.components().next() {
            Some(Component::Prefix(_) | Component::RootDir) => resolved.push(&part),
            Some(Component::ParentDir) => {
                resolved.pop();
            }
            Some(Component::Normal(name)) => {
                resolved.push(name);
                let is_link = fs::symlink_metadata(&resolved)
                    .is_ok_and(|metadata| metadata.file_type().is_symlink());
                if !is_link {
                    continue;
                }

                hops += 1;
                if hops > MAX_SYMLINK_HOPS {
                    return Err(std::io::Error::other(format!(
                        "too many levels of symbolic links at '{}'",
                        resolved.display()
                    )));
                }
                let target = fs::read_link(&resolved)?;
                resolved.pop();
                for component in target.components().rev() {
                    pending.push_front(PathBuf::from(component.as_os_str()));
                }
            }
            Some(Component::CurDir) | None => {}
        }
    }

    Ok(resolved)
}

/// Writes `content` to `path`, creating parent directories first.
///
/// A symlink at `path` counts as an existing file, dangling or not. When
/// overwriting, the link itself is replaced and its target is left alone.
///
/// # Errors
/// * `Error::DestinationExists` if `path` exists and `overwrite` is false;
///   nothing is written in that case
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
    overwrite: bool,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    if let Ok(metadata) = fs::symlink_metadata(path) {
        if !overwrite {
            return Err(Error::DestinationExists { path: path.display().to_string() });
        }
        if metadata.file_type().is_symlink() {
            debug!("Replacing symlink: {}", path.display());
            fs::remove_file(path).map_err(Error::IoError)?;
        }
    }

    debug!("Writing file: {}", path.display());
    fs::write(path, content).map_err(Error::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_normalizes_missing_components() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        let resolved = resolve(&root.join("missing/./a/../b")).unwrap();
        assert_eq!(resolved, root.join("missing/b"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        fs::create_dir(root.join("real")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let resolved = resolve(&root.join("link/file.txt")).unwrap();
        assert_eq!(resolved, root.join("real/file.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_dangling_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        std::os::unix::fs::symlink("../elsewhere/target.txt", root.join("link")).unwrap();

        let resolved = resolve(&root.join("link")).unwrap();
        assert_eq!(resolved, root.parent().unwrap().join("elsewhere/target.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_loops() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        std::os::unix::fs::symlink(root.join("b"), root.join("a")).unwrap();
        std::os::unix::fs::symlink(root.join("a"), root.join("b")).unwrap();

        assert!(resolve(&root.join("a/file.txt")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_treats_dangling_symlink_as_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.txt");
        let link = temp_dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(matches!(
            write_file(&link, "data", false),
            Err(Error::DestinationExists { .. })
        ));
        assert!(!target.exists());

        write_file(&link, "data", true).unwrap();
        assert!(!target.exists());
        assert!(!fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&link).unwrap(), "data");
    }

    #[test]
    fn test_write_file_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("nested/file.txt");

        write_file(&target, "one", false).unwrap();
        assert!(matches!(
            write_file(&target, "two", false),
            Err(Error::DestinationExists { .. })
        ));
        assert_eq!(fs::read_to_string(&target).unwrap(), "one");

        write_file(&target, "two", true).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "two");
    }
}
