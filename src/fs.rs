//! Filesystem primitives.
//!
//! Thin wrappers over `std::fs` that check what kind of thing sits at a path
//! before acting on it. Nothing here ever deletes a directory that the caller
//! did not ask to move.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, TransposeError};

const BACKUP_SUFFIX: &str = ".backup";

/// Move a file or directory tree from `source` to `destination`.
///
/// Uses a plain rename when possible. When the rename crosses a filesystem
/// boundary the tree is copied (symlinks inside it are recreated, not
/// followed) and the source is deleted afterwards. The parent of
/// `destination` must already exist.
pub fn move_path(source: &Path, destination: &Path) -> Result<()> {
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        "moving path"
    );

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            debug!(source = %source.display(), "rename crossed devices, copying instead");
            copy_tree(source, destination).map_err(|err| move_error(source, destination, err))?;
            delete_tree(source).map_err(|err| TransposeError::io("remove", source, err))
        }
        Err(err) => Err(move_error(source, destination, err)),
    }
}

/// Remove `path` if it is a regular file or a symlink.
///
/// Directories and missing paths are left alone and reported as success.
pub fn remove(path: &Path) -> Result<()> {
    let Ok(metadata) = path.symlink_metadata() else {
        return Ok(());
    };

    let file_type = metadata.file_type();
    if !file_type.is_symlink() && !file_type.is_file() {
        debug!(path = %path.display(), "refusing to remove non-file, non-symlink path");
        return Ok(());
    }

    debug!(path = %path.display(), "removing path");

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileTypeExt;
        if file_type.is_symlink_dir() {
            return fs::remove_dir(path).map_err(|err| TransposeError::io("remove", path, err));
        }
    }

    fs::remove_file(path).map_err(|err| TransposeError::io("remove", path, err))
}

/// Create `link` as a symlink to the absolute, resolved form of `target`.
pub fn symlink(target: &Path, link: &Path) -> Result<()> {
    let resolved = fs::canonicalize(target)
        .or_else(|_| std::path::absolute(target))
        .map_err(|err| TransposeError::io("resolve", target, err))?;

    debug!(
        link = %link.display(),
        target = %resolved.display(),
        "creating symlink"
    );

    create_link(&resolved, link).map_err(|err| TransposeError::Io {
        context: format!(
            "Failed to symlink '{}' -> '{}'",
            link.display(),
            resolved.display()
        ),
        err,
    })
}

/// Check that `path` is an existing directory whose symlink-ness matches
/// `is_symlink` exactly.
pub fn check_path(path: &Path, is_symlink: bool) -> bool {
    if path.is_symlink() != is_symlink {
        return false;
    }

    path.is_dir()
}

/// Whether anything at all sits at `path`, dangling symlinks included.
pub fn exists_or_dangling(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// `<path>.backup`, with the suffix appended to the full file name.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn move_error(source: &Path, destination: &Path, err: io::Error) -> TransposeError {
    TransposeError::Io {
        context: format!(
            "Failed to move '{}' to '{}'",
            source.display(),
            destination.display()
        ),
        err,
    }
}

fn copy_tree(source: &Path, destination: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source)
        .follow_links(false)
        .follow_root_links(false)
    {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = if relative.as_os_str().is_empty() {
            destination.to_path_buf()
        } else {
            destination.join(relative)
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            create_link(&fs::read_link(entry.path())?, &target)?;
        } else if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

fn delete_tree(path: &Path) -> io::Result<()> {
    if path.is_dir() && !path.is_symlink() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = match link.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target.to_path_buf(),
    };

    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_path_keeps_contents() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::write(source.join("nested/file.txt"), "hello").unwrap();

        let destination = temp.path().join("destination");
        move_path(&source, &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(
            fs::read_to_string(destination.join("nested/file.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_move_path_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = move_path(&temp.path().join("missing"), &temp.path().join("dest")).unwrap_err();
        assert!(matches!(err, TransposeError::Io { .. }));
        assert!(err.to_string().contains("Failed to move"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_copy_tree_recreates_symlinks() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("real.txt"), "data").unwrap();
        create_link(Path::new("real.txt"), &source.join("alias.txt")).unwrap();

        let destination = temp.path().join("copy");
        copy_tree(&source, &destination).unwrap();
        delete_tree(&source).unwrap();

        assert!(!source.exists());
        assert!(destination.join("alias.txt").is_symlink());
        assert_eq!(
            fs::read_link(destination.join("alias.txt")).unwrap(),
            PathBuf::from("real.txt")
        );
        assert_eq!(fs::read_to_string(destination.join("real.txt")).unwrap(), "data");
    }

    #[test]
    fn test_copy_tree_keeps_root_symlink() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("inner.txt"), "inner").unwrap();
        let source = temp.path().join("source");
        create_link(&real, &source).unwrap();

        let destination = temp.path().join("copy");
        copy_tree(&source, &destination).unwrap();
        delete_tree(&source).unwrap();

        assert!(destination.is_symlink());
        assert_eq!(fs::read_link(&destination).unwrap(), real);
        assert!(!exists_or_dangling(&source));
        assert!(real.join("inner.txt").is_file());
    }

    #[test]
    fn test_remove_file_and_symlink() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        let link = temp.path().join("link");
        symlink(&dir, &link).unwrap();

        remove(&file).unwrap();
        remove(&link).unwrap();

        assert!(!file.exists());
        assert!(!exists_or_dangling(&link));
        // The symlink target must survive.
        assert!(dir.is_dir());
    }

    #[test]
    fn test_remove_ignores_directories_and_missing_paths() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "keep").unwrap();

        remove(&dir).unwrap();
        remove(&temp.path().join("missing")).unwrap();

        assert!(dir.join("keep.txt").exists());
    }

    #[test]
    fn test_remove_dangling_symlink() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        symlink(&temp.path().join("nowhere"), &link).unwrap();
        assert!(!link.exists());
        assert!(exists_or_dangling(&link));

        remove(&link).unwrap();

        assert!(!exists_or_dangling(&link));
    }

    #[test]
    fn test_symlink_points_to_absolute_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp.path().join("link");

        symlink(&target, &link).unwrap();

        let pointed = fs::read_link(&link).unwrap();
        assert!(pointed.is_absolute());
        assert_eq!(pointed, fs::canonicalize(&target).unwrap());
    }

    #[test]
    fn test_symlink_existing_link_fails() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp.path().join("link");
        fs::create_dir(&link).unwrap();

        let err = symlink(&target, &link).unwrap_err();
        assert!(err.to_string().contains("Failed to symlink"));
    }

    #[test]
    fn test_check_path() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let link = temp.path().join("link");
        symlink(&dir, &link).unwrap();

        assert!(check_path(&dir, false));
        assert!(!check_path(&dir, true));
        assert!(check_path(&link, true));
        assert!(!check_path(&link, false));
        assert!(!check_path(&file, false));
        assert!(!check_path(&temp.path().join("missing"), false));
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/home/u/docs")),
            PathBuf::from("/home/u/docs.backup")
        );
        assert_eq!(
            backup_path(Path::new("/home/u/notes.txt")),
            PathBuf::from("/home/u/notes.txt.backup")
        );
    }
}
