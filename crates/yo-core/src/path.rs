//! Destination resolution.
//!
//! `yo copy data.bin /mnt/scratch/` writes `/mnt/scratch/data.bin`: when the
//! destination argument is an existing directory, the source's base name is
//! appended and the open is retried once.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{CopyError, Result};

/// Final component of `src`, or the whole path when it has none.
pub fn source_basename(src: &Path) -> &OsStr {
    src.file_name().unwrap_or_else(|| src.as_os_str())
}

/// Open the source for reading.
pub fn open_source(src: &Path) -> Result<File> {
    File::open(src).map_err(|source| CopyError::Open {
        path: src.to_path_buf(),
        source,
    })
}

/// Open the destination for writing, creating it if needed.
///
/// Returns the handle and the path that was actually opened. The file is not
/// truncated here; the caller sizes it.
pub fn open_destination(dst: &Path, src: &Path) -> Result<(File, PathBuf)> {
    match open_for_write(dst) {
        Ok(file) => Ok((file, dst.to_path_buf())),
        Err(err) if is_directory_error(&err, dst) => {
            let nested = dst.join(source_basename(src));
            log::debug!(
                "{} is a directory, writing to {}",
                dst.display(),
                nested.display()
            );
            let file = open_for_write(&nested).map_err(|source| CopyError::Open {
                path: nested.clone(),
                source,
            })?;
            Ok((file, nested))
        }
        Err(source) => Err(CopyError::Open {
            path: dst.to_path_buf(),
            source,
        }),
    }
}

fn open_for_write(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

#[cfg_attr(not(windows), allow(unused_variables))]
fn is_directory_error(err: &io::Error, path: &Path) -> bool {
    if err.kind() == io::ErrorKind::IsADirectory {
        return true;
    }
    #[cfg(unix)]
    if err.raw_os_error() == Some(libc::EISDIR) {
        return true;
    }
    #[cfg(windows)]
    if err.kind() == io::ErrorKind::PermissionDenied && path.is_dir() {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_basename_of_nested_path() {
        assert_eq!(source_basename(Path::new("/a/b/file.txt")), "file.txt");
        assert_eq!(source_basename(Path::new("file.txt")), "file.txt");
        assert_eq!(source_basename(Path::new("a/b/")), "b");
    }

    #[test]
    fn test_basename_without_final_component() {
        assert_eq!(source_basename(Path::new("..")), "..");
        assert_eq!(source_basename(Path::new("/")), "/");
    }

    #[test]
    fn test_plain_file_destination() {
        let tmp = tempdir().unwrap();
        let dst = tmp.path().join("out.bin");
        let (_file, resolved) = open_destination(&dst, Path::new("/a/b/in.bin")).unwrap();
        assert_eq!(resolved, dst);
        assert!(dst.is_file());
    }

    #[test]
    fn test_directory_destination_uses_source_name() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let (_file, resolved) = open_destination(&out, Path::new("/a/b/file.txt")).unwrap();
        assert_eq!(resolved, out.join("file.txt"));
        assert!(resolved.is_file());
    }

    #[test]
    fn test_existing_destination_not_truncated_on_open() {
        let tmp = tempdir().unwrap();
        let dst = tmp.path().join("keep.bin");
        fs::write(&dst, b"existing").unwrap();
        let (_file, _) = open_destination(&dst, Path::new("src.bin")).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"existing");
    }

    #[test]
    fn test_missing_parent_reports_open_error() {
        let tmp = tempdir().unwrap();
        let dst = tmp.path().join("no-such-dir").join("out.bin");
        let err = open_destination(&dst, Path::new("src.bin")).unwrap_err();
        assert_eq!(err.operation(), "open");
        assert_eq!(err.path(), Some(dst.as_path()));
    }

    #[test]
    fn test_open_source_missing() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("missing.bin");
        let err = open_source(&src).unwrap_err();
        assert_eq!(err.path(), Some(src.as_path()));
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(io::ErrorKind::NotFound)
        );
    }
}
