//! Error taxonomy for the parallel copy engine.
//!
//! Every failure that can leave a copy is a [`CopyError`] tagged with the
//! operation that failed and, where one exists, the path involved. Raw OS
//! errors are first sorted by [`categorize_io_error`]:
//! - Transient: signal interruption or temporary unavailability, retried in place
//! - Fatal: everything else, surfaced to the caller

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Category of an I/O error for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Retrying the same call immediately is expected to succeed.
    Transient,
    /// Retrying will not help (permissions, missing file, disk full, ...).
    Fatal,
}

/// Categorize an IO error for retry decisions.
pub fn categorize_io_error(err: &io::Error) -> ErrorCategory {
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => ErrorCategory::Transient,
        _ => ErrorCategory::Fatal,
    }
}

/// Any failure of a copy or of building what a copy needs.
#[derive(Debug)]
pub enum CopyError {
    /// A configuration value was rejected.
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
    /// Opening a source or destination failed.
    Open { path: PathBuf, source: io::Error },
    /// Reading the source metadata failed.
    Stat { path: PathBuf, source: io::Error },
    /// Resizing the destination to the source size failed.
    Preallocate {
        path: PathBuf,
        size: u64,
        source: io::Error,
    },
    /// A positioned read from the source failed.
    Read {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },
    /// A positioned write to the destination failed.
    Write {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },
    /// The worker pool could not be built.
    Pool { reason: String },
    /// A unit of work panicked.
    WorkerPanicked { message: String },
    /// A unit of work was dropped before it reported a result.
    WorkerLost,
}

impl CopyError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// True when the error was raised while validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// The path the failing operation was working on, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::Stat { path, .. }
            | Self::Preallocate { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Short name of the failing operation, used in log lines.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "config",
            Self::Open { .. } => "open",
            Self::Stat { .. } => "fstat",
            Self::Preallocate { .. } => "ftruncate",
            Self::Read { .. } => "pread",
            Self::Write { .. } => "pwrite",
            Self::Pool { .. } => "pool",
            Self::WorkerPanicked { .. } | Self::WorkerLost => "worker",
        }
    }

    /// The underlying OS error, when the failure came from a system call.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Open { source, .. }
            | Self::Stat { source, .. }
            | Self::Preallocate { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for {field}: {reason}")
            }
            Self::Open { path, .. } => write!(f, "[open] {}", path.display()),
            Self::Stat { path, .. } => write!(f, "[fstat] {}", path.display()),
            Self::Preallocate { path, size, .. } => {
                write!(f, "[ftruncate] {} to {size} bytes", path.display())
            }
            Self::Read { path, offset, .. } => {
                write!(f, "[pread] {} at offset {offset}", path.display())
            }
            Self::Write { path, offset, .. } => {
                write!(f, "[pwrite] {} at offset {offset}", path.display())
            }
            Self::Pool { reason } => write!(f, "failed to build worker pool: {reason}"),
            Self::WorkerPanicked { message } => write!(f, "copy worker panicked: {message}"),
            Self::WorkerLost => write!(f, "copy worker exited without reporting a result"),
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.io_error()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Result type for copy operations.
pub type Result<T> = std::result::Result<T, CopyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_categorization() {
        let interrupted = io::Error::new(io::ErrorKind::Interrupted, "signal");
        assert_eq!(categorize_io_error(&interrupted), ErrorCategory::Transient);

        let would_block = io::Error::new(io::ErrorKind::WouldBlock, "again");
        assert_eq!(categorize_io_error(&would_block), ErrorCategory::Transient);

        let perm = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(categorize_io_error(&perm), ErrorCategory::Fatal);

        let timeout = io::Error::new(io::ErrorKind::TimedOut, "timeout");
        assert_eq!(categorize_io_error(&timeout), ErrorCategory::Fatal);
    }

    #[test]
    fn test_display_tags_operation_and_path() {
        let err = CopyError::Open {
            path: PathBuf::from("/data/in.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "[open] /data/in.bin");
        assert_eq!(err.operation(), "open");
        assert_eq!(err.path(), Some(Path::new("/data/in.bin")));
        assert!(err.source().is_some());

        let err = CopyError::Write {
            path: PathBuf::from("out.bin"),
            offset: 4096,
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.to_string(), "[pwrite] out.bin at offset 4096");
    }

    #[test]
    fn test_config_error_has_no_path() {
        let err = CopyError::invalid_config("workers", "must be at least 1");
        assert!(err.is_config_error());
        assert!(err.path().is_none());
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "invalid configuration for workers: must be at least 1"
        );
    }
}
