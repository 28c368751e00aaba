//! Copy lifecycle hooks.
//!
//! `progress` is called from worker threads, so implementations must be
//! cheap and thread-safe.

use std::path::Path;

pub trait Logger: Send + Sync {
    /// A copy is about to start writing `dst`.
    fn start(&self, src: &Path, dst: &Path);

    /// `bytes` more bytes have reached the destination.
    fn progress(&self, _bytes: u64) {}

    fn copy_done(&self, src: &Path, dst: &Path, bytes: u64);

    fn error(&self, context: &str, path: &Path, msg: &str);
}

pub struct NoopLogger;

impl Logger for NoopLogger {
    fn start(&self, _src: &Path, _dst: &Path) {}

    fn copy_done(&self, _src: &Path, _dst: &Path, _bytes: u64) {}

    fn error(&self, _context: &str, _path: &Path, _msg: &str) {}
}

/// Forwards events to the `log` facade.
pub struct LogLogger;

impl Logger for LogLogger {
    fn start(&self, src: &Path, dst: &Path) {
        log::debug!("copy {} -> {}", src.display(), dst.display());
    }

    fn copy_done(&self, src: &Path, dst: &Path, bytes: u64) {
        log::info!(
            "copied {} -> {} ({} bytes)",
            src.display(),
            dst.display(),
            bytes
        );
    }

    fn error(&self, context: &str, path: &Path, msg: &str) {
        log::warn!("{context} failed for {}: {msg}", path.display());
    }
}
