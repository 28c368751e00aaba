use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::chunk::{copy_chunk, ChunkError, ChunkOp};
use super::partition::{partition, WorkRange};
use super::stats::CopyOutcome;
use crate::config::CopyConfig;
use crate::errors::{CopyError, Result};
use crate::logger::{Logger, NoopLogger};
use crate::path::{open_destination, open_source};
use crate::pool::{RayonPool, TaskHandle, WorkerPool};

/// Copy `src` to `dst` on a fresh pool of `config.concurrency()` threads.
pub fn copy(config: &CopyConfig, src: &Path, dst: &Path) -> Result<CopyOutcome> {
    let pool = RayonPool::new(config.concurrency())?;
    Copier::new(pool).copy_file(config, src, dst)
}

/// Parallel single-file copier bound to a worker pool.
pub struct Copier {
    pool: Box<dyn WorkerPool>,
    logger: Arc<dyn Logger>,
}

impl Copier {
    pub fn new<P: WorkerPool + 'static>(pool: P) -> Self {
        Self {
            pool: Box::new(pool),
            logger: Arc::new(NoopLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Copy `src` to `dst`, or into `dst/<name of src>` when `dst` is a
    /// directory.
    ///
    /// The destination is resized to the source length, split into one range
    /// per configured worker, and every range is copied by its own unit of
    /// work. All submitted units are waited for; the first failure in
    /// submission order is returned. A failed copy leaves the destination at
    /// full length with whatever the workers managed to write.
    pub fn copy_file(&self, config: &CopyConfig, src: &Path, dst: &Path) -> Result<CopyOutcome> {
        let result = self.run(config, src, dst);
        if let Err(err) = &result {
            let msg = match err.io_error() {
                Some(io) => format!("{err}: {io}"),
                None => err.to_string(),
            };
            self.logger
                .error(err.operation(), err.path().unwrap_or(src), &msg);
        }
        result
    }

    fn run(&self, config: &CopyConfig, src: &Path, dst: &Path) -> Result<CopyOutcome> {
        let started = Instant::now();

        let src_file = open_source(src)?;
        let (dst_file, destination) = open_destination(dst, src)?;
        self.logger.start(src, &destination);

        let size = src_file
            .metadata()
            .map_err(|source| CopyError::Stat {
                path: src.to_path_buf(),
                source,
            })?
            .len();
        dst_file
            .set_len(size)
            .map_err(|source| CopyError::Preallocate {
                path: destination.clone(),
                size,
                source,
            })?;

        let ranges = partition(size, config.workers());
        log::debug!(
            "copying {} bytes from {} in {} ranges (block size {})",
            size,
            src.display(),
            ranges.len(),
            config.block_size()
        );

        let job = Arc::new(SharedJob {
            src: src_file,
            dst: dst_file,
            src_path: src.into(),
            dst_path: destination.as_path().into(),
            block_size: config.block_size(),
            logger: Arc::clone(&self.logger),
        });
        let handles: Vec<TaskHandle> = ranges
            .iter()
            .map(|&range| {
                let job = Arc::clone(&job);
                self.pool.submit(Box::new(move || job.copy_range(range)))
            })
            .collect();
        // Workers hold the remaining references; the files close once the
        // last of them finishes.
        drop(job);

        let units_submitted = handles.len();
        let mut bytes_copied = 0u64;
        let mut first_error = None;
        for handle in handles {
            match handle.wait() {
                Ok(bytes) => bytes_copied += bytes,
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => log::debug!("additional worker failure: {err}"),
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }

        self.logger.copy_done(src, &destination, bytes_copied);
        Ok(CopyOutcome {
            destination,
            bytes_copied,
            ranges,
            units_submitted,
            elapsed: started.elapsed(),
        })
    }
}

/// State every range copy of one job reads from.
struct SharedJob {
    src: File,
    dst: File,
    src_path: Box<Path>,
    dst_path: Box<Path>,
    block_size: usize,
    logger: Arc<dyn Logger>,
}

impl SharedJob {
    /// Consumes this worker's reference so the handles can close as soon as
    /// the range is done, before the result is reported.
    fn copy_range(self: Arc<Self>, range: WorkRange) -> Result<u64> {
        log::trace!("range {}..{} start", range.offset, range.end());
        let result = copy_chunk(&self.src, &self.dst, range, self.block_size, |bytes| {
            self.logger.progress(bytes)
        });
        match result {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(self.chunk_error(err)),
        }
    }

    fn chunk_error(&self, err: ChunkError) -> CopyError {
        let ChunkError { op, offset, source } = err;
        match op {
            ChunkOp::Read => CopyError::Read {
                path: self.src_path.to_path_buf(),
                offset,
                source,
            },
            ChunkOp::Write => CopyError::Write {
                path: self.dst_path.to_path_buf(),
                offset,
                source,
            },
        }
    }
}
