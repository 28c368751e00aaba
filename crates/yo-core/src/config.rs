//! Copy settings and the environment loader that produces them.
//!
//! The copy engine only ever sees a [`CopyConfig`] value. Reading
//! `YO_NUM_THREADS` / `YO_BLOCK_SIZE` happens once, in [`CopyConfig::from_env`],
//! which the binary calls at startup.

use std::num::NonZeroUsize;

use crate::errors::{CopyError, Result};

/// Environment variable overriding the default worker count.
pub const ENV_NUM_THREADS: &str = "YO_NUM_THREADS";
/// Environment variable overriding the default block size in bytes.
pub const ENV_BLOCK_SIZE: &str = "YO_BLOCK_SIZE";

/// Default block size (16 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 16 * 1024 * 1024;

/// Worker count and block size for a parallel copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyConfig {
    workers: NonZeroUsize,
    block_size: NonZeroUsize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            block_size: NonZeroUsize::new(DEFAULT_BLOCK_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl CopyConfig {
    /// Build a configuration from explicit values; zero is rejected.
    pub fn new(workers: usize, block_size: usize) -> Result<Self> {
        Ok(Self {
            workers: non_zero("workers", workers)?,
            block_size: non_zero("block_size", block_size)?,
        })
    }

    /// Load defaults, honoring `YO_NUM_THREADS` and `YO_BLOCK_SIZE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same rules as [`CopyConfig::from_env`], against an arbitrary lookup.
    ///
    /// Values that are missing, malformed or zero fall back to the built-in
    /// default without surfacing an error.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(workers) = parse_override(&lookup, ENV_NUM_THREADS) {
            config.workers = workers;
        }
        if let Some(block_size) = parse_override(&lookup, ENV_BLOCK_SIZE) {
            config.block_size = block_size;
        }
        config
    }

    /// Overwrite the worker count.
    pub fn set_concurrency(&mut self, workers: usize) -> Result<()> {
        self.workers = non_zero("workers", workers)?;
        Ok(())
    }

    /// Overwrite the block size.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        self.block_size = non_zero("block_size", block_size)?;
        Ok(())
    }

    pub fn concurrency(&self) -> usize {
        self.workers.get()
    }

    pub fn block_size(&self) -> usize {
        self.block_size.get()
    }

    pub(crate) fn workers(&self) -> NonZeroUsize {
        self.workers
    }
}

fn default_workers() -> NonZeroUsize {
    let hardware = num_cpus::get().max(1);
    NonZeroUsize::new(hardware.saturating_mul(2)).unwrap_or(NonZeroUsize::MIN)
}

fn non_zero(field: &'static str, value: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(value).ok_or_else(|| CopyError::invalid_config(field, "must be at least 1"))
}

fn parse_override<F>(lookup: &F, key: &str) -> Option<NonZeroUsize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<NonZeroUsize>() {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!("ignoring {key}={raw:?}: {err}");
            None
        }
    }
}
