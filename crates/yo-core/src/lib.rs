//! Parallel chunked single-file copy.
//!
//! A file is split into one contiguous byte range per worker and every range
//! is copied with positioned reads and writes against shared handles.
//!
//! ```no_run
//! use std::path::Path;
//! use yo_core::{copy, CopyConfig};
//!
//! # fn main() -> yo_core::Result<()> {
//! let config = CopyConfig::from_env();
//! let outcome = copy(&config, Path::new("big.img"), Path::new("/mnt/backup/"))?;
//! println!("wrote {} bytes to {}", outcome.bytes_copied, outcome.destination.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod copy;
pub mod errors;
pub mod logger;
pub mod path;
pub mod pool;
pub mod version;

pub use config::CopyConfig;
pub use copy::{copy, Copier, CopyOutcome, WorkRange};
pub use errors::{CopyError, Result};
pub use version::version;
