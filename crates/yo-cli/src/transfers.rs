use crate::cli::CopyArgs;
use crate::progress::ProgressLogger;
use eyre::{Context, Result};
use std::sync::Arc;
use yo_core::logger::{LogLogger, Logger};
use yo_core::pool::RayonPool;
use yo_core::{Copier, CopyConfig};

/// Environment defaults first, then command-line overrides.
pub fn build_config(args: &CopyArgs) -> Result<CopyConfig> {
    let mut config = CopyConfig::from_env();
    if let Some(workers) = args.workers {
        config.set_concurrency(workers.get())?;
    }
    if let Some(block_size) = args.block_size {
        config.set_block_size(block_size.get())?;
    }
    Ok(config)
}

pub fn run_copy(args: &CopyArgs) -> Result<()> {
    let config = build_config(args)?;
    log::debug!(
        "workers={} block_size={}",
        config.concurrency(),
        config.block_size()
    );

    let logger: Arc<dyn Logger> = if args.progress {
        let total = std::fs::metadata(&args.source).ok().map(|md| md.len());
        Arc::new(ProgressLogger::new(total))
    } else {
        Arc::new(LogLogger)
    };

    let pool = RayonPool::new(config.concurrency())?;
    let outcome = Copier::new(pool)
        .with_logger(logger)
        .copy_file(&config, &args.source, &args.destination)
        .wrap_err_with(|| {
            format!(
                "failed to copy {} to {}",
                args.source.display(),
                args.destination.display()
            )
        })?;

    println!(
        "Copied {} to {} in {:.2?} ({}/s, {} workers, {} blocks)",
        format_bytes(outcome.bytes_copied),
        outcome.destination.display(),
        outcome.elapsed,
        format_bytes(outcome.throughput_bytes_per_sec() as u64),
        outcome.units_submitted,
        format_bytes(config.block_size() as u64),
    );
    Ok(())
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes == 0 {
        return "0 B".to_owned();
    }
    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
