use clap::{ArgAction, Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yo")]
#[command(about = "Parallel I/O utilities: copy a file with many concurrent workers")]
#[command(
    after_help = "Defaults can be set with YO_NUM_THREADS and YO_BLOCK_SIZE; flags take precedence."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy a file using parallel positioned reads and writes
    Copy(CopyArgs),
    /// Print the version
    Version,
}

#[derive(Args, Clone, Debug)]
pub struct CopyArgs {
    /// File to copy
    pub source: PathBuf,
    /// Destination file, or an existing directory to copy into
    pub destination: PathBuf,
    /// Number of concurrent workers (default: YO_NUM_THREADS or 2x CPUs)
    #[arg(long, short = 'j', value_name = "N")]
    pub workers: Option<NonZeroUsize>,
    /// Bytes per read/write step, e.g. 4096, 512K, 16M (default: YO_BLOCK_SIZE or 16M)
    #[arg(long, short = 'b', value_name = "SIZE", value_parser = parse_size)]
    pub block_size: Option<NonZeroUsize>,
    /// Show a progress bar
    #[arg(long, short = 'p')]
    pub progress: bool,
}

/// Parse a byte count with an optional binary suffix (K, M, G, optionally
/// followed by `iB` or `B`).
pub fn parse_size(raw: &str) -> Result<NonZeroUsize, String> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(format!("invalid size '{raw}': expected a number"));
    }
    let value: usize = digits
        .parse()
        .map_err(|err| format!("invalid size '{raw}': {err}"))?;
    let shift = match suffix.to_ascii_lowercase().as_str() {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 10,
        "m" | "mb" | "mib" => 20,
        "g" | "gb" | "gib" => 30,
        other => return Err(format!("invalid size '{raw}': unknown unit '{other}'")),
    };
    let bytes = value
        .checked_mul(1usize << shift)
        .ok_or_else(|| format!("invalid size '{raw}': too large"))?;
    NonZeroUsize::new(bytes).ok_or_else(|| format!("invalid size '{raw}': must be at least 1"))
}
