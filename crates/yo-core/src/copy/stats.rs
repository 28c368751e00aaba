use std::path::PathBuf;
use std::time::Duration;

use super::partition::WorkRange;

/// What a successful copy did.
#[derive(Debug, Clone)]
pub struct CopyOutcome {
    /// Path that was written, after directory resolution.
    pub destination: PathBuf,
    pub bytes_copied: u64,
    /// Ranges handed to workers, in submission order.
    pub ranges: Vec<WorkRange>,
    pub units_submitted: usize,
    pub elapsed: Duration,
}

impl CopyOutcome {
    pub fn throughput_bytes_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.bytes_copied as f64 / secs
    }
}
