use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use yo_core::logger::{LogLogger, Logger};

/// Drives an indicatif bar from copy events and forwards them to `log`.
pub struct ProgressLogger {
    bar: ProgressBar,
    log: LogLogger,
}

impl ProgressLogger {
    pub fn new(total_bytes: Option<u64>) -> Self {
        let bar = match total_bytes {
            Some(total) => {
                let pb = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::with_template(
                    "{spinner} {msg} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    pb.set_style(style.progress_chars("=> "));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} {bytes}") {
                    pb.set_style(style.tick_strings(&["-", "\\", "|", "/"]));
                }
                pb
            }
        };
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            log: LogLogger,
        }
    }
}

impl Logger for ProgressLogger {
    fn start(&self, src: &Path, dst: &Path) {
        self.bar
            .set_message(format!("Copying {} -> {}", src.display(), dst.display()));
        self.log.start(src, dst);
    }

    fn progress(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn copy_done(&self, src: &Path, dst: &Path, bytes: u64) {
        self.bar.finish_and_clear();
        self.log.copy_done(src, dst, bytes);
    }

    fn error(&self, context: &str, path: &Path, msg: &str) {
        self.bar.abandon();
        self.log.error(context, path, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_copy_events() {
        let logger = ProgressLogger::new(Some(100));
        logger.start(Path::new("in.bin"), Path::new("out/in.bin"));
        assert_eq!(logger.bar.message(), "Copying in.bin -> out/in.bin");

        logger.progress(40);
        logger.progress(60);
        assert_eq!(logger.bar.position(), 100);

        logger.copy_done(Path::new("in.bin"), Path::new("out/in.bin"), 100);
        assert!(logger.bar.is_finished());
    }
}
