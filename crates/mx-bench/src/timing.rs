use std::time::{Duration, Instant};

use tracing::info;

/// Measures wall-clock time of a named operation.
///
/// ```
/// use mx_bench::timing::Stopwatch;
///
/// let sw = Stopwatch::start("noop");
/// let elapsed = sw.finish();
/// assert!(elapsed.as_secs() < 1);
/// ```
#[derive(Debug)]
pub struct Stopwatch {
    label: String,
    start: Instant,
}

impl Stopwatch {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop and report the elapsed time in whole milliseconds.
    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        info!(
            operation = %self.label,
            elapsed_ms = whole_millis(elapsed),
            "{} took {} milliseconds",
            self.label,
            whole_millis(elapsed)
        );
        elapsed
    }
}

/// Elapsed time truncated to whole milliseconds.
pub fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
