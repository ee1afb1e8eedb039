//! Rate-limited logging utilities.
//!
//! Provides `LogThrottle` to prevent log storms while still tracking suppressed messages.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::info;

/// A lightweight rate limiter for logging to prevent log storms.
#[derive(Debug)]
pub struct LogThrottle {
    last_log_time: Option<Instant>,
    suppressed_count: u64,
    interval: Duration,
}

impl LogThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_log_time: None,
            suppressed_count: 0,
            interval,
        }
    }

    /// Checks if a log should be emitted.
    /// Returns true if the interval has passed since the last log.
    /// If false, increments the suppressed counter.
    pub fn should_log(&mut self) -> bool {
        let now = Instant::now();
        match self.last_log_time {
            Some(last) if now.duration_since(last) < self.interval => {
                self.suppressed_count += 1;
                false
            }
            _ => {
                self.last_log_time = Some(now);
                true
            }
        }
    }

    /// Returns the number of suppressed logs since the last successful log, and resets the counter.
    pub fn get_and_reset_suppressed_count(&mut self) -> u64 {
        std::mem::take(&mut self.suppressed_count)
    }
}

/// Logs scan progress at most once per interval, plus the final count.
///
/// `report` takes `&self`, so a `ProgressLogger` can back the `Sync`
/// progress callback of a parallel scan.
#[derive(Debug)]
pub struct ProgressLogger {
    throttle: Mutex<LogThrottle>,
}

impl ProgressLogger {
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: Mutex::new(LogThrottle::new(interval)),
        }
    }

    /// Record `processed` of `total`; returns whether a line was logged.
    pub fn report(&self, processed: usize, total: usize) -> bool {
        let mut throttle = self.throttle.lock().unwrap_or_else(PoisonError::into_inner);
        // The completion line is never suppressed
        if !throttle.should_log() && processed < total {
            return false;
        }

        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        info!(
            processed,
            total,
            percent = format!("{:.1}", percent),
            suppressed = throttle.get_and_reset_suppressed_count(),
            "Scan progress"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_always_logs() {
        let mut throttle = LogThrottle::new(Duration::from_secs(3600));
        assert!(throttle.should_log());
        assert!(!throttle.should_log());
        assert!(!throttle.should_log());
        assert_eq!(throttle.get_and_reset_suppressed_count(), 2);
        assert_eq!(throttle.get_and_reset_suppressed_count(), 0);
    }

    #[test]
    fn test_zero_interval_never_suppresses() {
        let mut throttle = LogThrottle::new(Duration::ZERO);
        assert!((0..5).all(|_| throttle.should_log()));
        assert_eq!(throttle.get_and_reset_suppressed_count(), 0);
    }

    #[test]
    fn test_progress_logger_always_reports_completion() {
        let logger = ProgressLogger::new(Duration::from_secs(3600));
        assert!(logger.report(10, 100));
        assert!(!logger.report(20, 100));
        assert!(logger.report(100, 100));
    }
}
