//! # Logging Utilities
//!
//! Rate limiting for warnings that repeat every telegram cycle (a bad cable
//! produces a checksum mismatch every second on a DSMR 5 meter) and a raw
//! telegram dump for protocol debugging.

use std::time::{Duration, Instant};

/// Allows at most `cap` messages per time window.
#[derive(Debug)]
pub struct LogThrottle {
    window: Duration,
    cap: u32,
    count: u32,
    suppressed: u32,
    t0: Instant,
}

impl LogThrottle {
    /// Create new throttle with time window and message cap
    ///
    /// # Examples
    /// ```rust
    /// use p1_rs::util::logging::LogThrottle;
    /// use std::time::Duration;
    ///
    /// // At most 3 checksum warnings per minute
    /// let mut throttle = LogThrottle::new(Duration::from_secs(60), 3);
    /// assert!(throttle.allow());
    /// ```
    pub fn new(window: Duration, cap: u32) -> Self {
        Self {
            window,
            cap,
            count: 0,
            suppressed: 0,
            t0: Instant::now(),
        }
    }

    /// Returns `true` if the message should be logged.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.t0) > self.window {
            if self.suppressed > 0 {
                log::warn!("{} similar messages suppressed", self.suppressed);
            }
            self.t0 = now;
            self.count = 0;
            self.suppressed = 0;
        }

        self.count += 1;
        if self.count <= self.cap {
            true
        } else {
            self.suppressed += 1;
            false
        }
    }

    /// Messages dropped in the current window.
    pub fn suppressed(&self) -> u32 {
        self.suppressed
    }

    /// Reset the throttle (start new window immediately)
    pub fn reset(&mut self) {
        self.t0 = Instant::now();
        self.count = 0;
        self.suppressed = 0;
    }
}

/// Log a warning with throttling
#[macro_export]
macro_rules! log_warn_throttled {
    ($throttle:expr, $($arg:tt)*) => {
        if $throttle.allow() {
            log::warn!($($arg)*);
        }
    };
}

/// Dumps a raw telegram line by line at trace level.
pub fn log_telegram(prefix: &str, text: &str) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    for (n, line) in text.lines().enumerate() {
        log::trace!(target: "p1::telegram", "{prefix} {n:>3}: {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_throttle_basic() {
        let mut throttle = LogThrottle::new(Duration::from_secs(60), 3);

        assert!(throttle.allow());
        assert!(throttle.allow());
        assert!(throttle.allow());

        assert!(!throttle.allow());
        assert!(!throttle.allow());
        assert_eq!(throttle.suppressed(), 2);
    }

    #[test]
    fn test_log_throttle_reset() {
        let mut throttle = LogThrottle::new(Duration::from_secs(60), 1);
        assert!(throttle.allow());
        assert!(!throttle.allow());

        throttle.reset();
        assert_eq!(throttle.suppressed(), 0);
        assert!(throttle.allow());
    }

    #[test]
    fn test_log_throttle_window_expiry() {
        let mut throttle = LogThrottle::new(Duration::from_millis(1), 1);
        assert!(throttle.allow());
        assert!(!throttle.allow());
        std::thread::sleep(Duration::from_millis(5));
        assert!(throttle.allow());
    }

    #[test]
    fn test_log_telegram_does_not_panic() {
        log_telegram("rx", "/ISK5\r\n!505A\r\n");
    }
}
