use std::{
    thread,
    time::{Duration, Instant},
};

/// Fixed-rate frame clock for loops that own their own timing.
///
/// Frames that run late are not made up for; the clock restarts from the
/// late frame.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    next_at: Instant,
}

impl Pacer {
    /// Creates a clock ticking `rate` times per second, the first tick being due now.
    pub fn from_rate(rate: f64) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / rate),
            next_at: Instant::now(),
        }
    }

    /// Returns whether the next tick is due, consuming it if so. Never blocks.
    pub fn poll(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next_at {
            return false;
        }
        self.next_at = now + self.interval;
        true
    }

    /// Sleeps until the next tick is due, then consumes it.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next_at.checked_duration_since(now) {
            thread::sleep(remaining);
            self.next_at += self.interval;
        } else {
            self.next_at = now + self.interval;
        }
    }
}
