use chrono::{Local, NaiveDateTime};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of timestamps for a timer.
pub trait Clock {
    /// Seconds since the Unix epoch. Successive readings never decrease.
    fn now(&self) -> f64;

    /// Local wall-clock time shown in the start/end markers.
    fn local_time(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn local_time(&self) -> NaiveDateTime {
        (**self).local_time()
    }
}

/// System wall clock, anchored once and advanced with a monotonic stopwatch
/// so that adjustments to the system time cannot make `now` go backwards.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch_secs: f64,
    anchor: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let epoch_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            epoch_secs,
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch_secs + self.anchor.elapsed().as_secs_f64()
    }

    fn local_time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
