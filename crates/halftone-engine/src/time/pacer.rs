use std::time::{Duration, Instant};

/// Rate limiter for work that should run at most `fps` times per second.
///
/// The render loop redraws continuously; frame sources are polled through a
/// pacer so capture runs at its own, lower rate.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Option<Instant>,
}

impl FramePacer {
    /// Creates a pacer for `fps` runs per second. `0` is treated as `1`.
    pub fn new(fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            interval: Duration::from_secs(1) / fps,
            next: None,
        }
    }

    /// Interval between two ready instants.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if work may run at `now`, and schedules the next slot.
    ///
    /// The first call is always ready. Missed slots are not accumulated: after
    /// a stall the next slot is `now + interval`.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now < next => false,
            Some(next) => {
                let scheduled = next + self.interval;
                self.next = Some(if scheduled <= now { now + self.interval } else { scheduled });
                true
            }
            None => {
                self.next = Some(now + self.interval);
                true
            }
        }
    }

    /// Makes the next `ready` call succeed immediately.
    pub fn reset(&mut self) {
        self.next = None;
    }
}

/// One-shot deadline.
///
/// Disarmed by default; `timeout == None` never expires.
#[derive(Debug, Clone)]
pub struct SafetyTimer {
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl SafetyTimer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout: timeout.filter(|t| !t.is_zero()),
            deadline: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Starts (or restarts) the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = self.timeout.map(|t| now + t);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once the deadline has passed, then disarms.
    pub fn expired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
