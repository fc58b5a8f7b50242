// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

/// Fixed-interval cooperative scheduler.
///
/// The host asks [`Ticker::poll`] whether a tick is due and runs at most one
/// tick per poll, so ticks never overlap. When the host falls behind the
/// next deadline snaps to `now`, so at most one catch-up tick follows.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the ticker; the first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time left until the next tick, `None` while stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true (and schedules the following tick) when a tick is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.interval;
        if now > next {
            next = now;
        }
        self.next_due = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn stopped_ticker_never_fires() {
        let mut t = Ticker::new(MS * 50);
        let now = Instant::now();
        assert!(!t.poll(now));
        assert!(!t.poll(now + MS * 500));
        assert_eq!(t.time_until_due(now), None);
    }

    #[test]
    fn fires_once_per_interval() {
        let mut t = Ticker::new(MS * 50);
        let t0 = Instant::now();
        t.start(t0);
        assert!(t.poll(t0));
        assert!(!t.poll(t0));
        assert!(!t.poll(t0 + MS * 49));
        assert!(t.poll(t0 + MS * 50));
        assert!(!t.poll(t0 + MS * 60));
        assert_eq!(t.time_until_due(t0 + MS * 60), Some(MS * 40));
    }

    #[test]
    fn late_poll_catches_up_with_a_single_tick() {
        let mut t = Ticker::new(MS * 50);
        let t0 = Instant::now();
        t.start(t0);
        assert!(t.poll(t0));
        let late = t0 + MS * 500;
        assert!(t.poll(late));
        assert!(t.poll(late));
        assert!(!t.poll(late));
        assert!(t.poll(late + MS * 50));
    }

    #[test]
    fn stop_cancels_pending_tick() {
        let mut t = Ticker::new(MS * 50);
        let t0 = Instant::now();
        t.start(t0);
        t.stop();
        assert!(!t.is_running());
        assert!(!t.poll(t0 + MS * 100));
    }

    #[test]
    fn start_is_idempotent() {
        let mut t = Ticker::new(MS * 50);
        let t0 = Instant::now();
        t.start(t0);
        assert!(t.poll(t0));
        t.start(t0 + MS * 10);
        assert_eq!(t.time_until_due(t0 + MS * 10), Some(MS * 40));
    }
}
