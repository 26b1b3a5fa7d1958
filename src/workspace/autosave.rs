//! Periodic autosave with a single shared in-flight gate.
//!
//! The scheduler only decides *when* a save is due. Whether one may start
//! (note open, dirty, nothing in flight) is passed in by the caller on each
//! poll, so a fire that lands while a save is running is simply skipped.

use std::time::{Duration, Instant};

use crate::model::MIN_AUTOSAVE_SECONDS;

#[derive(Debug, Clone, Default)]
pub struct AutosaveScheduler {
    interval: Duration,
    next_fire: Option<Instant>,
}

impl AutosaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable, replacing any pending deadline. The interval is
    /// floored at five seconds.
    pub fn configure(&mut self, enabled: bool, interval: Duration, now: Instant) {
        let floor = Duration::from_secs(u64::from(MIN_AUTOSAVE_SECONDS));
        self.interval = interval.max(floor);
        self.next_fire = enabled.then(|| now + self.interval);
    }

    pub fn is_enabled(&self) -> bool {
        self.next_fire.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next fire is due, for sizing the event loop's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_fire
    }

    /// Stop firing. Nothing stays scheduled afterwards.
    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    /// Returns true when a period has elapsed and `ready` holds.
    ///
    /// Elapsed periods are consumed whether or not a save starts; missed
    /// periods collapse into one.
    pub fn poll(&mut self, now: Instant, ready: bool) -> bool {
        let Some(due) = self.next_fire else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.next_fire = Some(next);
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn disabled_never_fires() {
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(false, secs(5), t0);
        assert!(!sched.poll(t0 + secs(60), true));
        assert_eq!(sched.next_deadline(), None);
    }

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(true, secs(5), t0);
        assert!(!sched.poll(t0 + secs(4), true));
        assert!(sched.poll(t0 + secs(5), true));
        assert!(!sched.poll(t0 + secs(6), true));
        assert!(sched.poll(t0 + secs(10), true));
    }

    #[test]
    fn interval_floor_applies() {
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(true, secs(1), t0);
        assert_eq!(sched.interval(), secs(5));
        assert!(!sched.poll(t0 + secs(2), true));
    }

    #[test]
    fn reconfigure_replaces_pending_deadline() {
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(true, secs(5), t0);
        sched.configure(true, secs(30), t0 + secs(4));
        // the old 5s deadline must not fire
        assert!(!sched.poll(t0 + secs(6), true));
        assert!(sched.poll(t0 + secs(34), true));
    }

    #[test]
    fn cancel_leaves_nothing_scheduled() {
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(true, secs(5), t0);
        sched.cancel();
        assert!(!sched.is_enabled());
        assert!(!sched.poll(t0 + secs(100), true));
    }

    #[test]
    fn missed_periods_collapse() {
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(true, secs(5), t0);
        assert!(sched.poll(t0 + secs(23), true));
        assert!(!sched.poll(t0 + secs(24), true));
        assert_eq!(sched.next_deadline(), Some(t0 + secs(25)));
    }

    #[test]
    fn slow_save_never_overlaps() {
        // 5s period, each save takes 8s, 20s window sampled every 500ms
        let t0 = Instant::now();
        let mut sched = AutosaveScheduler::new();
        sched.configure(true, secs(5), t0);

        let mut in_flight_until: Option<Instant> = None;
        let mut started = Vec::new();
        let mut max_concurrent = 0;
        for step in 0..=40 {
            let now = t0 + Duration::from_millis(step * 500);
            if in_flight_until.is_some_and(|end| now >= end) {
                in_flight_until = None;
            }
            if sched.poll(now, in_flight_until.is_none()) {
                assert!(in_flight_until.is_none());
                in_flight_until = Some(now + secs(8));
                started.push(now - t0);
            }
            max_concurrent = max_concurrent.max(usize::from(in_flight_until.is_some()));
        }
        assert_eq!(max_concurrent, 1);
        assert_eq!(started, vec![secs(5), secs(15)]);
    }
}
