use std::time::{Duration, Instant};

/// Owned deadline for the periodic alert fetch.
///
/// The schedule is the only holder of the "interval"; pausing live
/// monitoring disarms it outright, so there is never a stale timer
/// acting behind the scenes and never two overlapping periods.
#[derive(Debug, Clone, Copy)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollSchedule {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arms (or re-arms) the schedule one full period from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub const fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// True exactly once per elapsed period; re-arms for the next.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PollSchedule;
    use std::time::{Duration, Instant};

    #[test]
    fn disarmed_schedule_is_never_due() {
        let mut schedule = PollSchedule::new(Duration::from_secs(5));
        assert!(!schedule.is_armed());
        assert!(!schedule.take_due(Instant::now() + Duration::from_secs(60)));
    }

    #[test]
    fn due_fires_once_per_period_and_rearms() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(Duration::from_secs(5));
        schedule.restart(start);

        assert!(!schedule.take_due(start + Duration::from_secs(4)));
        assert!(schedule.take_due(start + Duration::from_secs(5)));
        // Re-armed relative to the fire time, not the original start.
        assert!(!schedule.take_due(start + Duration::from_secs(6)));
        assert!(schedule.take_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn restart_replaces_rather_than_stacks() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(Duration::from_secs(5));
        schedule.restart(start);
        schedule.restart(start + Duration::from_secs(3));

        assert!(!schedule.take_due(start + Duration::from_secs(5)));
        assert!(schedule.take_due(start + Duration::from_secs(8)));
    }

    #[test]
    fn disarm_cancels_a_pending_deadline() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(Duration::from_secs(5));
        schedule.restart(start);
        schedule.disarm();

        assert!(!schedule.take_due(start + Duration::from_secs(30)));
    }
}
