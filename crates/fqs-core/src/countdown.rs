//! Countdown badge for the five-minute response window.
//!
//! The badge state is a pure function of the creation time and the current
//! instant; [`CountdownBadge::run`] adds the once-per-second tick.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Response window measured from a record's creation.
pub const RESPONSE_WINDOW_SECS: i64 = 5 * 60;

/// Text shown once the window has elapsed.
pub const EXPIRED_LABEL: &str = "Expirado";

/// What the badge shows at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Whole seconds left before the deadline
    Running { remaining_secs: u32 },
    Expired,
}

impl CountdownState {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running { remaining_secs } => {
                write!(f, "{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
            }
            Self::Expired => f.write_str(EXPIRED_LABEL),
        }
    }
}

/// Source of wall-clock time and of the one-second wait between ticks.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: std::time::Duration);
}

/// Real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: std::time::Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }

    fn sleep(&self, duration: std::time::Duration) {
        if let Ok(by) = Duration::from_std(duration) {
            self.advance(by);
        }
    }
}

/// Countdown for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownBadge {
    created_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
}

impl CountdownBadge {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            deadline: created_at + Duration::seconds(RESPONSE_WINDOW_SECS),
        }
    }

    /// Point the badge at a new creation time and recompute the deadline.
    pub fn reset(&mut self, created_at: DateTime<Utc>) {
        *self = Self::new(created_at);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Badge state at `now`. Expired exactly at the deadline, never negative.
    pub fn state_at(&self, now: DateTime<Utc>) -> CountdownState {
        let remaining_ms = (self.deadline - now).num_milliseconds();
        if remaining_ms <= 0 {
            CountdownState::Expired
        } else {
            CountdownState::Running {
                remaining_secs: (remaining_ms / 1000) as u32,
            }
        }
    }

    /// Tick once per second until the window expires or `on_tick` returns
    /// `false` (the badge was removed from view). Returns the last state shown.
    pub fn run<C, F>(&self, clock: &C, mut on_tick: F) -> CountdownState
    where
        C: Clock + ?Sized,
        F: FnMut(CountdownState) -> bool,
    {
        loop {
            let state = self.state_at(clock.now());
            let keep_going = on_tick(state);
            if state.is_expired() {
                tracing::debug!(created_at = %self.created_at, "Response window expired");
                return state;
            }
            if !keep_going {
                return state;
            }
            clock.sleep(std::time::Duration::from_secs(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_running_label() {
        let badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));
        assert_eq!(badge.state_at(at("2024-01-01T10:00:00Z")).to_string(), "05:00");
        assert_eq!(badge.state_at(at("2024-01-01T10:04:30Z")).to_string(), "00:30");
        assert_eq!(badge.state_at(at("2024-01-01T10:03:51Z")).to_string(), "01:09");
    }

    #[test]
    fn test_last_subsecond_shows_zero() {
        let badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));
        let state = badge.state_at(at("2024-01-01T10:04:59.500Z"));
        assert_eq!(state, CountdownState::Running { remaining_secs: 0 });
        assert_eq!(state.to_string(), "00:00");
    }

    #[test]
    fn test_expired_at_deadline_and_after() {
        let badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));
        assert!(badge.state_at(at("2024-01-01T10:05:00Z")).is_expired());
        assert_eq!(badge.state_at(at("2024-01-01T10:06:00Z")).to_string(), "Expirado");
    }

    #[test]
    fn test_reset_recomputes_deadline() {
        let mut badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));
        badge.reset(at("2024-01-01T11:00:00Z"));
        assert_eq!(badge.deadline(), at("2024-01-01T11:05:00Z"));
        assert_eq!(badge.state_at(at("2024-01-01T11:04:00Z")).to_string(), "01:00");
    }

    #[test]
    fn test_run_counts_down_then_expires() {
        let start = at("2024-01-01T10:04:30Z");
        let clock = ManualClock::new(start);
        let badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));

        let mut shown = Vec::new();
        let last = badge.run(&clock, |state| {
            shown.push(state.to_string());
            true
        });

        assert_eq!(last, CountdownState::Expired);
        assert_eq!(shown.first().map(String::as_str), Some("00:30"));
        assert_eq!(shown[29], "00:01");
        assert_eq!(shown.last().map(String::as_str), Some("Expirado"));
        assert_eq!(shown.len(), 31);
        assert_eq!(clock.now(), at("2024-01-01T10:05:00Z"));
    }

    #[test]
    fn test_run_on_expired_record_does_not_tick() {
        let clock = ManualClock::new(at("2024-01-01T10:06:00Z"));
        let badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));

        let mut ticks = 0;
        let last = badge.run(&clock, |_| {
            ticks += 1;
            true
        });
        assert!(last.is_expired());
        assert_eq!(ticks, 1);
        assert_eq!(clock.now(), at("2024-01-01T10:06:00Z"));
    }

    #[test]
    fn test_run_cancelled_when_badge_removed() {
        let clock = ManualClock::new(at("2024-01-01T10:00:00Z"));
        let badge = CountdownBadge::new(at("2024-01-01T10:00:00Z"));

        let mut ticks = 0;
        let last = badge.run(&clock, |_| {
            ticks += 1;
            ticks < 3
        });
        assert_eq!(ticks, 3);
        assert_eq!(last.to_string(), "04:58");
    }
}
