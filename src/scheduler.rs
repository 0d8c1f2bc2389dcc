//! Gravity timer
//!
//! A single repeating timer. Re-arming always throws the old timer away and
//! starts a fresh one, so two timers can never be live together. The new
//! timer's first period starts at the first `poll` after it was armed.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Timer {
    /// Identifies this timer among all timers the scheduler has created
    generation: u64,
    period: Duration,
    /// Set by the first poll
    next_fire: Option<Instant>,
}

/// Owner of the gravity timer
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timer: Option<Timer>,
    generations: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any live timer with a new one firing every `period`
    pub fn rearm(&mut self, period: Duration) {
        self.cancel();
        self.generations += 1;
        self.timer = Some(Timer {
            generation: self.generations,
            period,
            next_fire: None,
        });
        tracing::debug!(
            "Gravity timer #{} armed at {}ms",
            self.generations,
            period.as_millis()
        );
    }

    /// Tear down the live timer, if any
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            tracing::debug!("Gravity timer #{} cancelled", timer.generation);
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Period of the live timer
    #[cfg(test)]
    pub fn period(&self) -> Option<Duration> {
        self.timer.as_ref().map(|t| t.period)
    }

    /// Generation of the live timer; changes on every re-arm
    pub fn generation(&self) -> Option<u64> {
        self.timer.as_ref().map(|t| t.generation)
    }

    /// Number of periods that have elapsed by `now` since the last poll
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(timer) = &mut self.timer else {
            return 0;
        };

        let Some(next_fire) = timer.next_fire else {
            timer.next_fire = Some(now + timer.period);
            return 0;
        };

        if now < next_fire {
            return 0;
        }

        let overdue = now - next_fire;
        let fires = (overdue.as_nanos() / timer.period.as_nanos().max(1)) as u32 + 1;
        timer.next_fire = Some(next_fire + timer.period * fires);
        fires
    }

    /// Time left before the live timer fires
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        let timer = self.timer.as_ref()?;
        Some(match timer.next_fire {
            Some(at) => at.saturating_duration_since(now),
            None => timer.period,
        })
    }
}
