//! Scoring and difficulty curve

use std::time::Duration;

/// Gravity interval at level 0 of the curve
const BASE_INTERVAL_MS: u64 = 1000;
/// Fastest gravity interval
const MIN_INTERVAL_MS: u64 = 100;
/// Interval shaved off per level
const INTERVAL_STEP_MS: u64 = 50;
/// Points per cleared line, before the level multiplier
const POINTS_PER_LINE: u64 = 100;
/// Points needed per level
const POINTS_PER_LEVEL: u64 = 500;

/// Gravity interval the game starts with
pub const START_INTERVAL: Duration = Duration::from_millis(BASE_INTERVAL_MS);

/// Scoring state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starting at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Credit `lines` rows cleared by a single lock.
    ///
    /// The whole batch is scored at the level in effect before the clear; the
    /// level is then recomputed from the new total. Returns true if the level
    /// changed.
    pub fn add_clear(&mut self, lines: u32) -> bool {
        if lines == 0 {
            return false;
        }

        self.points += lines as u64 * POINTS_PER_LINE * self.level as u64;
        self.lines += lines;

        let old_level = self.level;
        self.level = (self.points / POINTS_PER_LEVEL) as u32 + 1;
        self.level != old_level
    }

    /// Gravity interval for the current level
    pub fn drop_interval(&self) -> Duration {
        let shaved = BASE_INTERVAL_MS.saturating_sub(self.level as u64 * INTERVAL_STEP_MS);
        Duration::from_millis(shaved.max(MIN_INTERVAL_MS))
    }
}
