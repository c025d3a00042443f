//! Wall-clock time keeping for timed games.
//!
//! There is no ticking timer. A [`ChessClock`] stores each side's remaining
//! time as of the start of the current turn plus the turn's start instant;
//! the running side's remaining time is derived from the injected
//! [`TimeSource`] whenever it is asked for.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

use crate::game_state::chess_types::Color;

/// Source of the current instant.
pub trait TimeSource: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time source that only moves when told to.
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

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = instant;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChessClock {
    remaining: [TimeDelta; 2],
    turn_started_at: DateTime<Utc>,
}

impl ChessClock {
    pub fn new(allotment: TimeDelta, now: DateTime<Utc>) -> Self {
        Self {
            remaining: [allotment; 2],
            turn_started_at: now,
        }
    }

    /// Remaining time of `color` at `now` while `running` is on move.
    pub fn remaining(&self, color: Color, running: Color, now: DateTime<Utc>) -> TimeDelta {
        let banked = self.remaining[color.index()];
        if color == running {
            banked - (now - self.turn_started_at)
        } else {
            banked
        }
    }

    /// Charge `color` for the turn ending at `now` and start the next turn.
    pub fn debit(&mut self, color: Color, now: DateTime<Utc>) -> TimeDelta {
        let left = self.remaining(color, color, now);
        self.remaining[color.index()] = left;
        self.turn_started_at = now;
        left
    }

    pub fn restart_turn(&mut self, now: DateTime<Utc>) {
        self.turn_started_at = now;
    }

    pub fn turn_started_at(&self) -> DateTime<Utc> {
        self.turn_started_at
    }
}

/// `HH:MM:SS`, clamped at zero.
pub fn format_hms(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
