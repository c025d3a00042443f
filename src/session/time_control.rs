//! Fixed time-control catalogue.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::errors::TimeControlError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeControl {
    #[default]
    Default,
    Classic,
    Rapid,
    Blitz,
    Bullet,
}

impl TimeControl {
    pub const ALL: [TimeControl; 5] = [
        TimeControl::Default,
        TimeControl::Classic,
        TimeControl::Rapid,
        TimeControl::Blitz,
        TimeControl::Bullet,
    ];

    /// Minutes each side starts with.
    pub const fn base_minutes(self) -> i64 {
        match self {
            TimeControl::Default => 10,
            TimeControl::Classic => 30,
            TimeControl::Rapid => 15,
            TimeControl::Blitz => 5,
            TimeControl::Bullet => 1,
        }
    }

    pub fn base_allotment(self) -> TimeDelta {
        TimeDelta::minutes(self.base_minutes())
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            TimeControl::Default => "DEFAULT",
            TimeControl::Classic => "CLASSIC",
            TimeControl::Rapid => "RAPID",
            TimeControl::Blitz => "BLITZ",
            TimeControl::Bullet => "BULLET",
        }
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TimeControl {
    type Err = TimeControlError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        Self::ALL
            .into_iter()
            .find(|tc| tc.wire_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TimeControlError::Unknown(text.to_owned()))
    }
}
