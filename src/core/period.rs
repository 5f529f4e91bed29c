use chrono::{DateTime, DurationRound, Utc};

use crate::{
    core::{interval::Interval, slot::Slot},
    prelude::*,
};

/// Half-hour period relative to the current one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Period {
    #[display("previous")]
    Previous,

    #[display("current")]
    Current,

    #[display("next")]
    Next,
}

impl Period {
    pub const ALL: [Self; 3] = [Self::Previous, Self::Current, Self::Next];

    /// Get the period's interval relative to the moment.
    pub fn interval_at(self, now: DateTime<Utc>) -> Result<Interval> {
        let current = half_hour_start(now)?;
        let start = match self {
            Self::Previous => current - Slot::DURATION,
            Self::Current => current,
            Self::Next => current + Slot::DURATION,
        };
        Ok(Interval::starting_at(start, Slot::DURATION))
    }
}

/// Round down to the start of the enclosing half-hour period.
pub fn half_hour_start(time: DateTime<Utc>) -> Result<DateTime<Utc>> {
    Ok(time.duration_trunc(Slot::DURATION)?)
}
