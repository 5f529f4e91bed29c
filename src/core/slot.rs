use chrono::{DateTime, TimeDelta, Utc};

use crate::{core::interval::Interval, quantity::rate::PencePerKilowattHour};

/// Single half-hour pricing period.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub price: PencePerKilowattHour,
}

impl Slot {
    pub const DURATION: TimeDelta = TimeDelta::minutes(30);

    pub const fn new(start: DateTime<Utc>, price: PencePerKilowattHour) -> Self {
        Self { start, price }
    }

    pub fn interval(self) -> Interval {
        Interval::starting_at(self.start, Self::DURATION)
    }
}
