use std::fmt::{Debug, Formatter};

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: DateTime<Utc>, duration: TimeDelta) -> Self {
        Self::new(start, start + duration)
    }

    pub fn contains(self, other: DateTime<Utc>) -> bool {
        (self.start <= other) && (other < self.end)
    }

    /// Check whether the timestamp lies strictly between both ends.
    pub fn surrounds(self, other: DateTime<Utc>) -> bool {
        (self.start < other) && (other < self.end)
    }
}
