use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{core::interval::Interval, prelude::*};

/// At least `slot_count` selected slots must start strictly inside the window.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Requirement {
    pub slot_count: usize,
    pub window: Interval,
}

impl Requirement {
    pub const fn new(slot_count: usize, window: Interval) -> Self {
        Self { slot_count, window }
    }
}

/// Parses `SLOTS@FROM..TO`, for example `2@2020-04-15T19:00:00Z..2020-04-16T06:00:00Z`.
impl FromStr for Requirement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (slot_count, window) =
            s.split_once('@').with_context(|| format!("`{s}` is missing the `@` separator"))?;
        let (start, end) = window
            .split_once("..")
            .with_context(|| format!("`{window}` is missing the `..` separator"))?;
        let slot_count = slot_count
            .trim()
            .parse()
            .with_context(|| format!("`{slot_count}` is not a valid slot count"))?;
        let start = DateTime::<Utc>::from_str(start.trim())
            .with_context(|| format!("`{start}` is not a valid timestamp"))?;
        let end = DateTime::<Utc>::from_str(end.trim())
            .with_context(|| format!("`{end}` is not a valid timestamp"))?;
        ensure!(start < end, "the requirement window must not be empty");
        Ok(Self::new(slot_count, Interval::new(start, end)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_from_str_ok() -> Result {
        let requirement: Requirement = "2@2020-04-15T19:00:00Z..2020-04-16T06:00:00Z".parse()?;
        assert_eq!(requirement.slot_count, 2);
        assert_eq!(requirement.window.start, Utc.with_ymd_and_hms(2020, 4, 15, 19, 0, 0).unwrap());
        assert_eq!(requirement.window.end, Utc.with_ymd_and_hms(2020, 4, 16, 6, 0, 0).unwrap());
        Ok(())
    }

    #[test]
    fn test_from_str_err() {
        assert!("2020-04-15T19:00:00Z..2020-04-16T06:00:00Z".parse::<Requirement>().is_err());
        assert!("2@2020-04-15T19:00:00Z".parse::<Requirement>().is_err());
        assert!("x@2020-04-15T19:00:00Z..2020-04-16T06:00:00Z".parse::<Requirement>().is_err());
        assert!("2@2020-04-16T06:00:00Z..2020-04-15T19:00:00Z".parse::<Requirement>().is_err());
    }
}
