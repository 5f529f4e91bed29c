use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::{core::series::RateSeries, prelude::*};

/// Source of published half-hourly rates.
pub trait RateSource {
    /// Fetch all published slots starting in `[since, until)`, in chronological order.
    ///
    /// Omitted `until` means all the published slots starting from `since`.
    fn fetch(&self, since: DateTime<Utc>, until: Option<DateTime<Utc>>) -> Result<RateSeries>;

    /// All the published future rates.
    fn get_upcoming_rates(&self, now: DateTime<Utc>) -> Result<RateSeries> {
        self.fetch(now, None)
    }

    /// Rates of the entire UTC day.
    #[instrument(skip_all, fields(on = %on))]
    fn get_day_rates(&self, on: NaiveDate) -> Result<RateSeries> {
        let next_day = on.checked_add_days(Days::new(1)).context("the date is out of range")?;
        self.fetch(
            on.and_time(NaiveTime::MIN).and_utc(),
            Some(next_day.and_time(NaiveTime::MIN).and_utc()),
        )
    }
}

impl<S: RateSource + ?Sized> RateSource for &S {
    fn fetch(&self, since: DateTime<Utc>, until: Option<DateTime<Utc>>) -> Result<RateSeries> {
        (**self).fetch(since, until)
    }
}

/// Serves the slots from memory and records the requested ranges.
#[cfg(test)]
pub struct InMemorySource {
    series: RateSeries,
    pub fetches: std::cell::RefCell<Vec<(DateTime<Utc>, Option<DateTime<Utc>>)>>,
    is_available: bool,
}

#[cfg(test)]
impl InMemorySource {
    pub fn new(series: RateSeries) -> Self {
        Self { series, fetches: std::cell::RefCell::default(), is_available: true }
    }

    pub fn unavailable() -> Self {
        Self { is_available: false, ..Self::new(RateSeries::default()) }
    }
}

#[cfg(test)]
impl RateSource for InMemorySource {
    fn fetch(&self, since: DateTime<Utc>, until: Option<DateTime<Utc>>) -> Result<RateSeries> {
        self.fetches.borrow_mut().push((since, until));
        ensure!(self.is_available, "connection refused");
        Ok(self
            .series
            .iter()
            .filter(|slot| slot.start >= since && until.is_none_or(|until| slot.start < until))
            .copied()
            .collect())
    }
}
