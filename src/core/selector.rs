use chrono::{DateTime, Utc};

use crate::{
    core::{
        error::SelectionError,
        period::Period,
        provider::RateSource,
        requirement::Requirement,
        series::RateSeries,
    },
    prelude::*,
    quantity::rate::PencePerKilowattHour,
};

/// Selections which may need to fetch more rates from the source.
pub struct Selector<S> {
    source: S,
}

impl<S: RateSource> Selector<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Select the `n_slots` cheapest slots and then repair the selection to meet the requirements.
    ///
    /// Requirements are repaired one by one in order, each on top of the previous repairs.
    #[instrument(skip_all, fields(n_slots = n_slots, n_requirements = requirements.len()))]
    pub fn select_cheapest(
        &self,
        series: &RateSeries,
        n_slots: usize,
        requirements: &[Requirement],
    ) -> Result<RateSeries> {
        let mut selection = series.cheapest(n_slots)?;
        for requirement in requirements {
            self.repair(&mut selection, requirement)?;
        }
        Ok(selection)
    }

    /// Replace the in-window slots with the cheapest ones of the entire window,
    /// and evict the most expensive of the others to keep the selection size.
    ///
    /// Only the slots starting strictly inside the window are candidates, so the slot
    /// starting exactly at the window start is never picked, even though the fetch returns it.
    fn repair(&self, selection: &mut RateSeries, requirement: &Requirement) -> Result {
        let window = requirement.window;
        let n_filled = selection.iter().filter(|slot| window.surrounds(slot.start)).count();
        if n_filled >= requirement.slot_count {
            debug!(?window, n_filled, "requirement is met");
            return Ok(());
        }
        if requirement.slot_count > selection.len() {
            bail!(SelectionError::Unsatisfiable {
                requested: requirement.slot_count,
                available: selection.len(),
            });
        }

        debug!(?window, n_filled, requirement.slot_count, "repairing…");
        let replacements = self
            .source
            .fetch(window.start, Some(window.end))
            .context(SelectionError::SourceUnavailable)?
            .into_iter()
            .filter(|slot| window.surrounds(slot.start))
            .collect::<RateSeries>()
            .cheapest(requirement.slot_count)?;

        selection.retain(|slot| !window.surrounds(slot.start));
        let evicted = selection.most_expensive(requirement.slot_count - n_filled)?;
        selection.retain(|slot| !evicted.contains(slot.start));
        selection.extend(replacements);
        Ok(())
    }

    #[instrument(skip_all, fields(period = %period))]
    pub fn rate_at(&self, period: Period, now: DateTime<Utc>) -> Result<PencePerKilowattHour> {
        let interval = period.interval_at(now)?;
        let series = self
            .source
            .fetch(interval.start, Some(interval.end))
            .context(SelectionError::SourceUnavailable)?;
        let slot = series
            .iter()
            .find(|slot| interval.contains(slot.start))
            .ok_or(SelectionError::EmptySeries)?;
        Ok(slot.price)
    }

    pub fn previous_rate(&self) -> Result<PencePerKilowattHour> {
        self.rate_at(Period::Previous, Utc::now())
    }

    pub fn current_rate(&self) -> Result<PencePerKilowattHour> {
        self.rate_at(Period::Current, Utc::now())
    }

    pub fn next_rate(&self) -> Result<PencePerKilowattHour> {
        self.rate_at(Period::Next, Utc::now())
    }

    /// Rates of all the periods around the moment, [`None`] for those not published yet.
    ///
    /// Any other failure is propagated.
    #[instrument(skip_all)]
    pub fn period_rates(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(Period, Option<PencePerKilowattHour>)>> {
        Period::ALL
            .into_iter()
            .map(|period| match self.rate_at(period, now) {
                Ok(rate) => Ok((period, Some(rate))),
                Err(error)
                    if error.downcast_ref::<SelectionError>()
                        == Some(&SelectionError::EmptySeries) =>
                {
                    warn!(%period, "not published yet");
                    Ok((period, None))
                }
                Err(error) => Err(error),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::core::{interval::Interval, period::half_hour_start, provider::InMemorySource};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 4, 15, hour, minute, 0).unwrap()
    }

    /// 00:00 to 05:30, cheap in the early morning and expensive later on.
    fn day() -> RateSeries {
        RateSeries::from_prices(
            at(0, 0),
            &[3.0, 1.0, 2.0, 4.0, 9.0, 8.0, 7.0, 6.0, 12.0, 11.0, 10.0, 13.0],
        )
    }

    #[test]
    fn test_select_cheapest_without_requirements() -> Result {
        let series = RateSeries::from_prices(at(0, 0), &[10.0, 5.0, 20.0, 15.0]);
        let source = InMemorySource::new(series.clone());
        let selection = Selector::new(&source).select_cheapest(&series, 2, &[])?;
        assert_eq!(selection.starts(), [at(0, 30), at(0, 0)]);
        assert!(source.fetches.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_requirement_already_met() -> Result {
        let source = InMemorySource::new(day());
        let requirement = Requirement::new(2, Interval::new(at(0, 0), at(2, 0)));
        let selection = Selector::new(&source).select_cheapest(&day(), 3, &[requirement])?;
        assert_eq!(selection.prices(), [1.0, 2.0, 3.0]);
        assert!(source.fetches.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_requirement_repair() -> Result {
        let source = InMemorySource::new(day());
        let window = Interval::new(at(2, 0), at(4, 0));
        let requirement = Requirement::new(2, window);

        let selection = Selector::new(&source).select_cheapest(&day(), 4, &[requirement])?;

        assert_eq!(*source.fetches.borrow(), [(at(2, 0), Some(at(4, 0)))]);
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.iter().filter(|slot| window.surrounds(slot.start)).count(), 2);
        // 03:00 and 03:30 replace the two most expensive slots of the base selection:
        assert_eq!(selection.starts(), [at(0, 30), at(1, 0), at(3, 30), at(3, 0)]);
        assert_eq!(selection.prices(), [1.0, 2.0, 6.0, 7.0]);
        Ok(())
    }

    /// The window start itself is not strictly inside, so it is never picked.
    #[test]
    fn test_requirement_window_is_exclusive() -> Result {
        let series = RateSeries::from_prices(at(0, 0), &[5.0, 1.0, 9.0, 8.0, 7.0, 2.0]);
        let source = InMemorySource::new(series.clone());
        let window = Interval::new(at(0, 30), at(2, 30));
        let requirement = Requirement::new(1, window);

        let selection = Selector::new(&source).select_cheapest(&series, 2, &[requirement])?;

        assert_eq!(selection.starts(), [at(0, 30), at(2, 0)]);
        assert_eq!(selection.prices(), [1.0, 7.0]);
        Ok(())
    }

    #[test]
    fn test_partially_met_requirement() -> Result {
        let source = InMemorySource::new(day());
        let window = Interval::new(at(0, 0), at(3, 0));
        let requirement = Requirement::new(4, window);

        let selection = Selector::new(&source).select_cheapest(&day(), 5, &[requirement])?;

        assert_eq!(selection.len(), 5);
        assert_eq!(selection.iter().filter(|slot| window.surrounds(slot.start)).count(), 4);
        // 03:30 is evicted, the in-window slots are re-selected:
        assert_eq!(selection.starts(), [at(0, 0), at(0, 30), at(1, 0), at(1, 30), at(2, 30)]);
        Ok(())
    }

    /// A later repair works on top of the previous ones and may evict their slots.
    #[test]
    fn test_requirements_interact() -> Result {
        let source = InMemorySource::new(day());
        let evening = Requirement::new(1, Interval::new(at(4, 0), at(6, 0)));
        let morning = Requirement::new(1, Interval::new(at(2, 0), at(4, 0)));

        let selection = Selector::new(&source).select_cheapest(&day(), 3, &[evening, morning])?;

        assert_eq!(
            *source.fetches.borrow(),
            [(at(4, 0), Some(at(6, 0))), (at(2, 0), Some(at(4, 0)))],
        );
        assert_eq!(selection.starts(), [at(0, 30), at(1, 0), at(3, 30)]);
        assert_eq!(selection.prices(), [1.0, 2.0, 6.0]);
        assert!(!selection.contains(at(5, 0)));
        Ok(())
    }

    /// The repair fetches the window even when the series has only a part of it.
    #[test]
    fn test_repair_fetches_missing_slots() -> Result {
        let series: RateSeries =
            day().into_iter().filter(|slot| slot.start < at(2, 0)).collect();
        let source = InMemorySource::new(day());
        let window = Interval::new(at(3, 0), at(5, 0));
        let requirement = Requirement::new(1, window);

        let selection = Selector::new(&source).select_cheapest(&series, 2, &[requirement])?;

        assert_eq!(selection.starts(), [at(0, 30), at(3, 30)]);
        Ok(())
    }

    #[test]
    fn test_requirement_exceeds_selection_size() {
        let source = InMemorySource::new(day());
        let requirement = Requirement::new(3, Interval::new(at(2, 0), at(5, 0)));
        let error = Selector::new(&source).select_cheapest(&day(), 2, &[requirement]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<SelectionError>(),
            Some(&SelectionError::Unsatisfiable { requested: 3, available: 2 }),
        );
    }

    #[test]
    fn test_requirement_window_too_short() {
        let source = InMemorySource::new(day());
        let requirement = Requirement::new(2, Interval::new(at(2, 0), at(3, 0)));
        let error = Selector::new(&source).select_cheapest(&day(), 4, &[requirement]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<SelectionError>(),
            Some(&SelectionError::Unsatisfiable { requested: 2, available: 1 }),
        );
    }

    #[test]
    fn test_repair_source_unavailable() {
        let source = InMemorySource::unavailable();
        let requirement = Requirement::new(1, Interval::new(at(4, 0), at(6, 0)));
        let error = Selector::new(&source).select_cheapest(&day(), 2, &[requirement]).unwrap_err();
        assert_eq!(error.downcast_ref::<SelectionError>(), Some(&SelectionError::SourceUnavailable));
    }

    #[test]
    fn test_rate_at() -> Result {
        let source = InMemorySource::new(day());
        let selector = Selector::new(&source);
        let now = at(1, 17) + TimeDelta::seconds(42);

        assert_abs_diff_eq!(selector.rate_at(Period::Previous, now)?.0, 1.0);
        assert_abs_diff_eq!(selector.rate_at(Period::Current, now)?.0, 2.0);
        assert_abs_diff_eq!(selector.rate_at(Period::Next, now)?.0, 4.0);

        assert_eq!(
            *source.fetches.borrow(),
            [
                (at(0, 30), Some(at(1, 0))),
                (at(1, 0), Some(at(1, 30))),
                (at(1, 30), Some(at(2, 0))),
            ],
        );
        Ok(())
    }

    #[test]
    fn test_rates_around_now() -> Result {
        let start = half_hour_start(Utc::now())? - TimeDelta::hours(1);
        let source = InMemorySource::new(RateSeries::from_prices(start, &[0.0, 1.0, 2.0, 3.0, 4.0]));
        let selector = Selector::new(&source);
        let previous = selector.previous_rate()?;
        let current = selector.current_rate()?;
        let next = selector.next_rate()?;
        assert!(previous < current);
        assert!(current < next);
        Ok(())
    }

    #[test]
    fn test_next_rate_not_published() {
        let source = InMemorySource::new(day());
        let error = Selector::new(&source).rate_at(Period::Next, at(5, 45)).unwrap_err();
        assert_eq!(error.downcast_ref::<SelectionError>(), Some(&SelectionError::EmptySeries));
    }

    #[test]
    fn test_period_rates_next_not_published() -> Result {
        let source = InMemorySource::new(day());
        let rates = Selector::new(&source).period_rates(at(5, 45))?;
        assert_eq!(
            rates,
            [
                (Period::Previous, Some(PencePerKilowattHour(10.0))),
                (Period::Current, Some(PencePerKilowattHour(13.0))),
                (Period::Next, None),
            ],
        );
        Ok(())
    }

    #[test]
    fn test_period_rates_source_unavailable() {
        let source = InMemorySource::unavailable();
        let error = Selector::new(&source).period_rates(at(5, 45)).unwrap_err();
        assert_eq!(error.downcast_ref::<SelectionError>(), Some(&SelectionError::SourceUnavailable));
    }

    #[test]
    fn test_rate_source_unavailable() {
        let source = InMemorySource::unavailable();
        let error = Selector::new(&source).rate_at(Period::Current, at(5, 45)).unwrap_err();
        assert_eq!(error.downcast_ref::<SelectionError>(), Some(&SelectionError::SourceUnavailable));
    }
}
