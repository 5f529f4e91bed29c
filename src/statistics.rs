use chrono::{Days, NaiveDate};

use crate::{
    core::{
        aggregate::Aggregate,
        error::SelectionError,
        provider::RateSource,
        series::{CheapestRun, RateSeries},
        slot::Slot,
    },
    prelude::*,
    quantity::rate::PencePerKilowattHour,
};

/// Rates below this one are considered low.
pub const LOW_RATE: PencePerKilowattHour = PencePerKilowattHour(15.0);

/// Number of the cheapest slots to report per day.
pub const N_CHEAPEST_SLOTS: usize = 6;

/// Length of the cheapest run to report per day: 4 hours.
pub const N_RUN_SLOTS: usize = 8;

#[must_use]
#[derive(Debug)]
pub struct DailySummary {
    pub on: NaiveDate,
    pub mean: PencePerKilowattHour,
    pub low_mean: Option<PencePerKilowattHour>,
    pub min: PencePerKilowattHour,
    pub max: PencePerKilowattHour,
    pub cheapest: RateSeries,
    pub cheapest_run: Option<CheapestRun>,
}

impl DailySummary {
    pub fn try_new(on: NaiveDate, series: &RateSeries) -> Result<Self> {
        let mean = series.mean_price().ok_or(SelectionError::EmptySeries)?;
        let low_mean = low_mean(series);
        let min = series.iter().map(|slot| slot.price).min().ok_or(SelectionError::EmptySeries)?;
        let max = series.iter().map(|slot| slot.price).max().ok_or(SelectionError::EmptySeries)?;
        Ok(Self {
            on,
            mean,
            low_mean,
            min,
            max,
            cheapest: series.cheapest(N_CHEAPEST_SLOTS.min(series.len()))?,
            cheapest_run: series.cheapest_run(N_RUN_SLOTS),
        })
    }
}

#[must_use]
#[derive(Debug)]
pub struct Summary {
    pub days: Vec<DailySummary>,
    pub mean: PencePerKilowattHour,
    pub low_mean: Option<PencePerKilowattHour>,

    /// Mean over the daily cheapest runs.
    pub mean_run_price: Option<PencePerKilowattHour>,

    pub cheapest: Slot,
    pub most_expensive: Slot,
}

impl Summary {
    /// Fetch and summarize the last `n_days` UTC days, `today` included.
    ///
    /// Days without published rates are skipped.
    #[instrument(skip_all, fields(today = %today, n_days = n_days))]
    pub fn fetch(source: &impl RateSource, today: NaiveDate, n_days: u64) -> Result<Self> {
        let mut daily_series = Vec::new();
        for days_ago in 0..n_days {
            let on =
                today.checked_sub_days(Days::new(days_ago)).context("the date is out of range")?;
            let series = source.get_day_rates(on)?;
            if series.is_empty() {
                warn!(%on, "no rates published, skipping");
                continue;
            }
            daily_series.push((on, series));
        }
        ensure!(!daily_series.is_empty(), SelectionError::EmptySeries);
        Self::try_new(daily_series)
    }

    /// Summarize the daily series, days without rates must be filtered out beforehand.
    #[instrument(skip_all, fields(n_days = daily_series.len()))]
    pub fn try_new(daily_series: Vec<(NaiveDate, RateSeries)>) -> Result<Self> {
        let days = daily_series
            .iter()
            .map(|(on, series)| DailySummary::try_new(*on, series))
            .collect::<Result<Vec<_>>>()?;
        let all: RateSeries = daily_series.into_iter().flat_map(|(_, series)| series).collect();
        let mean = all.mean_price().ok_or(SelectionError::EmptySeries)?;
        let low_mean = low_mean(&all);
        let mean_run_price =
            days.iter().filter_map(|day| day.cheapest_run).map(|run| run.mean_price).mean();
        let cheapest = *all.cheapest(1)?.first().ok_or(SelectionError::EmptySeries)?;
        let most_expensive =
            *all.most_expensive(1)?.first().ok_or(SelectionError::EmptySeries)?;
        Ok(Self { days, mean, low_mean, mean_run_price, cheapest, most_expensive })
    }
}

fn low_mean(series: &RateSeries) -> Option<PencePerKilowattHour> {
    series.iter().map(|slot| slot.price).filter(|price| *price < LOW_RATE).mean()
}
