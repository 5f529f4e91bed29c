use chrono::{Days, Utc};
use clap::{Parser, Subcommand};

use crate::{
    api::octopus::{self, AreaCode, DEFAULT_BASE_URL, Product},
    core::{provider::RateSource, requirement::Requirement, series::RateSeries},
    prelude::*,
    quantity::rate::PencePerKilowattHour,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Log the outbound requests.
    #[clap(long, short)]
    pub verbose: bool,

    #[clap(flatten)]
    pub octopus: OctopusArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the rates.
    #[clap(name = "rates")]
    Rates(SeriesArgs),

    /// Show the slots priced at or below the limit.
    #[clap(name = "below")]
    Below(BelowArgs),

    /// Select the cheapest slots, optionally meeting the coverage requirements.
    #[clap(name = "cheapest")]
    Cheapest(CheapestArgs),

    /// Select the most expensive slots.
    #[clap(name = "priciest")]
    Priciest(PriciestArgs),

    /// Find the cheapest contiguous run of slots.
    #[clap(name = "run")]
    Run(RunArgs),

    /// Show the previous, current, and next period rates.
    #[clap(name = "now")]
    Now,

    /// Summarize the rates of the past days.
    #[clap(name = "summary")]
    Summary(SummaryArgs),
}

#[derive(Parser)]
pub struct OctopusArgs {
    /// Distribution Network Operator region letter, for example: `L`.
    #[clap(long = "area-code", env = "OCTOPUS_AREA_CODE")]
    pub area: AreaCode,

    #[clap(long, value_enum, default_value = "agile", env = "OCTOPUS_PRODUCT")]
    pub product: Product,

    /// Products API base URL.
    #[clap(long = "base-url", default_value = DEFAULT_BASE_URL, env = "OCTOPUS_BASE_URL")]
    pub base_url: String,
}

impl OctopusArgs {
    pub fn new_client(&self) -> octopus::Api {
        octopus::Api::builder()
            .area(self.area)
            .product(self.product)
            .base_url(self.base_url.clone())
            .build()
    }
}

#[derive(Parser)]
pub struct SeriesArgs {
    /// Take the entire UTC day that many days ago instead of the upcoming rates.
    #[clap(long = "days-ago")]
    pub days_ago: Option<u64>,
}

impl SeriesArgs {
    pub fn fetch(&self, source: &impl RateSource) -> Result<RateSeries> {
        let now = Utc::now();
        let series = match self.days_ago {
            Some(days_ago) => source.get_day_rates(
                now.date_naive()
                    .checked_sub_days(Days::new(days_ago))
                    .context("the date is out of range")?,
            )?,
            None => source.get_upcoming_rates(now)?,
        };
        info!(len = series.len(), "fetched the rates");
        Ok(series)
    }
}

#[derive(Parser)]
pub struct BelowArgs {
    #[clap(flatten)]
    pub series: SeriesArgs,

    /// Maximum rate in pence per kilowatt-hour, inclusive.
    #[clap(long)]
    pub limit: PencePerKilowattHour,
}

#[derive(Parser)]
pub struct CheapestArgs {
    #[clap(flatten)]
    pub series: SeriesArgs,

    /// Number of slots to select.
    #[clap(long, short = 'n')]
    pub count: usize,

    /// At least `SLOTS` selected slots must start strictly between `FROM` and `TO`.
    ///
    /// For example: `2@2020-04-15T19:00:00Z..2020-04-16T06:00:00Z`.
    #[clap(long = "requirement", value_name = "SLOTS@FROM..TO")]
    pub requirements: Vec<Requirement>,
}

#[derive(Parser)]
pub struct PriciestArgs {
    #[clap(flatten)]
    pub series: SeriesArgs,

    /// Number of slots to select.
    #[clap(long, short = 'n')]
    pub count: usize,
}

#[derive(Parser)]
pub struct RunArgs {
    #[clap(flatten)]
    pub series: SeriesArgs,

    /// Run duration in hours, rounded down to whole half-hours.
    #[clap(long, default_value = "4", value_parser = parse_run_hours)]
    pub hours: f64,
}

fn parse_run_hours(value: &str) -> Result<f64> {
    let hours: f64 = value.trim().parse().with_context(|| format!("`{value}` is not a number"))?;
    ensure!(hours.is_finite() && hours >= 0.5, "the run must last at least half an hour");
    Ok(hours)
}

impl RunArgs {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn n_slots(&self) -> usize {
        (self.hours * 2.0) as usize
    }
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Number of past days, including today.
    #[clap(long, default_value = "7")]
    pub days: u64,

    /// Print the per-day breakdown.
    #[clap(long)]
    pub daily: bool,

    /// Energy used daily by the load which runs in the cheapest window.
    #[clap(long = "daily-load-kwh", default_value = "7.738")]
    pub daily_load: f64,

    /// Flat rate to compare the costs against.
    #[clap(long = "reference-rate", default_value = "15.44")]
    pub reference_rate: PencePerKilowattHour,
}
