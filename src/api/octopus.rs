//! [Octopus Energy](https://developer.octopus.energy/rest/) public tariff API client.

mod area;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;
use ureq::Agent;

pub use self::area::AreaCode;
use crate::{
    api::client,
    core::{provider::RateSource, series::RateSeries, slot::Slot},
    prelude::*,
    quantity::rate::PencePerKilowattHour,
};

pub const DEFAULT_BASE_URL: &str = "https://api.octopus.energy/v1/products";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum, derive_more::Display)]
pub enum Product {
    /// Agile import tariff.
    #[default]
    #[display("AGILE-18-02-21")]
    Agile,

    /// Agile Outgoing export tariff.
    #[display("AGILE-OUTGOING-19-05-13")]
    AgileOutgoing,
}

#[derive(bon::Builder)]
pub struct Api {
    #[builder(default = client::new())]
    agent: Agent,

    #[builder(default = DEFAULT_BASE_URL.to_owned())]
    base_url: String,

    #[builder(default)]
    product: Product,

    area: AreaCode,
}

impl Api {
    pub const fn area(&self) -> AreaCode {
        self.area
    }

    pub const fn product(&self) -> Product {
        self.product
    }

    pub fn tariff_code(&self) -> String {
        format!("E-1R-{}-{}", self.product, self.area)
    }

    fn standard_unit_rates_url(
        &self,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> String {
        let mut url = format!(
            "{}/{}/electricity-tariffs/{}/standard-unit-rates/?period_from={}",
            self.base_url.trim_end_matches('/'),
            self.product,
            self.tariff_code(),
            since.format(TIMESTAMP_FORMAT),
        );
        if let Some(until) = until {
            url = format!("{url}&period_to={}", until.format(TIMESTAMP_FORMAT));
        }
        url
    }
}

impl RateSource for Api {
    /// Fetch the rates following the pagination, newest-first pages are re-ordered chronologically.
    #[instrument(skip_all, fields(tariff = %self.tariff_code(), since = %since, until = ?until))]
    fn fetch(&self, since: DateTime<Utc>, until: Option<DateTime<Utc>>) -> Result<RateSeries> {
        let mut next_url = Some(self.standard_unit_rates_url(since, until));
        let mut unit_rates = Vec::new();
        while let Some(url) = next_url.take() {
            debug!(%url, "fetching…");
            let page = self
                .agent
                .get(url.as_str())
                .call()
                .with_context(|| format!("failed to call `{url}`"))?
                .body_mut()
                .read_json::<Page>()
                .context("failed to deserialize the response")?;
            unit_rates.extend(page.results);
            next_url = page.next;
        }
        info!(n_rates = unit_rates.len(), "fetched");
        unit_rates.sort_by_key(|unit_rate| unit_rate.valid_from);
        Ok(unit_rates
            .into_iter()
            .map(|unit_rate| Slot::new(unit_rate.valid_from, unit_rate.value_inc_vat))
            .collect())
    }
}

#[serde_as]
#[derive(Deserialize)]
struct Page {
    next: Option<String>,

    #[serde_as(as = "serde_with::VecSkipError<_>")]
    results: Vec<UnitRate>,
}

#[derive(Deserialize)]
struct UnitRate {
    /// Pence per kilowatt-hour, including VAT.
    value_inc_vat: PencePerKilowattHour,

    valid_from: DateTime<Utc>,
}
