use std::{
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
};

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::{
    core::{aggregate::Aggregate, error::SelectionError, slot::Slot},
    prelude::*,
    quantity::rate::PencePerKilowattHour,
};

/// Price series keyed by unique slot start time.
///
/// Insertion order is preserved: the data source inserts chronologically,
/// the selectors insert in the order they pick the slots.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, derive_more::Deref, derive_more::IntoIterator)]
#[into_iterator(owned, ref)]
pub struct RateSeries(Vec<Slot>);

/// Start of the cheapest contiguous run along with its mean price.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CheapestRun {
    pub start: DateTime<Utc>,
    pub mean_price: PencePerKilowattHour,
}

impl RateSeries {
    /// Insert the slot, replacing the price in place if its start time is already present.
    pub fn insert(&mut self, slot: Slot) {
        match self.0.iter_mut().find(|existing| existing.start == slot.start) {
            Some(existing) => existing.price = slot.price,
            None => self.0.push(slot),
        }
    }

    pub fn retain(&mut self, predicate: impl FnMut(&Slot) -> bool) {
        self.0.retain(predicate);
    }

    #[must_use]
    pub fn contains(&self, start: DateTime<Utc>) -> bool {
        self.0.iter().any(|slot| slot.start == start)
    }

    #[must_use]
    pub fn mean_price(&self) -> Option<PencePerKilowattHour> {
        self.0.iter().map(|slot| slot.price).mean()
    }

    #[must_use]
    pub fn median_price(&self) -> Option<PencePerKilowattHour> {
        self.0.iter().map(|slot| slot.price).median()
    }

    /// Same slots re-ordered by start time.
    pub fn into_chronological(mut self) -> Self {
        self.0.sort_by_key(|slot| slot.start);
        self
    }

    /// Slots priced at or below the limit, in the original order.
    pub fn below_threshold(&self, limit: PencePerKilowattHour) -> Self {
        Self(self.0.iter().filter(|slot| slot.price <= limit).copied().collect())
    }

    /// Select the `n` cheapest slots without replacement.
    ///
    /// Equally priced slots are picked in the series order. The result is ordered by price.
    pub fn cheapest(&self, n: usize) -> Result<Self> {
        self.select(n, |lhs, rhs| lhs.price.cmp(&rhs.price))
    }

    /// Select the `n` most expensive slots without replacement.
    ///
    /// Equally priced slots are picked in the series order. The result is ordered by price, descending.
    pub fn most_expensive(&self, n: usize) -> Result<Self> {
        self.select(n, |lhs, rhs| rhs.price.cmp(&lhs.price))
    }

    /// Repeatedly pick the first extreme among the remaining indices.
    ///
    /// Stable sorting of the index set yields exactly the same picks.
    fn select(&self, n: usize, compare: impl Fn(&Slot, &Slot) -> Ordering) -> Result<Self> {
        if n > self.0.len() {
            bail!(SelectionError::Unsatisfiable { requested: n, available: self.0.len() });
        }
        Ok(Self(
            (0..self.0.len())
                .sorted_by(|&lhs, &rhs| compare(&self.0[lhs], &self.0[rhs]))
                .take(n)
                .map(|index| self.0[index])
                .collect(),
        ))
    }

    /// Find the earliest run of `n_slots` consecutive slots with the lowest mean price.
    ///
    /// The scan stops at the first start which leaves fewer than `n_slots` slots till the end,
    /// and returns the best run seen so far. Returns [`None`] when no complete run fits.
    #[must_use]
    pub fn cheapest_run(&self, n_slots: usize) -> Option<CheapestRun> {
        if n_slots == 0 {
            return None;
        }
        let mut best: Option<CheapestRun> = None;
        for (index, slot) in self.0.iter().enumerate() {
            let Some(window) = self.0.get(index..index + n_slots) else {
                break;
            };
            let mean_price = window.iter().map(|slot| slot.price).mean()?;
            if best.is_none_or(|best| mean_price < best.mean_price) {
                best = Some(CheapestRun { start: slot.start, mean_price });
            }
        }
        best
    }
}

impl FromIterator<Slot> for RateSeries {
    fn from_iter<T: IntoIterator<Item = Slot>>(iter: T) -> Self {
        let mut series = Self::default();
        series.extend(iter);
        series
    }
}

impl Extend<Slot> for RateSeries {
    fn extend<T: IntoIterator<Item = Slot>>(&mut self, iter: T) {
        let mut indices: HashMap<DateTime<Utc>, usize> =
            self.0.iter().enumerate().map(|(index, slot)| (slot.start, index)).collect();
        for slot in iter {
            match indices.entry(slot.start) {
                Entry::Occupied(entry) => self.0[*entry.get()].price = slot.price,
                Entry::Vacant(entry) => {
                    entry.insert(self.0.len());
                    self.0.push(slot);
                }
            }
        }
    }
}

#[cfg(test)]
impl RateSeries {
    /// Build a contiguous half-hourly series starting at the timestamp.
    pub fn from_prices(start: DateTime<Utc>, prices: &[f64]) -> Self {
        (0..)
            .zip(prices)
            .map(|(index, price)| {
                Slot::new(start + Slot::DURATION * index, PencePerKilowattHour(*price))
            })
            .collect()
    }

    pub fn starts(&self) -> Vec<DateTime<Utc>> {
        self.0.iter().map(|slot| slot.start).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.0.iter().map(|slot| slot.price.0).collect()
    }
}
