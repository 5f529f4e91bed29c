use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{
        period::Period,
        series::{CheapestRun, RateSeries},
        slot::Slot,
    },
    quantity::rate::PencePerKilowattHour,
    statistics::{N_RUN_SLOTS, Summary},
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn rate_cell(rate: PencePerKilowattHour) -> Cell {
    Cell::new(format!("{rate:.2}")).set_alignment(CellAlignment::Right)
}

/// Slots in the series order, rates above the median in red.
#[must_use]
pub fn build_series_table(series: &RateSeries) -> Table {
    let median_rate = series.median_price().unwrap_or(PencePerKilowattHour::ZERO);

    let mut table = new_table();
    table.set_header(vec!["Start", "End", "Rate"]);
    for slot in series {
        let interval = slot.interval();
        table.add_row(vec![
            Cell::new(interval.start.format(TIME_FORMAT)),
            Cell::new(interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            rate_cell(slot.price).fg(if slot.price > median_rate {
                Color::Red
            } else {
                Color::Green
            }),
        ]);
    }
    table
}

#[must_use]
pub fn build_run_table(run: &CheapestRun, n_slots: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Start", "End", "Mean rate"]);
    let n_slots = i32::try_from(n_slots).unwrap_or(i32::MAX);
    table.add_row(vec![
        Cell::new(run.start.format(TIME_FORMAT)),
        Cell::new((run.start + Slot::DURATION * n_slots).format(TIME_FORMAT)),
        rate_cell(run.mean_price),
    ]);
    table
}

#[must_use]
pub fn build_period_rates_table(rates: &[(Period, Option<PencePerKilowattHour>)]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Rate"]);
    for (period, rate) in rates {
        table.add_row(vec![
            Cell::new(period),
            rate.map_or_else(
                || Cell::new("not published").add_attribute(Attribute::Dim),
                rate_cell,
            ),
        ]);
    }
    table
}

#[must_use]
pub fn build_daily_summary_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Day",
        "Mean",
        "Low mean",
        "Min",
        "Max",
        "Cheapest 4h start",
        "Cheapest 4h mean",
        "Cheapest slots",
    ]);
    for day in &summary.days {
        table.add_row(vec![
            Cell::new(day.on),
            rate_cell(day.mean),
            day.low_mean.map_or_else(|| Cell::new("-"), rate_cell),
            rate_cell(day.min).fg(Color::Green),
            rate_cell(day.max).fg(Color::Red),
            day.cheapest_run
                .map_or_else(|| Cell::new("-"), |run| Cell::new(run.start.format("%H:%M"))),
            day.cheapest_run.map_or_else(|| Cell::new("-"), |run| rate_cell(run.mean_price)),
            Cell::new(
                day.cheapest
                    .clone()
                    .into_chronological()
                    .iter()
                    .map(|slot| slot.start.format("%H:%M"))
                    .join(" "),
            ),
        ]);
    }
    table
}

/// Overall figures, including what a daily load costs when run in the cheapest window.
#[must_use]
pub fn build_overall_summary_table(
    summary: &Summary,
    daily_load_kilowatt_hours: f64,
    reference_rate: PencePerKilowattHour,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Days"), Cell::new(summary.days.len())]);
    table.add_row(vec![Cell::new("Mean rate"), rate_cell(summary.mean)]);
    table.add_row(vec![
        Cell::new("Low mean rate"),
        summary.low_mean.map_or_else(|| Cell::new("-"), rate_cell),
    ]);
    if let Some(run_rate) = summary.mean_run_price {
        let run_cost = run_rate.cost_of(daily_load_kilowatt_hours);
        table.add_row(vec![
            Cell::new(format!("Mean {}h run rate", N_RUN_SLOTS / 2)),
            Cell::new(format!(
                "{run_rate:.2} ({run_cost:.2}/day, {:.2}/year)",
                run_cost.per_year(),
            )),
        ]);
    }
    let reference_cost = reference_rate.cost_of(daily_load_kilowatt_hours);
    table.add_row(vec![
        Cell::new("Reference rate"),
        Cell::new(format!(
            "{reference_rate:.2} ({reference_cost:.2}/day, {:.2}/year)",
            reference_cost.per_year(),
        )),
    ]);
    table.add_row(vec![
        Cell::new("Min rate"),
        Cell::new(format!(
            "{} {:.2}",
            summary.cheapest.start.format(TIME_FORMAT),
            summary.cheapest.price,
        ))
        .fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Max rate"),
        Cell::new(format!(
            "{} {:.2}",
            summary.most_expensive.start.format(TIME_FORMAT),
            summary.most_expensive.price,
        ))
        .fg(Color::Red),
    ]);
    table
}
