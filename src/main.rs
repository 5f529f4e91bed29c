#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod statistics;
mod tables;

use chrono::Utc;
use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, SummaryArgs},
    core::{provider::RateSource, selector::Selector},
    prelude::*,
    statistics::Summary,
    tables::{
        build_daily_summary_table,
        build_overall_summary_table,
        build_period_rates_table,
        build_run_table,
        build_series_table,
    },
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    let selector = Selector::new(args.octopus.new_client());
    let area = selector.source().area();
    info!(%area, region = area.description(), product = %selector.source().product(), "configured");

    match args.command {
        Command::Rates(args) => {
            let series = args.fetch(selector.source())?;
            println!("{}", build_series_table(&series));
        }
        Command::Below(args) => {
            let series = args.series.fetch(selector.source())?;
            println!("{}", build_series_table(&series.below_threshold(args.limit)));
        }
        Command::Cheapest(args) => {
            let series = args.series.fetch(selector.source())?;
            let selection = selector.select_cheapest(&series, args.count, &args.requirements)?;
            println!("{}", build_series_table(&selection.into_chronological()));
        }
        Command::Priciest(args) => {
            let series = args.series.fetch(selector.source())?;
            let selection = series.most_expensive(args.count)?;
            println!("{}", build_series_table(&selection.into_chronological()));
        }
        Command::Run(args) => {
            let series = args.series.fetch(selector.source())?;
            let n_slots = args.n_slots();
            match series.cheapest_run(n_slots) {
                Some(run) => println!("{}", build_run_table(&run, n_slots)),
                None => warn!(n_slots, len = series.len(), "no complete run fits into the rates"),
            }
        }
        Command::Now => {
            println!("{}", build_period_rates_table(&selector.period_rates(Utc::now())?));
        }
        Command::Summary(args) => {
            summary(selector.source(), &args)?;
        }
    }

    info!("done!");
    Ok(())
}

#[instrument(skip_all, fields(n_days = args.days))]
fn summary(source: &impl RateSource, args: &SummaryArgs) -> Result {
    let summary = Summary::fetch(source, Utc::now().date_naive(), args.days)?;
    if args.daily {
        println!("{}", build_daily_summary_table(&summary));
    }
    println!("{}", build_overall_summary_table(&summary, args.daily_load, args.reference_rate));
    Ok(())
}
