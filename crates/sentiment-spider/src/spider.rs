use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::logger::Logger;
use crate::sentiment::{process_batch, Tally};
use crate::tui::day_progress;
use chrono::{Datelike, NaiveDate};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, info, trace};

pub const YEAR: i32 = 2023;

/// April through June.
pub const MONTHS: RangeInclusive<u32> = 4..=6;

/// Harvest every day of [`MONTHS`] in [`YEAR`], then report and "store" the tally.
///
/// A transport failure aborts the run; everything else is logged and skipped.
pub async fn run<L: Logger>(config: &Config, logger: Arc<L>, tui: bool) -> anyhow::Result<Tally> {
    let time = std::time::Instant::now();

    let fetcher = Fetcher::new(config.http_client()?, logger);
    let tally = Tally::new();

    harvest(&fetcher, &config.api_url, &harvest_dates(), &tally, tui).await?;
    dump(&tally, fetcher.logger()).await?;
    store(&tally, fetcher.logger()).await?;

    info!(
        "sentiment harvest finished, time elapsed: {:?}",
        time.elapsed()
    );

    Ok(tally)
}

/// Fetch and aggregate each date in order.
pub async fn harvest<L: Logger>(
    fetcher: &Fetcher<L>,
    base_url: &str,
    dates: &[NaiveDate],
    tally: &Tally,
    tui: bool,
) -> anyhow::Result<()> {
    let pb = day_progress(dates.len(), tui)?;

    for date in dates {
        pb.set_message(format!("harvesting {date} ..."));
        let url = day_url(base_url, *date);

        let body = fetcher.fetch(&url).await?;
        let summary = process_batch(&body, tally, fetcher.logger()).await?;
        debug!(
            "{date}: {} entries saved, {} skipped",
            summary.saved, summary.skipped
        );

        pb.inc(1);
    }

    pb.finish_and_clear();
    if tui {
        println!("harvesting sentiment ... done");
    }

    Ok(())
}

/// Write both aggregates to the log sink.
pub async fn dump<L: Logger>(tally: &Tally, logger: &L) -> anyhow::Result<()> {
    logger.log("\nTicker counts:").await?;
    for (ticker, count) in tally.counts().await {
        logger
            .log(&format!("Ticker: {ticker}, Records Count: {count}"))
            .await?;
    }

    logger.log("\nTicker records:").await?;
    for record in tally.records().await.values() {
        logger.log(&record.to_string()).await?;
    }

    Ok(())
}

/// Placeholder for persisting the tally; nothing is written anywhere.
pub async fn store<L: Logger>(tally: &Tally, logger: &L) -> anyhow::Result<()> {
    trace!(
        "store called with {} ticker counts and {} records",
        tally.counts().await.len(),
        tally.records().await.len()
    );
    logger
        .log("\nStoring ticker counts and records (placeholder, nothing persisted).")
        .await?;
    Ok(())
}

/// Every date of the harvest window, in order.
pub fn harvest_dates() -> Vec<NaiveDate> {
    MONTHS
        .flat_map(|month| days_of_month(YEAR, month))
        .collect()
}

/// All days of `month` in `year`; empty for an invalid month.
pub fn days_of_month(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |date| date.month() == month && date.year() == year)
}

/// `<base>?date=YYYY-MM-DD`
pub fn day_url(base_url: &str, date: NaiveDate) -> String {
    format!("{base_url}?date={}", date.format("%Y-%m-%d"))
}
