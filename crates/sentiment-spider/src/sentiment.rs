use crate::error::{RecordError, SinkError};
use crate::logger::Logger;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::Mutex;
use tracing::trace;

/// Running sentiment for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerRecord {
    ticker: String,
    sentiment: Option<String>,
    comment_count: u64,
}

impl TickerRecord {
    /// Fails with [`RecordError::EmptyTicker`] when `ticker` is empty.
    pub fn new(
        ticker: impl Into<String>,
        sentiment: Option<String>,
        comment_count: u64,
    ) -> Result<Self, RecordError> {
        let ticker = ticker.into();
        if ticker.is_empty() {
            return Err(RecordError::EmptyTicker);
        }
        Ok(Self {
            ticker,
            sentiment,
            comment_count,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn sentiment(&self) -> Option<&str> {
        self.sentiment.as_deref()
    }

    pub fn comment_count(&self) -> u64 {
        self.comment_count
    }

    /// Fold a later record for the same ticker into this one: the sentiment is
    /// replaced, comments are summed (saturating at `u64::MAX`).
    fn absorb(&mut self, newer: TickerRecord) {
        self.sentiment = newer.sentiment;
        self.comment_count = self.comment_count.saturating_add(newer.comment_count);
    }
}

impl fmt::Display for TickerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticker: {}, Sentiment: {}, Comments: {}",
            self.ticker,
            self.sentiment().unwrap_or_default(),
            self.comment_count
        )
    }
}

/// Ticker → number of entries that mentioned it.
pub type TickerCounts = BTreeMap<String, u64>;

/// Ticker → latest sentiment and cumulative comments.
pub type TickerRecords = BTreeMap<String, TickerRecord>;

/// Both aggregates for a run. Entries are only ever inserted or updated.
#[derive(Debug, Default)]
pub struct Tally {
    counts: Mutex<TickerCounts>,
    records: Mutex<TickerRecords>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more mention of `ticker`, returning the new total.
    pub async fn save_ticker(&self, ticker: &str) -> u64 {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(ticker.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Insert `record`, or fold it into the record already held for its ticker.
    pub async fn save_record(&self, record: TickerRecord) {
        let mut records = self.records.lock().await;
        match records.get_mut(record.ticker()) {
            Some(existing) => existing.absorb(record),
            None => {
                records.insert(record.ticker.clone(), record);
            }
        }
    }

    pub async fn counts(&self) -> TickerCounts {
        self.counts.lock().await.clone()
    }

    pub async fn records(&self) -> TickerRecords {
        self.records.lock().await.clone()
    }
}

/// Outcome of one [`process_batch`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub skipped: usize,
}

// de
// ----------------------------------------------------------------------------

// each element of the response array looks like:
// `{ "no_of_comments": 179, "sentiment": "Bullish", "sentiment_score": 0.1, "ticker": "GME" }`
#[derive(Debug, Deserialize)]
struct Entry {
    ticker: Option<String>,
    sentiment: Option<String>,
    no_of_comments: Option<u64>,
}

impl Entry {
    fn into_record(self) -> Result<TickerRecord, RecordError> {
        TickerRecord::new(
            self.ticker.unwrap_or_default(),
            self.sentiment,
            self.no_of_comments.unwrap_or_default(),
        )
    }
}

// process
// ----------------------------------------------------------------------------

/// Parse one day's JSON array and fold every entry into `tally`.
///
/// A body that does not parse is logged once and leaves `tally` untouched. Entries
/// without a ticker are logged and skipped; the rest of the batch still counts.
/// The only error is a failing log sink.
pub async fn process_batch<L: Logger>(
    json: &str,
    tally: &Tally,
    logger: &L,
) -> Result<BatchSummary, SinkError> {
    let entries: Option<Vec<Option<Entry>>> = match serde_json::from_str(json) {
        Ok(entries) => entries,
        Err(err) => {
            logger
                .log(&format!("Error deserializing response: {err}"))
                .await?;
            return Ok(BatchSummary::default());
        }
    };

    let mut summary = BatchSummary::default();
    for entry in entries.into_iter().flatten().flatten() {
        let record = match entry.into_record() {
            Ok(record) => record,
            Err(err) => {
                logger.log(&format!("Skipped entry: {err}")).await?;
                summary.skipped += 1;
                continue;
            }
        };

        let count = tally.save_ticker(record.ticker()).await;
        trace!("{} seen {count} time(s)", record.ticker());
        logger
            .log(&format!("Saved Ticker: {}", record.ticker()))
            .await?;

        let message = format!(
            "Saved Record: Ticker - {}, Sentiment - {}, Comments - {}",
            record.ticker(),
            record.sentiment().unwrap_or_default(),
            record.comment_count()
        );
        tally.save_record(record).await;
        logger.log(&message).await?;

        summary.saved += 1;
    }

    Ok(summary)
}
