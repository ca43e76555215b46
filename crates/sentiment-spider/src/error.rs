use thiserror::Error;

/// A sentiment entry that cannot become a [`TickerRecord`].
///
/// [`TickerRecord`]: crate::sentiment::TickerRecord
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("ticker is missing or empty")]
    EmptyTicker,
}

/// Failure while fetching a day of sentiment data.
///
/// Throttling responses are retried inside the fetcher and never surface here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error, error({0})")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown log sink `{0}`, expected `console` or `file`")]
    UnknownSink(String),

    #[error("failed to build http client, error({0})")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log sink i/o error, error({0})")]
    Io(#[from] std::io::Error),
}
