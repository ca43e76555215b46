use clap::{Parser, ValueEnum};

/// Harvest daily Reddit sentiment for stock tickers, April to June 2023.
///
/// Endpoint, log sink and log path come from the environment (or `.env`):
/// SENTIMENT_API_URL, SENTIMENT_LOG_SINK, SENTIMENT_LOG_PATH, USER_AGENT.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sets the level of tracing.
    ///
    /// Without a level, a progress bar is shown instead.
    #[arg(short, long)]
    pub trace: Option<TraceLevel>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
