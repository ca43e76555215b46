use sentiment_spider::config::{Config, SinkKind};
use sentiment_spider::logger::LogSink;
use sentiment_spider::spider;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Open the configured log sink and run the sentiment harvest.
pub(crate) async fn run(tui: bool) -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|err| {
        error!("invalid configuration, error({err})");
        err
    })?;
    trace!("configuration: {config:?}");

    let sink = LogSink::from_config(&config).await.map_err(|err| {
        error!(
            "failed to open log sink at {:?}, error({err})",
            config.log_path
        );
        err
    })?;
    debug!("log sink established: {:?}", sink.kind());

    // a progress bar would tear the console sink's lines apart
    let tui = tui && sink.kind() == SinkKind::File;

    let tally = spider::run(&config, Arc::new(sink), tui).await?;
    info!(
        "{} tickers collected from {}",
        tally.counts().await.len(),
        config.api_url
    );

    Ok(())
}
