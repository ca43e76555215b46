use crate::error::FetchError;
use crate::http::*;
use crate::logger::Logger;
use crate::rate_limiter::RateLimiter;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, trace, warn};

/// Wait used when a throttling response carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Rate-limited GET client for the sentiment endpoint.
///
/// Throttled (`429 Too Many Requests`) requests are retried after the server's
/// `Retry-After` delay, with no retry limit. Any other status is handed back to the
/// caller as-is; only transport failures are errors.
pub struct Fetcher<L> {
    http_client: HttpClient,
    limiter: RateLimiter,
    logger: Arc<L>,
}

impl<L: Logger> Fetcher<L> {
    pub fn new(http_client: HttpClient, logger: Arc<L>) -> Self {
        Self::with_limiter(http_client, RateLimiter::default(), logger)
    }

    pub fn with_limiter(http_client: HttpClient, limiter: RateLimiter, logger: Arc<L>) -> Self {
        Self {
            http_client,
            limiter,
            logger,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// GET `url` and return the response body as text.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        loop {
            self.limiter.acquire(self.logger.as_ref()).await?;

            trace!("GET {url}");
            let response = self.http_client.get(url).send().await.map_err(|err| {
                error!("failed to fetch {url}, error({err})");
                err
            })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(response.headers());
                self.logger
                    .log(&format!(
                        "Rate limit hit. Waiting for {} seconds.",
                        wait.as_secs()
                    ))
                    .await?;
                sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                warn!("{url} answered {status}; passing the body on regardless");
            } else {
                debug!("{url} answered {status}");
            }

            return Ok(response.text().await.map_err(|err| {
                error!("failed to read response body from {url}, error({err})");
                err
            })?);
        }
    }
}

/// Delay requested by a throttling response, in whole seconds.
fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
