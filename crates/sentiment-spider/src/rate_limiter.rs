use crate::error::SinkError;
use crate::logger::Logger;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Requests allowed per window.
pub const REQUESTS_PER_WINDOW: u32 = 60;

pub const WINDOW: Duration = Duration::from_secs(60);

/// Client-side request cap: at most `threshold` requests per `window`.
///
/// The window opens on the first [`acquire`](RateLimiter::acquire). Once `threshold`
/// requests have been issued inside it, the next caller sleeps out the remainder of
/// the window, after which a fresh window starts. A window that expires without
/// being filled also starts afresh.
///
/// Time comes from [`tokio::time::Instant`], so tests can drive the limiter with a
/// paused runtime clock.
#[derive(Debug)]
pub struct RateLimiter {
    threshold: u32,
    window: Duration,
    state: Mutex<Window>,
}

#[derive(Debug, Default)]
struct Window {
    started: Option<Instant>,
    count: u32,
}

impl Window {
    /// How long a request arriving at `now` has to wait, if at all.
    fn pending_wait(&mut self, now: Instant, threshold: u32, period: Duration) -> Option<Duration> {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        if elapsed >= period {
            self.reset(now);
            return None;
        }

        (self.count >= threshold).then(|| period - elapsed)
    }

    fn reset(&mut self, now: Instant) {
        self.started = Some(now);
        self.count = 0;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(REQUESTS_PER_WINDOW, WINDOW)
    }
}

impl RateLimiter {
    pub fn new(threshold: u32, window: Duration) -> Self {
        Self {
            threshold,
            window,
            state: Mutex::new(Window::default()),
        }
    }

    /// Wait until another request may be sent, then count it.
    ///
    /// Callers are served one at a time; a caller that has to wait holds the
    /// limiter for the duration of the wait.
    pub async fn acquire<L: Logger>(&self, logger: &L) -> Result<(), SinkError> {
        let mut state = self.state.lock().await;

        if let Some(wait) = state.pending_wait(Instant::now(), self.threshold, self.window) {
            logger
                .log(&format!(
                    "Rate limit reached. Waiting for {} seconds.",
                    wait.as_secs_f64()
                ))
                .await?;
            sleep(wait).await;
            state.reset(Instant::now());
        }

        state.count += 1;
        trace!("request {} of {} in window", state.count, self.threshold);
        Ok(())
    }

    /// Requests counted in the current window.
    pub async fn requests_in_window(&self) -> u32 {
        self.state.lock().await.count
    }
}
