mod common;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use common::{serve, MemoryLogger};
use sentiment_spider::error::FetchError;
use sentiment_spider::fetcher::Fetcher;
use sentiment_spider::rate_limiter::RateLimiter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BODY: &str = r#"[{"ticker":"GME","sentiment":"Bullish","no_of_comments":10}]"#;

async fn throttled_once(State(hits): State<Arc<AtomicUsize>>) -> Response {
    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
        (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "2")],
            "slow down",
        )
            .into_response()
    } else {
        (StatusCode::OK, BODY).into_response()
    }
}

#[tokio::test]
async fn throttled_request_waits_then_returns_body() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/reddit", get(throttled_once))
        .with_state(hits.clone());
    let addr = serve(app).await;

    let logger = Arc::new(MemoryLogger::default());
    let fetcher = Fetcher::new(reqwest::Client::new(), logger.clone());

    let time = Instant::now();
    let body = fetcher
        .fetch(&format!("http://{addr}/reddit?date=2023-04-01"))
        .await
        .unwrap();

    assert!(time.elapsed() >= Duration::from_secs(2));
    assert_eq!(body, BODY);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(
        logger.lines(),
        vec!["Rate limit hit. Waiting for 2 seconds."]
    );
    // both attempts went through the limiter
    assert_eq!(fetcher.limiter().requests_in_window().await, 2);
}

#[tokio::test]
async fn error_statuses_pass_their_body_through() {
    let app = Router::new().route(
        "/reddit",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream broke") }),
    );
    let addr = serve(app).await;

    let logger = Arc::new(MemoryLogger::default());
    let fetcher = Fetcher::new(reqwest::Client::new(), logger.clone());

    let body = fetcher
        .fetch(&format!("http://{addr}/reddit"))
        .await
        .unwrap();
    assert_eq!(body, "upstream broke");
    assert!(logger.lines().is_empty());
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    // bind then drop, so nothing is listening on the port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let logger = Arc::new(MemoryLogger::default());
    let fetcher = Fetcher::new(reqwest::Client::new(), logger.clone());

    let err = fetcher
        .fetch(&format!("http://{addr}/reddit"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(logger.lines().is_empty());
}

#[tokio::test]
async fn custom_limiter_throttles_between_requests() {
    let app = Router::new().route("/reddit", get(|| async { BODY }));
    let addr = serve(app).await;

    let logger = Arc::new(MemoryLogger::default());
    let limiter = RateLimiter::new(1, Duration::from_secs(1));
    let fetcher = Fetcher::with_limiter(reqwest::Client::new(), limiter, logger.clone());
    let url = format!("http://{addr}/reddit?date=2023-04-02");

    let time = Instant::now();
    assert_eq!(fetcher.fetch(&url).await.unwrap(), BODY);
    assert_eq!(fetcher.fetch(&url).await.unwrap(), BODY);

    // the second request had to wait out the one-request window
    assert!(time.elapsed() >= Duration::from_secs(1));
    assert_eq!(logger.count_starting_with("Rate limit reached"), 1);
    assert_eq!(fetcher.limiter().requests_in_window().await, 1);
}
