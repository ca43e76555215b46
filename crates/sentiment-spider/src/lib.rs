pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod rate_limiter;
pub mod sentiment;
pub mod spider;
mod tui;

/// Shortcut for required API elements.
pub mod http {
    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;
}
