#![allow(dead_code)]

use axum::Router;
use sentiment_spider::error::SinkError;
use sentiment_spider::logger::Logger;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Log sink that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.lines()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }
}

impl Logger for MemoryLogger {
    async fn log(&self, message: &str) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Serve `app` on an ephemeral localhost port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}
