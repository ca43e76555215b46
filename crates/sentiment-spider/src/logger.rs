use crate::config::{Config, SinkKind};
use crate::error::SinkError;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, trace};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Append-only sink for human-readable progress lines.
///
/// Every message becomes exactly one line in the sink. Implementations must keep
/// concurrent writes from interleaving.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Writes each message to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    async fn log(&self, message: &str) -> Result<(), SinkError> {
        // stdout's lock is the critical section
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{message}{LINE_ENDING}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Appends each message to a file, one write at a time.
#[derive(Debug)]
pub struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    /// Open `path` for appending, creating the file and any missing parent
    /// directories first.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            trace!("checking log directory: {dir:?}");
            tokio::fs::create_dir_all(dir).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        debug!("file log sink opened at {path:?}");

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Logger for FileLogger {
    async fn log(&self, message: &str) -> Result<(), SinkError> {
        let mut file = self.file.lock().await;
        file.write_all(format!("{message}{LINE_ENDING}").as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }
}

/// The sink chosen once at startup, and handed to every component that logs.
#[derive(Debug)]
pub enum LogSink {
    Console(ConsoleLogger),
    File(FileLogger),
}

impl LogSink {
    pub async fn from_config(config: &Config) -> Result<Self, SinkError> {
        match config.sink {
            SinkKind::Console => Ok(LogSink::Console(ConsoleLogger)),
            SinkKind::File => Ok(LogSink::File(FileLogger::open(&config.log_path).await?)),
        }
    }

    pub fn kind(&self) -> SinkKind {
        match self {
            LogSink::Console(_) => SinkKind::Console,
            LogSink::File(_) => SinkKind::File,
        }
    }
}

impl Logger for LogSink {
    async fn log(&self, message: &str) -> Result<(), SinkError> {
        match self {
            LogSink::Console(logger) => logger.log(message).await,
            LogSink::File(logger) => logger.log(message).await,
        }
    }
}
