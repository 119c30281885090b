//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes to stderr and to a
//! size-rotated file under the given log directory, and keeps the most
//! recent formatted lines in memory. Records emitted through the `log`
//! crate are bridged into the same subscriber.

mod ring_buffer;
mod writer;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub use ring_buffer::RingBuffer;
pub use writer::{RollingFileWriter, RollingPolicy};

/// Lines kept in memory for [`recent_lines`].
const RECENT_CAPACITY: usize = 500;

static RECENT: OnceLock<Arc<RingBuffer>> = OnceLock::new();

#[derive(Debug)]
pub enum LoggerError {
    Io(std::io::Error),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "logger already initialized"),
            LoggerError::NotInitialized => write!(f, "logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<std::io::Error> for LoggerError {
    fn from(e: std::io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Initialize logging with the default rotation policy.
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, RollingPolicy::default())
}

/// Initialize logging. The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logger_with(
    log_dir: impl Into<PathBuf>,
    app_name: &str,
    policy: RollingPolicy,
) -> Result<(), LoggerError> {
    if RECENT.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let recent = Arc::new(RingBuffer::new(RECENT_CAPACITY));
    let file_writer = RollingFileWriter::new(log_dir, app_name, policy, recent.clone())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    RECENT
        .set(recent)
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    tracing::info!(
        app = app_name,
        started = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "logging initialized"
    );
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    if RECENT.get().is_some() {
        Ok(())
    } else {
        Err(LoggerError::NotInitialized)
    }
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}

/// The last `n` lines written to the log file, oldest first.
pub fn recent_lines(n: usize) -> Vec<String> {
    RECENT.get().map(|r| r.recent(n)).unwrap_or_default()
}
