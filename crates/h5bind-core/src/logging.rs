//! Leveled, user-facing log policy
//!
//! [`Logger`] applies the verbosity threshold and the warnings-as-errors
//! promotion, hands surviving messages to a [`LogSink`], and reports back the
//! level the message was actually logged at. It never aborts anything itself:
//! callers that receive [`LogLevel::Severe`] turn it into
//! [`CoreError::FatalLog`] (see [`Logger::check`]).

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Message levels, most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Severe = 0,
    Warning = 1,
    Info = 2,
    Debug1 = 3,
    Debug2 = 4,
    Debug3 = 5,
}

impl LogLevel {
    /// Threshold for a numeric verbosity; values past `Debug3` saturate
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Severe,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug1,
            4 => LogLevel::Debug2,
            _ => LogLevel::Debug3,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Severe => "SEVERE",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug1 => "DEBUG1",
            LogLevel::Debug2 => "DEBUG2",
            LogLevel::Debug3 => "DEBUG3",
        }
    }

    pub fn is_severe(self) -> bool {
        self == LogLevel::Severe
    }

    /// The tracing level a message of this level is forwarded at
    pub fn tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Severe => tracing::Level::ERROR,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug1 => tracing::Level::DEBUG,
            LogLevel::Debug2 | LogLevel::Debug3 => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Destination of log messages that passed the threshold
pub trait LogSink: Send + Sync {
    fn emit(&self, level: LogLevel, message: &str);
}

/// Forwards messages to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Severe => tracing::error!(target: "h5bind", "{}: {}", level, message),
            LogLevel::Warning => tracing::warn!(target: "h5bind", "{}: {}", level, message),
            LogLevel::Info => tracing::info!(target: "h5bind", "{}: {}", level, message),
            LogLevel::Debug1 => tracing::debug!(target: "h5bind", "{}: {}", level, message),
            LogLevel::Debug2 | LogLevel::Debug3 => {
                tracing::trace!(target: "h5bind", "{}: {}", level, message)
            }
        }
    }
}

/// Keeps every message in memory; cloning shares the buffer
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.records()
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .count()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: LogLevel, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}

pub struct Logger {
    threshold: LogLevel,
    warnings_as_errors: bool,
    sink: Box<dyn LogSink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("warnings_as_errors", &self.warnings_as_errors)
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info, false)
    }
}

impl Logger {
    pub fn new(threshold: LogLevel, warnings_as_errors: bool) -> Self {
        Self::with_sink(threshold, warnings_as_errors, TracingSink)
    }

    pub fn with_sink(
        threshold: LogLevel,
        warnings_as_errors: bool,
        sink: impl LogSink + 'static,
    ) -> Self {
        Self {
            threshold,
            warnings_as_errors,
            sink: Box::new(sink),
        }
    }

    /// Report a message and return the level it was logged at, which is
    /// `Severe` for promoted warnings.
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) -> LogLevel {
        let mut effective = level;
        let mut message = message.to_string();

        if level == LogLevel::Warning && self.warnings_as_errors {
            effective = LogLevel::Severe;
            message.push_str(
                " (would normally be a warning, but warnings are treated as errors)",
            );
        }

        if effective <= self.threshold {
            self.sink.emit(effective, &message);
        }
        effective
    }

    /// Log a message and fail with [`CoreError::FatalLog`] if it ended up severe
    pub fn check(&self, level: LogLevel, message: impl fmt::Display) -> Result<(), CoreError> {
        let message = message.to_string();
        if self.log(level, &message).is_severe() {
            Err(CoreError::FatalLog(message))
        } else {
            Ok(())
        }
    }
}
