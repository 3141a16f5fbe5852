//! Operator-visible diagnostics.
//!
//! The engine never talks to a logging backend directly; everything an
//! operator needs to see goes through an [`EventRecorder`]. The default
//! recorder forwards to the `log` facade, while [`MemoryRecorder`] keeps the
//! events for embedding hosts and tests.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{error, info};

/// Severity of a recorded event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Sink for operator-visible events
pub trait EventRecorder: Send + Sync {
    fn record(&self, severity: Severity, code: u32, message: &str);
}

/// Recorder that writes every event through the `log` facade.
pub struct LogRecorder {
    source: String,
}

impl LogRecorder {
    /// Create a recorder tagging events with the local host name
    pub fn new() -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown-host".to_string());
        Self::with_source(&host)
    }

    pub fn with_source(source: &str) -> Self {
        LogRecorder {
            source: source.to_string(),
        }
    }
}

impl Default for LogRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRecorder for LogRecorder {
    fn record(&self, severity: Severity, code: u32, message: &str) {
        match severity {
            Severity::Info => info!("[{}] [{}] {}", self.source, code, message),
            Severity::Error => error!("[{}] [{}] {}", self.source, code, message),
        }
    }
}

/// A single recorded event
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub severity: Severity,
    pub code: u32,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

/// Recorder that keeps events in memory.
#[derive(Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Events of the given severity
    pub fn with_severity(&self, severity: Severity) -> Vec<RecordedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity == severity)
            .collect()
    }
}

impl EventRecorder for MemoryRecorder {
    fn record(&self, severity: Severity, code: u32, message: &str) {
        let event = RecordedEvent {
            severity,
            code,
            message: message.to_string(),
            recorded_at: Utc::now(),
        };
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_recorder_keeps_order() {
        let recorder = MemoryRecorder::new();
        recorder.record(Severity::Info, 1982, "started");
        recorder.record(Severity::Error, 1983, "failed");

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].code, 1982);
        assert_eq!(events[1].severity, Severity::Error);
        assert_eq!(recorder.with_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn test_log_recorder_does_not_panic_without_logger() {
        let recorder = LogRecorder::with_source("test-host");
        recorder.record(Severity::Error, 1983, "no logger installed");
    }
}
