//! Observability sink for notable steps of a ticket operation.
//!
//! Components never log through ambient state; they receive an
//! [`EventSink`] and report through it. The binary plugs in
//! [`TracingSink`], tests plug in [`RecordingSink`].

use std::fmt;
use std::sync::Mutex;

/// Severity of an emitted event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Success,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives events from the lifecycle core
pub trait EventSink {
    fn emit(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Forwards events to the global `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Success => tracing::info!(status = %level, "{}", message),
            Level::Warn => tracing::warn!("{}", message),
            Level::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at the given level
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, message.to_string()));
        }
    }
}
