//! Severity-tagged structured logging, threaded through every call via [`crate::context::HostSession`].

use std::fmt::Display;

/// Severity of a single log message.
///
/// Ordered from least to most severe so a [`Logger`] can filter by a minimum
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Verbose diagnostic intended for tracing calls across the host/manager boundary.
    DebugApi,
    /// General debugging detail.
    Debug,
    /// Informational message, no action required.
    Info,
    /// Unexpected condition that does not prevent the current call from succeeding.
    Warning,
    /// A recoverable error local to the current call.
    Error,
    /// An error severe enough that the caller should consider the session unusable.
    Critical,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::DebugApi => "debugApi",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        write!(f, "{name}")
    }
}

/// A severity-tagged structured log sink.
///
/// The core never selects a concrete implementation; the host supplies one as
/// part of the [`crate::context::HostSession`] passed into every manager call.
pub trait Logger: Send + Sync {
    /// Emit a single message at the given severity.
    fn log(&self, severity: Severity, message: &str);
}

/// A [`Logger`] that discards every message.
///
/// Useful as a default when a host has not configured logging, and in tests
/// where log output is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _severity: Severity, _message: &str) {}
}

/// A [`Logger`] that writes to stderr, filtering anything below a configured
/// minimum severity.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    min_severity: Severity,
}

impl ConsoleLogger {
    /// Creates a logger that prints every message at or above `min_severity`.
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, severity: Severity, message: &str) {
        if severity < self.min_severity {
            return;
        }
        eprintln!("[{severity}] {message}");
    }
}
