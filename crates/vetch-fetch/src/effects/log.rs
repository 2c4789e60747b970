use std::fmt;

/// Message severity, numbered 1 (informational) to 3 (error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl Severity {
    pub fn level(self) -> u8 { self as u8 }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Sink for pipeline transitions: attempt start/end, verification results,
/// cleanup.
///
/// Logging is infallible by signature so a broken sink can never abort a
/// download; implementations swallow their own failures.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str, severity: Severity, source: &str);
}

/// Default [`Logger`] that forwards to `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str, severity: Severity, source: &str) {
        match severity {
            Severity::Info => tracing::info!(source, "{message}"),
            Severity::Warning => tracing::warn!(source, "{message}"),
            Severity::Error => tracing::error!(source, "{message}"),
        }
    }
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn log(&self, message: &str, severity: Severity, source: &str) {
        (**self).log(message, severity, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_levels() {
        assert_eq!(Severity::Info.level(), 1);
        assert_eq!(Severity::Warning.level(), 2);
        assert_eq!(Severity::Error.level(), 3);
        assert!(Severity::Error > Severity::Info);
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // no subscriber installed: events are dropped, nothing panics
        TracingLogger.log("attempt 1 of 3", Severity::Info, "retry");
        TracingLogger.log("cleanup failed", Severity::Error, "retry");
    }
}
