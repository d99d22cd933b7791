//! Console logging for pipeline runs.
//!
//! Stage progress is printed as prefixed lines; the machine-readable
//! outcome of a run lives in [`crate::models::ExecutionLog`], never in
//! console text.

use serde::{Deserialize, Serialize};

/// Log level for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into() }
    }

    /// Print this entry to stdout with its level prefix.
    pub fn emit(&self) {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠",
            LogLevel::Error => "   ✗",
        };
        println!("{} {}", prefix, self.message);
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::error(msg).emit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        let entry = LogEntry::warning("3 rows dropped");
        assert!(matches!(entry.level, LogLevel::Warning));
        assert_eq!(entry.message, "3 rows dropped");
    }

    #[test]
    fn test_level_serialization() {
        let entry = LogEntry::success("done");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"level\":\"success\""));
    }
}
