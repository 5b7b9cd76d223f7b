//! Logger that keeps records in memory.

use std::fmt::Arguments;
use std::sync::Mutex;

use crate::log::{LogLevel, Logger};

/// Captures `(level, message)` pairs in arrival order.
///
/// Lets tests assert on what a pipeline stage reported, e.g. that a failed
/// store call was logged at error level.
///
/// ```
/// use geosector::log::{LogLevel, Logger, MemoryLogger};
/// use geosector::log_warn;
///
/// let logger = MemoryLogger::new();
/// log_warn!(logger, "region has {} parts", 2);
///
/// assert_eq!(logger.messages_at(LogLevel::Warn), vec!["region has 2 parts"]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records captured so far.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// True if any message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.messages_at(level)
            .iter()
            .any(|message| message.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        let message = args.to_string();
        match self.records.lock() {
            Ok(mut records) => records.push((level, message)),
            Err(poisoned) => poisoned.into_inner().push((level, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_records_in_order() {
        let logger = MemoryLogger::new();
        crate::log_info!(logger, "first");
        crate::log_error!(logger, "second {}", 2);

        assert_eq!(
            logger.records(),
            vec![
                (LogLevel::Info, "first".to_string()),
                (LogLevel::Error, "second 2".to_string()),
            ]
        );
        assert!(logger.contains(LogLevel::Error, "second"));
        assert!(!logger.contains(LogLevel::Info, "second"));
    }

    #[test]
    fn test_shared_across_threads() {
        let logger = Arc::new(MemoryLogger::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || crate::log_debug!(logger, "worker {}", i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(logger.messages_at(LogLevel::Debug).len(), 4);
    }
}
