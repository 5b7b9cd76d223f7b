//! Logger that discards everything.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Discards all messages. Default for library callers that do not care.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_logger_as_shared_trait_object() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
        crate::log_info!(logger, "stage {} done", "grid");
        crate::log_error!(logger, "failed to create {}", "square");
    }
}
