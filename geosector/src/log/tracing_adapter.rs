//! Adapter from [`Logger`] to the `tracing` crate.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Forwards every record to `tracing` under the `geosector` target.
///
/// Output only appears once a subscriber is installed, normally by
/// [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "geosector", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "geosector", "{}", args),
            LogLevel::Info => tracing::info!(target: "geosector", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "geosector", "{}", args),
            LogLevel::Error => tracing::error!(target: "geosector", "{}", args),
        }
    }
}
