//! Logging abstraction used by the analysis pipeline.
//!
//! Components hold an `Arc<dyn Logger>` and write through the `log_*!`
//! macros. Which backend receives the records is decided by whoever builds
//! the pipeline:
//!
//! - [`TracingLogger`]: forwards to `tracing` (CLI runs)
//! - [`NoOpLogger`]: discards (library default)
//! - [`MemoryLogger`]: keeps records for assertions (tests)
//!
//! ```
//! use geosector::log::{Logger, MemoryLogger};
//! use geosector::log_info;
//! use std::sync::Arc;
//!
//! struct Stage {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! let memory = Arc::new(MemoryLogger::new());
//! let stage = Stage { logger: memory.clone() };
//! log_info!(stage.logger, "Generated {} sectors", 3);
//!
//! assert_eq!(memory.records().len(), 1);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
