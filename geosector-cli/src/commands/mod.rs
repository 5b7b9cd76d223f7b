//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`analyze`] - Grid, sectors and coverage for a boundary file
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`inspect`] - Features, bounds and extreme points of a boundary file
//! - [`report`] - Summarize or export a results file

pub mod analyze;
pub mod config;
pub mod inspect;
pub mod report;
