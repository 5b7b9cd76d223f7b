//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use geosector::analysis::AnalysisError;
use geosector::config::ConfigFileError;
use geosector::export::ExportError;
use geosector::feature::FeatureError;
use geosector::region::RegionError;
use geosector::store::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Boundary file could not be read or parsed
    Input(FeatureError),
    /// Boundary geometry is unusable
    Region(RegionError),
    /// Analysis stopped
    Analysis(AnalysisError),
    /// Results file could not be read or written
    Results { path: PathBuf, error: StoreError },
    /// GeoJSON export failed
    Export { path: PathBuf, error: ExportError },
    /// Run statistics could not be rendered as JSON
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Analysis(AnalysisError::Persistence { .. }) = self {
            eprintln!();
            eprintln!("The run stopped at the first store failure because the error policy is");
            eprintln!("'strict'. Run without --strict, or set persistence.error_policy to");
            eprintln!("'continue', to log failed records and keep going.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Input(e) => write!(f, "Failed to load boundary: {}", e),
            CliError::Region(e) => write!(f, "Failed to build region: {}", e),
            CliError::Analysis(e) => write!(f, "Analysis failed: {}", e),
            CliError::Results { path, error } => {
                write!(f, "Results file '{}': {}", path.display(), error)
            }
            CliError::Export { path, error } => {
                write!(f, "Failed to export '{}': {}", path.display(), error)
            }
            CliError::Output(e) => write!(f, "Failed to format results: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Input(e) => Some(e),
            CliError::Region(e) => Some(e),
            CliError::Analysis(e) => Some(e),
            CliError::Results { error, .. } => Some(error),
            CliError::Export { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<FeatureError> for CliError {
    fn from(e: FeatureError) -> Self {
        CliError::Input(e)
    }
}

impl From<RegionError> for CliError {
    fn from(e: RegionError) -> Self {
        CliError::Region(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

impl From<AnalysisError> for CliError {
    fn from(e: AnalysisError) -> Self {
        CliError::Analysis(e)
    }
}
