//! GeoSector - Grid decomposition and sector coverage analysis
//!
//! This library tiles a geographic region into a grid of approximately
//! equal-area squares, anchors great-circle sector fans at the square
//! corners, and records which corners fall inside which sectors. Results
//! are written through an injected [`store::Store`].
//!
//! # High-Level API
//!
//! For most use cases, the [`analysis`] module runs every stage in order:
//!
//! ```ignore
//! use geosector::analysis::{AnalysisConfig, Analyzer};
//! use geosector::feature::{load_features, region_from_features};
//!
//! let features = load_features(path)?;
//! let region = region_from_features(&features)?;
//! let analyzer = Analyzer::new(region, store, logger, AnalysisConfig::default())
//!     .with_features(features);
//! let report = analyzer.run()?;
//! ```

pub mod analysis;
pub mod config;
pub mod coord;
pub mod coverage;
pub mod export;
pub mod feature;
pub mod grid;
pub mod log;
pub mod logging;
pub mod region;
pub mod sector;
pub mod store;

/// Version of the GeoSector library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
