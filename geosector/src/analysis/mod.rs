//! Analysis pipeline.
//!
//! Ties the stages together over one region and one store:
//!
//! ```text
//! features ──► grid (squares, vertices) ──► sectors ──► coverage
//! ```
//!
//! Each stage calls the store through [`PersistencePolicy::apply`], which
//! either logs and skips a failed record or stops the run, depending on
//! configuration.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use geo::{polygon, Geometry, Point};
//! use geosector::analysis::{AnalysisConfig, Analyzer, ReferenceCenter};
//! use geosector::log::NoOpLogger;
//! use geosector::region::Region;
//! use geosector::store::MemoryStore;
//!
//! let region = Region::load(vec![Geometry::Polygon(polygon![
//!     (x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0), (x: 0.0, y: 0.0),
//! ])]).unwrap();
//! let config = AnalysisConfig::default()
//!     .with_grid_size(1110.0)
//!     .with_center(ReferenceCenter::Fixed(Point::new(0.0, 0.0)));
//!
//! let analyzer = Analyzer::new(region, Arc::new(MemoryStore::new()), Arc::new(NoOpLogger), config);
//! let report = analyzer.run().unwrap();
//!
//! assert_eq!(report.stats.matching_squares, 1);
//! ```

mod analyzer;
mod config;
mod error;
mod policy;

pub use analyzer::{AnalysisReport, AnalysisStats, Analyzer};
pub use config::{AnalysisConfig, ReferenceCenter};
pub use error::AnalysisError;
pub use policy::{PersistencePolicy, PersistenceTally, Stage, StageOutput};
