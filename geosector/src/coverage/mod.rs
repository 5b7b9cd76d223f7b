//! Coverage analyzer.
//!
//! Decides which grid vertices fall inside which sectors. Each sector's
//! bounding box is looked up in an R-tree of vertex points first, so only
//! nearby vertices reach the exact point-in-polygon test. Sectors are
//! processed in parallel; results keep input order.

mod analyzer;
mod index;

pub use analyzer::{CoverageAnalyzer, CoverageSummary};
