//! Persistence gateway for analysis results.
//!
//! The [`Store`] trait is the only contract the analysis pipeline has with
//! storage: create, list and bulk-delete per entity kind, plus the two
//! child-to-parent lookups. Records reference their parent by id instead of
//! holding object references:
//!
//! ```text
//! GridRecord ◄── SquareRecord.grid_id
//!                    ▲
//!                    └── VertexRecord.square_id
//!                            ▲
//!                            ├── SectorRecord.vertex_id
//!                            │       ▲
//!                            └───────┴── IntersectionRecord (sector_id, vertex_id)
//! ```
//!
//! # Thread Safety
//!
//! - Id allocation: one `AtomicU64` per entity kind
//! - Tables: `DashMap` (concurrent reads, per-shard write locks)
//! - Bulk deletes: exclusive over all tables
//!
//! [`MemoryStore`] is the bundled implementation. Its contents can be copied
//! out as a [`StoreSnapshot`] and written as JSON.

mod memory;
mod snapshot;
mod r#trait;
mod types;

pub use memory::MemoryStore;
pub use r#trait::Store;
pub use snapshot::StoreSnapshot;
pub use types::{
    EntityKind, FeatureId, FeatureRecord, GridId, GridRecord, IntersectionRecord, NewSector,
    SectorId, SectorRecord, SquareId, SquareRecord, StoreError, VertexId, VertexRecord,
};
