//! In-memory store implementation.
//!
//! Each entity kind lives in its own `DashMap` keyed by numeric id, so
//! concurrent readers and writers only contend per shard. Ids come from
//! per-table `AtomicU64` counters and are never handed out twice.
//!
//! # Consistency
//!
//! - Creates take the table-set lock for reading, deletes take it for writing.
//!   A child insert therefore never races with the removal of its parent.
//! - Parent existence is checked on every create (foreign-key semantics).
//! - Bulk deletes refuse to orphan children.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::{DashMap, DashSet};
use geo::{MultiPolygon, Point};

use super::r#trait::Store;
use super::snapshot::StoreSnapshot;
use super::types::{
    EntityKind, FeatureId, FeatureRecord, GridId, GridRecord, IntersectionRecord, NewSector,
    SectorId, SectorRecord, SquareId, SquareRecord, StoreError, VertexId, VertexRecord,
};

/// Thread-safe in-memory [`Store`].
pub struct MemoryStore {
    tables: RwLock<()>,
    next_feature: AtomicU64,
    next_grid: AtomicU64,
    next_square: AtomicU64,
    next_vertex: AtomicU64,
    next_sector: AtomicU64,
    features: DashMap<FeatureId, FeatureRecord>,
    grids: DashMap<GridId, GridRecord>,
    squares: DashMap<SquareId, SquareRecord>,
    vertices: DashMap<VertexId, VertexRecord>,
    sectors: DashMap<SectorId, SectorRecord>,
    intersections: DashSet<IntersectionRecord>,
}

impl MemoryStore {
    /// Create an empty store. The first id of every kind is 1.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(()),
            next_feature: AtomicU64::new(1),
            next_grid: AtomicU64::new(1),
            next_square: AtomicU64::new(1),
            next_vertex: AtomicU64::new(1),
            next_sector: AtomicU64::new(1),
            features: DashMap::new(),
            grids: DashMap::new(),
            squares: DashMap::new(),
            vertices: DashMap::new(),
            sectors: DashMap::new(),
            intersections: DashSet::new(),
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Id counters resume after the highest id of each kind.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();

        let max_feature = snapshot.features.iter().map(|r| r.id.0).max().unwrap_or(0);
        let max_grid = snapshot.grids.iter().map(|r| r.id.0).max().unwrap_or(0);
        let max_square = snapshot.squares.iter().map(|r| r.id.0).max().unwrap_or(0);
        let max_vertex = snapshot.vertices.iter().map(|r| r.id.0).max().unwrap_or(0);
        let max_sector = snapshot.sectors.iter().map(|r| r.id.0).max().unwrap_or(0);

        store.next_feature.store(max_feature + 1, Ordering::SeqCst);
        store.next_grid.store(max_grid + 1, Ordering::SeqCst);
        store.next_square.store(max_square + 1, Ordering::SeqCst);
        store.next_vertex.store(max_vertex + 1, Ordering::SeqCst);
        store.next_sector.store(max_sector + 1, Ordering::SeqCst);

        for record in snapshot.features {
            store.features.insert(record.id, record);
        }
        for record in snapshot.grids {
            store.grids.insert(record.id, record);
        }
        for record in snapshot.squares {
            store.squares.insert(record.id, record);
        }
        for record in snapshot.vertices {
            store.vertices.insert(record.id, record);
        }
        for record in snapshot.sectors {
            store.sectors.insert(record.id, record);
        }
        for record in snapshot.intersections {
            store.intersections.insert(record);
        }

        store
    }

    /// Copy every table into a serializable snapshot, ordered by id.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let _guard = self.read_tables()?;
        Ok(StoreSnapshot {
            features: sorted_values(&self.features),
            grids: sorted_values(&self.grids),
            squares: sorted_values(&self.squares),
            vertices: sorted_values(&self.vertices),
            sectors: sorted_values(&self.sectors),
            intersections: self.sorted_intersections(),
        })
    }

    /// Remove every record of every kind. Id counters keep counting.
    pub fn reset(&self) -> Result<(), StoreError> {
        let _guard = self.write_tables()?;
        self.intersections.clear();
        self.sectors.clear();
        self.vertices.clear();
        self.squares.clear();
        self.grids.clear();
        self.features.clear();
        Ok(())
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, ()>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, ()>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn sorted_intersections(&self) -> Vec<IntersectionRecord> {
        let mut records: Vec<IntersectionRecord> =
            self.intersections.iter().map(|entry| *entry.key()).collect();
        records.sort_unstable();
        records
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn create_feature(
        &self,
        name: Option<&str>,
        geometry: &MultiPolygon<f64>,
    ) -> Result<FeatureId, StoreError> {
        let _guard = self.read_tables()?;
        let id = FeatureId(self.next_feature.fetch_add(1, Ordering::SeqCst));
        self.features.insert(
            id,
            FeatureRecord {
                id,
                name: name.map(str::to_string),
                geometry: geometry.clone(),
            },
        );
        Ok(id)
    }

    fn list_features(&self) -> Result<Vec<FeatureRecord>, StoreError> {
        let _guard = self.read_tables()?;
        Ok(sorted_values(&self.features))
    }

    fn delete_all_features(&self) -> Result<usize, StoreError> {
        let _guard = self.write_tables()?;
        let count = self.features.len();
        self.features.clear();
        Ok(count)
    }

    fn create_grid(&self, size_km: f64) -> Result<GridId, StoreError> {
        if !(size_km.is_finite() && size_km > 0.0) {
            return Err(StoreError::InvalidRecord {
                kind: EntityKind::Grid,
                reason: format!("size must be a positive number of km, got {}", size_km),
            });
        }
        let _guard = self.read_tables()?;
        let id = GridId(self.next_grid.fetch_add(1, Ordering::SeqCst));
        self.grids.insert(id, GridRecord { id, size_km });
        Ok(id)
    }

    fn list_grids(&self) -> Result<Vec<GridRecord>, StoreError> {
        let _guard = self.read_tables()?;
        Ok(sorted_values(&self.grids))
    }

    fn delete_all_grids(&self) -> Result<usize, StoreError> {
        let _guard = self.write_tables()?;
        ensure_no_dependents(EntityKind::Grid, self.squares.len())?;
        let count = self.grids.len();
        self.grids.clear();
        Ok(count)
    }

    fn create_square(&self, grid_id: GridId, is_matching: bool) -> Result<SquareId, StoreError> {
        let _guard = self.read_tables()?;
        if !self.grids.contains_key(&grid_id) {
            return Err(StoreError::MissingParent {
                kind: EntityKind::Square,
                parent: grid_id.to_string(),
            });
        }
        let id = SquareId(self.next_square.fetch_add(1, Ordering::SeqCst));
        self.squares.insert(
            id,
            SquareRecord {
                id,
                grid_id,
                is_matching,
            },
        );
        Ok(id)
    }

    fn list_squares(&self) -> Result<Vec<SquareRecord>, StoreError> {
        let _guard = self.read_tables()?;
        Ok(sorted_values(&self.squares))
    }

    fn squares_for_grid(&self, grid_id: GridId) -> Result<Vec<SquareRecord>, StoreError> {
        Ok(self
            .list_squares()?
            .into_iter()
            .filter(|square| square.grid_id == grid_id)
            .collect())
    }

    fn delete_all_squares(&self) -> Result<usize, StoreError> {
        let _guard = self.write_tables()?;
        ensure_no_dependents(EntityKind::Square, self.vertices.len())?;
        let count = self.squares.len();
        self.squares.clear();
        Ok(count)
    }

    fn create_vertex(
        &self,
        square_id: SquareId,
        point: Point<f64>,
    ) -> Result<VertexId, StoreError> {
        let _guard = self.read_tables()?;
        if !self.squares.contains_key(&square_id) {
            return Err(StoreError::MissingParent {
                kind: EntityKind::Vertex,
                parent: square_id.to_string(),
            });
        }
        let id = VertexId(self.next_vertex.fetch_add(1, Ordering::SeqCst));
        self.vertices.insert(
            id,
            VertexRecord {
                id,
                square_id,
                point,
            },
        );
        Ok(id)
    }

    fn list_vertices(&self) -> Result<Vec<VertexRecord>, StoreError> {
        let _guard = self.read_tables()?;
        Ok(sorted_values(&self.vertices))
    }

    fn vertices_for_square(&self, square_id: SquareId) -> Result<Vec<VertexRecord>, StoreError> {
        Ok(self
            .list_vertices()?
            .into_iter()
            .filter(|vertex| vertex.square_id == square_id)
            .collect())
    }

    fn delete_all_vertices(&self) -> Result<usize, StoreError> {
        let _guard = self.write_tables()?;
        ensure_no_dependents(
            EntityKind::Vertex,
            self.sectors.len() + self.intersections.len(),
        )?;
        let count = self.vertices.len();
        self.vertices.clear();
        Ok(count)
    }

    fn create_sector(&self, sector: NewSector) -> Result<SectorId, StoreError> {
        let _guard = self.read_tables()?;
        if !self.vertices.contains_key(&sector.vertex_id) {
            return Err(StoreError::MissingParent {
                kind: EntityKind::Sector,
                parent: sector.vertex_id.to_string(),
            });
        }
        let id = SectorId(self.next_sector.fetch_add(1, Ordering::SeqCst));
        self.sectors.insert(id, SectorRecord::from_new(id, sector));
        Ok(id)
    }

    fn list_sectors(&self) -> Result<Vec<SectorRecord>, StoreError> {
        let _guard = self.read_tables()?;
        Ok(sorted_values(&self.sectors))
    }

    fn sectors_for_vertex(&self, vertex_id: VertexId) -> Result<Vec<SectorRecord>, StoreError> {
        Ok(self
            .list_sectors()?
            .into_iter()
            .filter(|sector| sector.vertex_id == vertex_id)
            .collect())
    }

    fn delete_all_sectors(&self) -> Result<usize, StoreError> {
        let _guard = self.write_tables()?;
        ensure_no_dependents(EntityKind::Sector, self.intersections.len())?;
        let count = self.sectors.len();
        self.sectors.clear();
        Ok(count)
    }

    fn create_intersection(&self, record: IntersectionRecord) -> Result<bool, StoreError> {
        let _guard = self.read_tables()?;
        if !self.sectors.contains_key(&record.sector_id) {
            return Err(StoreError::MissingParent {
                kind: EntityKind::Intersection,
                parent: record.sector_id.to_string(),
            });
        }
        if !self.vertices.contains_key(&record.vertex_id) {
            return Err(StoreError::MissingParent {
                kind: EntityKind::Intersection,
                parent: record.vertex_id.to_string(),
            });
        }
        Ok(self.intersections.insert(record))
    }

    fn list_intersections(&self) -> Result<Vec<IntersectionRecord>, StoreError> {
        let _guard = self.read_tables()?;
        Ok(self.sorted_intersections())
    }

    fn delete_all_intersections(&self) -> Result<usize, StoreError> {
        let _guard = self.write_tables()?;
        let count = self.intersections.len();
        self.intersections.clear();
        Ok(count)
    }

    fn square_by_vertex_id(&self, vertex_id: VertexId) -> Result<Option<SquareRecord>, StoreError> {
        let _guard = self.read_tables()?;
        let square_id = match self.vertices.get(&vertex_id) {
            Some(vertex) => vertex.square_id,
            None => return Ok(None),
        };
        Ok(self.squares.get(&square_id).map(|entry| *entry.value()))
    }

    fn grid_by_square_id(&self, square_id: SquareId) -> Result<Option<GridRecord>, StoreError> {
        let _guard = self.read_tables()?;
        let grid_id = match self.squares.get(&square_id) {
            Some(square) => square.grid_id,
            None => return Ok(None),
        };
        Ok(self.grids.get(&grid_id).map(|entry| *entry.value()))
    }
}

fn ensure_no_dependents(kind: EntityKind, dependents: usize) -> Result<(), StoreError> {
    if dependents == 0 {
        Ok(())
    } else {
        Err(StoreError::HasDependents { kind, dependents })
    }
}

fn sorted_values<K, V>(map: &DashMap<K, V>) -> Vec<V>
where
    K: Ord + Copy + std::hash::Hash + Eq,
    V: Clone,
{
    let mut entries: Vec<(K, V)> = map
        .iter()
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    entries.sort_unstable_by_key(|(key, _)| *key);
    entries.into_iter().map(|(_, value)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use std::sync::Arc;
    use std::thread;

    fn new_sector(vertex_id: VertexId) -> NewSector {
        NewSector {
            vertex_id,
            azimuth_deg: 0.0,
            radius_km: 5.0,
            angle_deg: 60,
            polygon: polygon![(x: 0.0, y: 0.0), (x: 0.01, y: 0.04), (x: -0.01, y: 0.04), (x: 0.0, y: 0.0)],
        }
    }

    fn seeded() -> (MemoryStore, GridId, SquareId, VertexId, SectorId) {
        let store = MemoryStore::new();
        let grid = store.create_grid(10.0).unwrap();
        let square = store.create_square(grid, true).unwrap();
        let vertex = store.create_vertex(square, Point::new(0.0, 0.0)).unwrap();
        let sector = store.create_sector(new_sector(vertex)).unwrap();
        (store, grid, square, vertex, sector)
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let store = MemoryStore::new();
        let first = store.create_grid(10.0).unwrap();
        let second = store.create_grid(20.0).unwrap();
        assert_eq!(first, GridId(1));
        assert_eq!(second, GridId(2));
    }

    #[test]
    fn test_create_square_requires_grid() {
        let store = MemoryStore::new();
        let result = store.create_square(GridId(99), true);
        assert!(matches!(
            result,
            Err(StoreError::MissingParent {
                kind: EntityKind::Square,
                ..
            })
        ));
    }

    #[test]
    fn test_create_vertex_requires_square() {
        let store = MemoryStore::new();
        let result = store.create_vertex(SquareId(1), Point::new(0.0, 0.0));
        assert!(matches!(result, Err(StoreError::MissingParent { .. })));
    }

    #[test]
    fn test_create_grid_rejects_non_positive_size() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.create_grid(0.0),
            Err(StoreError::InvalidRecord { .. })
        ));
        assert!(store.create_grid(f64::NAN).is_err());
    }

    #[test]
    fn test_parent_lookups() {
        let (store, grid, square, vertex, _) = seeded();

        assert_eq!(store.square_by_vertex_id(vertex).unwrap().unwrap().id, square);
        assert_eq!(store.grid_by_square_id(square).unwrap().unwrap().id, grid);
        assert!(store.square_by_vertex_id(VertexId(42)).unwrap().is_none());
        assert!(store.grid_by_square_id(SquareId(42)).unwrap().is_none());
    }

    #[test]
    fn test_children_by_parent() {
        let (store, grid, square, vertex, sector) = seeded();
        let other_grid = store.create_grid(5.0).unwrap();
        store.create_square(other_grid, false).unwrap();

        assert_eq!(store.squares_for_grid(grid).unwrap().len(), 1);
        assert_eq!(store.vertices_for_square(square).unwrap().len(), 1);
        assert_eq!(store.sectors_for_vertex(vertex).unwrap()[0].id, sector);
    }

    #[test]
    fn test_intersection_is_idempotent() {
        let (store, _, _, vertex, sector) = seeded();
        let record = IntersectionRecord::new(sector, vertex);

        assert!(store.create_intersection(record).unwrap());
        assert!(!store.create_intersection(record).unwrap());
        assert_eq!(store.list_intersections().unwrap(), vec![record]);
    }

    #[test]
    fn test_intersection_requires_both_parents() {
        let (store, _, _, vertex, sector) = seeded();
        assert!(store
            .create_intersection(IntersectionRecord::new(SectorId(77), vertex))
            .is_err());
        assert!(store
            .create_intersection(IntersectionRecord::new(sector, VertexId(77)))
            .is_err());
    }

    #[test]
    fn test_delete_refuses_to_orphan_children() {
        let (store, _, _, vertex, sector) = seeded();
        store
            .create_intersection(IntersectionRecord::new(sector, vertex))
            .unwrap();

        assert!(matches!(
            store.delete_all_grids(),
            Err(StoreError::HasDependents {
                kind: EntityKind::Grid,
                dependents: 1
            })
        ));
        assert!(store.delete_all_sectors().is_err());

        // Children first, then parents
        assert_eq!(store.delete_all_intersections().unwrap(), 1);
        assert_eq!(store.delete_all_sectors().unwrap(), 1);
        assert_eq!(store.delete_all_vertices().unwrap(), 1);
        assert_eq!(store.delete_all_squares().unwrap(), 1);
        assert_eq!(store.delete_all_grids().unwrap(), 1);
        assert!(store.list_grids().unwrap().is_empty());
    }

    #[test]
    fn test_features_round_trip() {
        let store = MemoryStore::new();
        let area = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)
        ]]);
        let id = store.create_feature(Some("Kyiv"), &area).unwrap();
        store.create_feature(None, &area).unwrap();

        let features = store.list_features().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, id);
        assert_eq!(features[0].name.as_deref(), Some("Kyiv"));
        assert_eq!(store.delete_all_features().unwrap(), 2);
    }

    #[test]
    fn test_reset_clears_everything_but_keeps_counters() {
        let (store, grid, _, _, _) = seeded();
        store.reset().unwrap();

        assert!(store.list_squares().unwrap().is_empty());
        assert!(store.list_sectors().unwrap().is_empty());
        let next = store.create_grid(1.0).unwrap();
        assert!(next > grid);
    }

    #[test]
    fn test_snapshot_restore_resumes_ids() {
        let (store, _, square, _, sector) = seeded();
        let restored = MemoryStore::from_snapshot(store.snapshot().unwrap());

        assert_eq!(restored.list_sectors().unwrap()[0].id, sector);
        let vertex = restored
            .create_vertex(square, Point::new(1.0, 1.0))
            .unwrap();
        assert_eq!(vertex, VertexId(2));
    }

    #[test]
    fn test_concurrent_creates_assign_unique_ids() {
        let store = Arc::new(MemoryStore::new());
        let grid = store.create_grid(10.0).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..50)
                        .map(|_| store.create_square(grid, true).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<SquareId> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(store.list_squares().unwrap().len(), 400);
    }
}
