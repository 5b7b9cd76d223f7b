//! Store trait definition for dependency injection.

use geo::{MultiPolygon, Point};

use super::types::{
    FeatureId, FeatureRecord, GridId, GridRecord, IntersectionRecord, NewSector, SectorId,
    SectorRecord, SquareId, SquareRecord, StoreError, VertexId, VertexRecord,
};

/// Persistence gateway for analysis results.
///
/// Identifiers are assigned by the store on create and must be unique even
/// when several threads create records concurrently. Children reference
/// their parent by id, so callers create parents first:
/// grid → square → vertex → sector → intersection.
///
/// Every operation reports failure through its own `Result`; whether a
/// failure aborts the run or is logged and skipped is decided by the
/// caller's [`PersistencePolicy`](crate::analysis::PersistencePolicy).
///
/// # Example
///
/// ```
/// use geo::Point;
/// use geosector::store::{MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// let grid = store.create_grid(25.0).unwrap();
/// let square = store.create_square(grid, true).unwrap();
/// let vertex = store.create_vertex(square, Point::new(31.0, 49.0)).unwrap();
///
/// assert_eq!(store.square_by_vertex_id(vertex).unwrap().unwrap().id, square);
/// assert_eq!(store.grid_by_square_id(square).unwrap().unwrap().id, grid);
/// ```
pub trait Store: Send + Sync {
    // Features

    /// Store an input boundary feature.
    fn create_feature(
        &self,
        name: Option<&str>,
        geometry: &MultiPolygon<f64>,
    ) -> Result<FeatureId, StoreError>;

    /// All features, ordered by id.
    fn list_features(&self) -> Result<Vec<FeatureRecord>, StoreError>;

    /// Remove all features. Returns the number removed.
    fn delete_all_features(&self) -> Result<usize, StoreError>;

    // Grids

    /// Store a grid with the cell size it was generated at.
    fn create_grid(&self, size_km: f64) -> Result<GridId, StoreError>;

    /// All grids, ordered by id.
    fn list_grids(&self) -> Result<Vec<GridRecord>, StoreError>;

    /// Remove all grids. Fails while squares still reference any grid.
    fn delete_all_grids(&self) -> Result<usize, StoreError>;

    // Squares

    /// Store a square owned by `grid_id`.
    fn create_square(&self, grid_id: GridId, is_matching: bool) -> Result<SquareId, StoreError>;

    /// All squares, ordered by id.
    fn list_squares(&self) -> Result<Vec<SquareRecord>, StoreError>;

    /// Squares owned by one grid, ordered by id.
    fn squares_for_grid(&self, grid_id: GridId) -> Result<Vec<SquareRecord>, StoreError>;

    /// Remove all squares. Fails while vertices still reference any square.
    fn delete_all_squares(&self) -> Result<usize, StoreError>;

    // Vertices

    /// Store a corner vertex owned by `square_id`.
    fn create_vertex(&self, square_id: SquareId, point: Point<f64>)
        -> Result<VertexId, StoreError>;

    /// All vertices, ordered by id.
    fn list_vertices(&self) -> Result<Vec<VertexRecord>, StoreError>;

    /// Vertices owned by one square, ordered by id.
    fn vertices_for_square(&self, square_id: SquareId) -> Result<Vec<VertexRecord>, StoreError>;

    /// Remove all vertices. Fails while sectors or intersections reference any vertex.
    fn delete_all_vertices(&self) -> Result<usize, StoreError>;

    // Sectors

    /// Store a sector anchored at `sector.vertex_id`.
    fn create_sector(&self, sector: NewSector) -> Result<SectorId, StoreError>;

    /// All sectors, ordered by id.
    fn list_sectors(&self) -> Result<Vec<SectorRecord>, StoreError>;

    /// Sectors anchored at one vertex, ordered by id.
    fn sectors_for_vertex(&self, vertex_id: VertexId) -> Result<Vec<SectorRecord>, StoreError>;

    /// Remove all sectors. Fails while intersections reference any sector.
    fn delete_all_sectors(&self) -> Result<usize, StoreError>;

    // Intersections

    /// Record that a vertex lies in a sector.
    ///
    /// Returns `true` when the pair was new and `false` when it was already
    /// stored; repeating the call never creates a duplicate.
    fn create_intersection(&self, record: IntersectionRecord) -> Result<bool, StoreError>;

    /// All intersections, ordered by (sector, vertex).
    fn list_intersections(&self) -> Result<Vec<IntersectionRecord>, StoreError>;

    /// Remove all intersections.
    fn delete_all_intersections(&self) -> Result<usize, StoreError>;

    // Parent lookups

    /// The square owning a vertex, or `None` when the vertex is unknown.
    fn square_by_vertex_id(&self, vertex_id: VertexId) -> Result<Option<SquareRecord>, StoreError>;

    /// The grid owning a square, or `None` when the square is unknown.
    fn grid_by_square_id(&self, square_id: SquareId) -> Result<Option<GridRecord>, StoreError>;
}
