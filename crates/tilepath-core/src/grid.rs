//! The tile store.
//!
//! [`Grid`] owns every [`Tile`] keyed by its dense index. Searches borrow it
//! immutably, so any number of them may run in parallel while nothing
//! mutates the grid.

use std::collections::HashMap;

use log::debug;
use smallvec::SmallVec;

use crate::config::{GridConfig, MAX_GRID_DIMENSION};
use crate::error::GridError;
use crate::geom::{Aabb, Vec3};
use crate::tile::{OccupantId, Tile, TileProperty};
use crate::topology::{Direction, GridType, Neighbors, Topology};

/// A generated grid of tiles.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    config: GridConfig,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Generate a new grid with default tile properties.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        let mut grid = Self::default();
        grid.generate(config, &HashMap::new())?;
        Ok(grid)
    }

    /// Discard all tiles and occupants and lay the grid out again.
    ///
    /// Tiles take their property from `properties` when present, otherwise
    /// [`TileProperty::default`]. A zero width or height leaves the grid
    /// empty. On error the grid is left empty.
    pub fn generate(
        &mut self,
        config: GridConfig,
        properties: &HashMap<usize, TileProperty>,
    ) -> Result<(), GridError> {
        self.tiles.clear();
        self.config = GridConfig {
            width: 0,
            height: 0,
            ..config
        };

        if config.width > MAX_GRID_DIMENSION || config.height > MAX_GRID_DIMENSION {
            return Err(GridError::DimensionTooLarge {
                width: config.width,
                height: config.height,
                max: MAX_GRID_DIMENSION,
            });
        }
        let s = config.scale;
        if !s.is_finite() || s.x <= 0.0 || s.y <= 0.0 || s.z <= 0.0 {
            return Err(GridError::InvalidScale([s.x, s.y, s.z]));
        }
        let len = config.width * config.height;
        if let Some((&index, p)) = properties.iter().find(|(i, p)| **i < len && !p.is_valid()) {
            return Err(GridError::InvalidCost {
                index,
                cost: p.cost,
                cost_scale: p.cost_scale,
            });
        }
        if len == 0 {
            self.config = config;
            debug!("grid generated empty ({}x{})", config.width, config.height);
            return Ok(());
        }

        let local_bounds = config.tile_bounds().scale(config.scale);
        self.tiles.reserve_exact(len);
        for index in 0..len {
            let property = properties.get(&index).copied().unwrap_or_default();
            self.tiles
                .push(Tile::new(config.tile_position(index), local_bounds, property));
        }
        self.config = config;

        let ignored = properties.keys().filter(|&&i| i >= len).count();
        if ignored > 0 {
            debug!("grid generation ignored {ignored} properties outside [0, {len})");
        }
        debug!(
            "grid generated: {:?} {}x{} ({} tiles)",
            config.grid_type, config.width, config.height, len
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Shape
    // -----------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.config.topology()
    }

    #[inline]
    pub fn grid_type(&self) -> GridType {
        self.config.grid_type
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.config.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.config.height
    }

    /// Number of tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `index` names a tile.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.tiles.len()
    }

    // -----------------------------------------------------------------------
    // Tile access
    // -----------------------------------------------------------------------

    /// The tile at `index`, or `None` when out of range.
    #[inline]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// All tiles in index order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, &Tile)> + '_ {
        self.tiles.iter().enumerate()
    }

    /// World position of tile `index`.
    #[inline]
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.tile(index).map(Tile::position)
    }

    /// Union of every tile's bounds, or `None` for an empty grid.
    pub fn bounds(&self) -> Option<Aabb> {
        self.tiles.iter().map(Tile::bounds).reduce(Aabb::union)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Replace the traversal properties of one tile.
    pub fn set_tile_property(
        &mut self,
        index: usize,
        property: TileProperty,
    ) -> Result<(), GridError> {
        let len = self.len();
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(GridError::IndexOutOfRange { index, len })?;
        if !property.is_valid() {
            return Err(GridError::InvalidCost {
                index,
                cost: property.cost,
                cost_scale: property.cost_scale,
            });
        }
        tile.property = property;
        Ok(())
    }

    /// Replace the properties of many tiles, skipping unknown indices and
    /// invalid properties. Returns how many tiles were updated.
    pub fn set_tile_properties<I>(&mut self, properties: I) -> usize
    where
        I: IntoIterator<Item = (usize, TileProperty)>,
    {
        let mut updated = 0;
        for (index, property) in properties {
            match self.set_tile_property(index, property) {
                Ok(()) => updated += 1,
                Err(e) => debug!("skipping tile property: {e}"),
            }
        }
        updated
    }

    /// Record `occupant` on tile `index` and make the tile impassable.
    ///
    /// Returns `false` if the index is out of range.
    pub fn register_occupant(&mut self, index: usize, occupant: OccupantId) -> bool {
        let Some(tile) = self.tiles.get_mut(index) else {
            return false;
        };
        tile.occupant = Some(occupant);
        tile.property.passable = false;
        true
    }

    /// Clear the occupant of tile `index` and make the tile passable again.
    ///
    /// Returns the previous occupant.
    pub fn unregister_occupant(&mut self, index: usize) -> Option<OccupantId> {
        let tile = self.tiles.get_mut(index)?;
        tile.property.passable = true;
        tile.occupant.take()
    }

    // -----------------------------------------------------------------------
    // Topology
    // -----------------------------------------------------------------------

    /// All eight neighbor slots of `index`.
    #[inline]
    pub fn neighbors(&self, index: usize) -> Neighbors {
        self.topology().neighbors(index)
    }

    /// Neighbors of `index` as a dense list.
    #[inline]
    pub fn neighbor_list(&self, index: usize, allow_diagonal: bool) -> SmallVec<[usize; 8]> {
        self.topology().neighbor_list(index, allow_diagonal)
    }

    /// Direction of `to` as seen from `from`, `None` if not adjacent.
    #[inline]
    pub fn direction_between(&self, from: usize, to: usize) -> Option<Direction> {
        self.topology().direction_between(from, to)
    }

    // -----------------------------------------------------------------------
    // Spatial queries (linear scans)
    // -----------------------------------------------------------------------

    /// The tile whose bounds contain `point` on the X/Y plane.
    ///
    /// Where bounds overlap (hex layouts) the tile with the nearest centre
    /// wins.
    pub fn index_at(&self, point: Vec3) -> Option<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.bounds.contains_xy(point))
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_2d(point)
                    .total_cmp(&b.position.distance_2d(point))
            })
            .map(|(i, _)| i)
    }

    /// Indices of tiles whose bounds overlap a sphere.
    pub fn indices_overlapping_sphere(&self, center: Vec3, radius: f32) -> Vec<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.bounds.intersects_sphere(center, radius))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of tiles whose bounds overlap the box `center ± extent`.
    pub fn indices_overlapping_box(&self, center: Vec3, extent: Vec3) -> Vec<usize> {
        let query = Aabb::from_center_extent(center, extent);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.bounds.intersects(query))
            .map(|(i, _)| i)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Terrain;

    #[test]
    fn generate_default_properties() {
        let g = Grid::new(GridConfig::square(4, 3)).unwrap();
        assert_eq!(g.len(), 12);
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        for (_, t) in g.tiles() {
            assert_eq!(*t.property(), TileProperty::default());
        }
    }

    #[test]
    fn generate_with_initial_properties() {
        let mut props = HashMap::new();
        props.insert(2, TileProperty::blocked());
        props.insert(5, TileProperty::with_terrain(Terrain::Water));
        props.insert(99, TileProperty::blocked());
        let mut g = Grid::default();
        g.generate(GridConfig::hex(3, 3), &props).unwrap();
        assert!(!g.tile(2).unwrap().is_passable());
        assert_eq!(g.tile(5).unwrap().terrain(), Terrain::Water);
        assert_eq!(g.len(), 9);
    }

    #[test]
    fn zero_dimension_leaves_grid_empty() {
        let g = Grid::new(GridConfig::square(0, 10)).unwrap();
        assert!(g.is_empty());
        assert!(g.tile(0).is_none());
        assert!(g.bounds().is_none());
    }

    #[test]
    fn regenerate_discards_occupants() {
        let mut g = Grid::new(GridConfig::square(3, 3)).unwrap();
        assert!(g.register_occupant(4, OccupantId(7)));
        g.generate(GridConfig::square(2, 2), &HashMap::new()).unwrap();
        assert_eq!(g.len(), 4);
        assert!(g.tiles().all(|(_, t)| t.occupant().is_none() && t.is_passable()));
    }

    #[test]
    fn rejects_bad_configs() {
        let err = Grid::new(GridConfig::square(MAX_GRID_DIMENSION + 1, 1)).unwrap_err();
        assert!(matches!(err, GridError::DimensionTooLarge { .. }));

        let err = Grid::new(GridConfig::square(2, 2).with_scale(Vec3::new(1.0, 0.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidScale(_)));

        let mut props = HashMap::new();
        props.insert(1, TileProperty::with_cost(-3.0));
        let mut g = Grid::default();
        let err = g.generate(GridConfig::square(2, 2), &props).unwrap_err();
        assert!(matches!(err, GridError::InvalidCost { index: 1, .. }));
        assert!(g.is_empty());
    }

    #[test]
    fn out_of_range_access_is_none() {
        let g = Grid::new(GridConfig::square(2, 2)).unwrap();
        assert!(g.tile(4).is_none());
        assert!(g.position(usize::MAX).is_none());
    }

    #[test]
    fn set_properties() {
        let mut g = Grid::new(GridConfig::square(2, 2)).unwrap();
        g.set_tile_property(3, TileProperty::with_cost(4.0)).unwrap();
        assert_eq!(g.tile(3).unwrap().cost(), 4.0);
        assert_eq!(
            g.set_tile_property(4, TileProperty::default()),
            Err(GridError::IndexOutOfRange { index: 4, len: 4 })
        );

        let n = g.set_tile_properties([
            (0, TileProperty::blocked()),
            (1, TileProperty::with_cost(f32::INFINITY)),
            (10, TileProperty::blocked()),
        ]);
        assert_eq!(n, 1);
        assert!(!g.tile(0).unwrap().is_passable());
        assert_eq!(g.tile(1).unwrap().cost(), 1.0);
    }

    #[test]
    fn occupants_toggle_passability() {
        let mut g = Grid::new(GridConfig::square(2, 2)).unwrap();
        assert!(g.register_occupant(1, OccupantId(42)));
        let t = g.tile(1).unwrap();
        assert!(!t.is_passable());
        assert_eq!(t.occupant(), Some(OccupantId(42)));

        assert_eq!(g.unregister_occupant(1), Some(OccupantId(42)));
        assert!(g.tile(1).unwrap().is_passable());
        assert!(!g.register_occupant(9, OccupantId(1)));
        assert_eq!(g.unregister_occupant(9), None);
    }

    #[test]
    fn index_at_point() {
        let g = Grid::new(GridConfig::square(3, 3)).unwrap();
        // Tile 5 sits at column 1, row 2 => (100, 200).
        assert_eq!(g.index_at(Vec3::new(110.0, 190.0, 0.0)), Some(5));
        assert_eq!(g.index_at(Vec3::new(0.0, 0.0, 500.0)), Some(0));
        assert_eq!(g.index_at(Vec3::new(1000.0, 0.0, 0.0)), None);
    }

    #[test]
    fn index_at_prefers_nearest_hex_center() {
        let g = Grid::new(GridConfig::hex(3, 3)).unwrap();
        // (60, 40) lies in the boxes of tile 3 at (50, 75) and tile 1 at (100, 0).
        assert_eq!(g.index_at(Vec3::new(60.0, 40.0, 0.0)), Some(3));
    }

    #[test]
    fn sphere_and_box_queries() {
        let g = Grid::new(GridConfig::square(3, 3)).unwrap();
        let mut hits = g.indices_overlapping_sphere(Vec3::new(100.0, 100.0, 0.0), 10.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![4]);

        let mut hits = g.indices_overlapping_sphere(Vec3::new(50.0, 50.0, 0.0), 1.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1, 3, 4]);

        let hits = g.indices_overlapping_box(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 1.0));
        assert_eq!(hits, vec![0]);

        let hits = g.indices_overlapping_box(
            Vec3::new(100.0, 100.0, 0.0),
            Vec3::new(200.0, 200.0, 1.0),
        );
        assert_eq!(hits.len(), 9);
    }

    #[test]
    fn grid_bounds_union() {
        let g = Grid::new(GridConfig::square(2, 3)).unwrap();
        let b = g.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-50.0, -50.0, 0.0));
        assert_eq!(b.max, Vec3::new(150.0, 250.0, 0.0));
    }
}
