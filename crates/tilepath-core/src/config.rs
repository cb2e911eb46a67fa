//! Grid generation parameters.

use crate::geom::{Aabb, Vec3};
use crate::topology::{GridType, Topology};

/// Largest supported width or height.
pub const MAX_GRID_DIMENSION: usize = 1024;

/// Local bounding box of a single tile when none is supplied.
pub const DEFAULT_TILE_BOUNDS: Aabb = Aabb {
    min: Vec3::new(-50.0, -50.0, 0.0),
    max: Vec3::new(50.0, 50.0, 0.0),
};

/// Everything needed to lay out a grid.
///
/// Set once by [`Grid::generate`](crate::Grid::generate); immutable until the
/// next regeneration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub grid_type: GridType,
    pub width: usize,
    pub height: usize,
    /// Local bounds of one tile; [`DEFAULT_TILE_BOUNDS`] when `None`.
    pub tile_bounds: Option<Aabb>,
    /// Extra spacing between tiles along X.
    pub offset_x: f32,
    /// Extra spacing between tiles along Y.
    pub offset_y: f32,
    /// Per-axis scale applied to tile positions and bounds.
    pub scale: Vec3,
    /// World position of tile 0; the world origin when `None`.
    pub origin: Option<Vec3>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_type: GridType::Square,
            width: 0,
            height: 0,
            tile_bounds: None,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: Vec3::ONE,
            origin: None,
        }
    }
}

impl GridConfig {
    /// Square grid of the given size with default spacing.
    pub fn square(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Hex grid of the given size with default spacing.
    pub fn hex(width: usize, height: usize) -> Self {
        Self {
            grid_type: GridType::Hex,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_tile_bounds(mut self, bounds: Aabb) -> Self {
        self.tile_bounds = Some(bounds);
        self
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn topology(&self) -> Topology {
        Topology::new(self.grid_type, self.width, self.height)
    }

    #[inline]
    pub fn tile_bounds(&self) -> Aabb {
        self.tile_bounds.unwrap_or(DEFAULT_TILE_BOUNDS)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin.unwrap_or(Vec3::ZERO)
    }

    /// Tile pitch along X and Y before scaling.
    pub fn pitch(&self) -> (f32, f32) {
        let size = self.tile_bounds().size();
        (size.x + self.offset_x, size.y + self.offset_y)
    }

    /// World position of tile `index` under this layout.
    pub fn tile_position(&self, index: usize) -> Vec3 {
        let (bound_x, bound_y) = self.pitch();
        let local = match self.grid_type {
            GridType::Square => {
                let h = self.height.max(1);
                Vec3::new(
                    (index / h) as f32 * bound_x,
                    (index % h) as f32 * bound_y,
                    0.0,
                )
            }
            GridType::Hex => {
                let w = self.width.max(1);
                let row = index / w;
                let col = index % w;
                Vec3::new(
                    (row % 2) as f32 * (bound_x / 2.0) + col as f32 * bound_x,
                    row as f32 * (bound_y * 0.75),
                    0.0,
                )
            }
        };
        local.scale(self.scale) + self.origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_layout() {
        let c = GridConfig::square(3, 2);
        assert_eq!(c.tile_position(0), Vec3::ZERO);
        // index 1 is the second row of the first column
        assert_eq!(c.tile_position(1), Vec3::new(0.0, 100.0, 0.0));
        assert_eq!(c.tile_position(2), Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(c.tile_position(5), Vec3::new(200.0, 100.0, 0.0));
    }

    #[test]
    fn hex_layout_offsets_odd_rows() {
        let c = GridConfig::hex(3, 3);
        assert_eq!(c.tile_position(0), Vec3::ZERO);
        assert_eq!(c.tile_position(2), Vec3::new(200.0, 0.0, 0.0));
        assert_eq!(c.tile_position(3), Vec3::new(50.0, 75.0, 0.0));
        assert_eq!(c.tile_position(7), Vec3::new(100.0, 150.0, 0.0));
    }

    #[test]
    fn offset_scale_and_origin() {
        let c = GridConfig::square(2, 2)
            .with_offset(10.0, 20.0)
            .with_scale(Vec3::new(2.0, 0.5, 1.0))
            .with_origin(Vec3::new(-1000.0, 5.0, 3.0));
        assert_eq!(c.pitch(), (110.0, 120.0));
        assert_eq!(c.tile_position(3), Vec3::new(-780.0, 65.0, 3.0));
    }
}
