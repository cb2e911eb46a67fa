//! **tilepath-core**: tile store, topology and geometry for grid pathfinding.
//!
//! This crate provides the foundational types shared by the *tilepath*
//! crates: world-space geometry, the grid layout configuration, the
//! [`Grid`] tile store and the pure index arithmetic of square and hex
//! [`Topology`].

pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod tile;
pub mod topology;

pub use config::{DEFAULT_TILE_BOUNDS, GridConfig, MAX_GRID_DIMENSION};
pub use error::GridError;
pub use geom::{Aabb, Vec3};
pub use grid::Grid;
pub use tile::{OccupantId, Terrain, Tile, TileProperty};
pub use topology::{Direction, GridType, Neighbors, Topology};
