//! Per-tile data: [`Tile`], [`TileProperty`] and [`Terrain`].

use crate::geom::{Aabb, Vec3};

/// Terrain category of a tile, checked against the searching agent's
/// locomotion class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Default,
    Ground,
    Grass,
    Water,
}

/// Opaque reference to the entity standing on a tile.
///
/// The grid never dereferences it; hosts map it back to their own entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupantId(pub u64);

/// Traversal properties of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TileProperty {
    pub passable: bool,
    /// Entry cost, always ≥ 0.
    pub cost: f32,
    /// Multiplier applied to `cost` by searches.
    pub cost_scale: f32,
    pub terrain: Terrain,
}

impl Default for TileProperty {
    fn default() -> Self {
        Self {
            passable: true,
            cost: 1.0,
            cost_scale: 1.0,
            terrain: Terrain::Default,
        }
    }
}

impl TileProperty {
    /// An impassable tile with default cost.
    pub fn blocked() -> Self {
        Self {
            passable: false,
            ..Self::default()
        }
    }

    /// A passable tile with the given entry cost.
    pub fn with_cost(cost: f32) -> Self {
        Self {
            cost,
            ..Self::default()
        }
    }

    /// A passable tile of the given terrain.
    pub fn with_terrain(terrain: Terrain) -> Self {
        Self {
            terrain,
            ..Self::default()
        }
    }

    /// Whether the cost fields hold usable values.
    pub fn is_valid(&self) -> bool {
        self.cost.is_finite()
            && self.cost >= 0.0
            && self.cost_scale.is_finite()
            && self.cost_scale >= 0.0
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub(crate) position: Vec3,
    pub(crate) bounds: Aabb,
    pub(crate) property: TileProperty,
    pub(crate) occupant: Option<OccupantId>,
}

impl Tile {
    pub(crate) fn new(position: Vec3, local_bounds: Aabb, property: TileProperty) -> Self {
        Self {
            position,
            bounds: local_bounds.translate(position),
            property,
            occupant: None,
        }
    }

    /// World-space position of the tile.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space bounding box of the tile.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[inline]
    pub fn property(&self) -> &TileProperty {
        &self.property
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.property.passable
    }

    #[inline]
    pub fn cost(&self) -> f32 {
        self.property.cost
    }

    #[inline]
    pub fn terrain(&self) -> Terrain {
        self.property.terrain
    }

    /// Entity currently registered on this tile, if any.
    #[inline]
    pub fn occupant(&self) -> Option<OccupantId> {
        self.occupant
    }
}
