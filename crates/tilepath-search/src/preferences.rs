//! Per-query search configuration.

use tilepath_core::Terrain;

/// Locomotion class of the searching agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchType {
    #[default]
    Ground,
    Water,
    /// Ignores terrain; every topologically valid neighbor costs 1.
    Fly,
}

impl SearchType {
    /// Whether an agent of this type may enter `terrain`.
    pub fn accepts(self, terrain: Terrain) -> bool {
        match self {
            SearchType::Ground => terrain != Terrain::Water,
            SearchType::Water => !matches!(terrain, Terrain::Ground | Terrain::Grass),
            SearchType::Fly => true,
        }
    }
}

/// Options for a single search call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchPreferences {
    /// Allow diagonal steps. Square grids only.
    pub allow_diagonal: bool,
    /// Treat every step as costing 1, ignoring tile costs.
    pub override_cost_to_one: bool,
    /// Skip terrain compatibility checks.
    pub ignore_terrain: bool,
    /// Enter impassable tiles at their stored cost.
    pub ignore_obstacles: bool,
    /// Enter occupied tiles, scaling their cost by `occupant_cost_scale`.
    pub ignore_occupants: bool,
    pub occupant_cost_scale: f32,
    /// Tiles never entered, whatever their properties.
    pub blocked_tiles: Vec<usize>,
    /// Collect neighbors rejected during expansion into the result.
    pub record_obstacles: bool,
}

impl Default for SearchPreferences {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
            override_cost_to_one: false,
            ignore_terrain: false,
            ignore_obstacles: false,
            ignore_occupants: false,
            occupant_cost_scale: 1.0,
            blocked_tiles: Vec::new(),
            record_obstacles: false,
        }
    }
}

impl SearchPreferences {
    pub fn orthogonal() -> Self {
        Self {
            allow_diagonal: false,
            ..Self::default()
        }
    }

    pub fn with_blocked_tiles(mut self, tiles: impl IntoIterator<Item = usize>) -> Self {
        self.blocked_tiles.extend(tiles);
        self
    }

    pub fn recording_obstacles(mut self) -> Self {
        self.record_obstacles = true;
        self
    }

    #[inline]
    pub fn is_blocked(&self, index: usize) -> bool {
        self.blocked_tiles.contains(&index)
    }
}

/// Outcome of evaluating one step into a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAccess {
    pub passable: bool,
    pub cost: f32,
    pub cost_scale: f32,
}

impl NodeAccess {
    /// A tile that cannot be entered.
    pub const BLOCKED: Self = Self {
        passable: false,
        cost: f32::MAX,
        cost_scale: 1.0,
    };

    pub const fn open(cost: f32) -> Self {
        Self {
            passable: true,
            cost,
            cost_scale: 1.0,
        }
    }

    /// `cost * cost_scale`.
    #[inline]
    pub fn effective_cost(&self) -> f32 {
        self.cost * self.cost_scale
    }
}
