use std::time::Duration;

use tilepath_core::{Direction, Grid};

use crate::preferences::{NodeAccess, SearchPreferences, SearchType};
use crate::result::SearchState;

/// One candidate step considered during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Decides whether a search may enter a tile and at what cost.
///
/// The default method applies the rules of [`evaluate_default`]; override it
/// to add game-specific rules, calling back into the default where useful.
pub trait TraversalPolicy {
    fn evaluate(
        &self,
        grid: &Grid,
        step: Step,
        prefs: &SearchPreferences,
        search_type: SearchType,
    ) -> NodeAccess {
        evaluate_default(grid, step, prefs, search_type)
    }
}

impl<T: TraversalPolicy + ?Sized> TraversalPolicy for &T {
    fn evaluate(
        &self,
        grid: &Grid,
        step: Step,
        prefs: &SearchPreferences,
        search_type: SearchType,
    ) -> NodeAccess {
        (**self).evaluate(grid, step, prefs, search_type)
    }
}

/// Policy using the built-in rules only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl TraversalPolicy for DefaultPolicy {}

/// Built-in traversal rules, applied in order:
///
/// 1. tiles in `blocked_tiles` are never entered;
/// 2. unless flying or `ignore_terrain` is set, the terrain must suit the
///    search type;
/// 3. with `ignore_occupants`, an occupied tile is entered with its cost
///    scale replaced by `occupant_cost_scale`;
/// 4. with `ignore_obstacles`, an impassable tile is entered at its stored
///    cost (1 when flying);
/// 5. otherwise the stored property decides.
pub fn evaluate_default(
    grid: &Grid,
    step: Step,
    prefs: &SearchPreferences,
    search_type: SearchType,
) -> NodeAccess {
    let Some(tile) = grid.tile(step.to) else {
        return NodeAccess::BLOCKED;
    };
    let p = tile.property();

    if prefs.is_blocked(step.to) {
        return NodeAccess {
            passable: false,
            cost: p.cost,
            cost_scale: p.cost_scale,
        };
    }
    if search_type != SearchType::Fly && !prefs.ignore_terrain && !search_type.accepts(p.terrain)
    {
        return NodeAccess {
            passable: false,
            cost: p.cost,
            cost_scale: p.cost_scale,
        };
    }
    if prefs.ignore_occupants && tile.occupant().is_some() {
        return NodeAccess {
            passable: true,
            cost: p.cost,
            cost_scale: prefs.occupant_cost_scale,
        };
    }
    if prefs.ignore_obstacles && !p.passable {
        let cost = if search_type == SearchType::Fly { 1.0 } else { p.cost };
        return NodeAccess {
            passable: true,
            cost,
            cost_scale: p.cost_scale,
        };
    }
    NodeAccess {
        passable: p.passable,
        cost: p.cost,
        cost_scale: p.cost_scale,
    }
}

/// Which search produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    AStar,
    Range,
    Retrace,
}

/// Hooks called while searches run. Every method defaults to a no-op.
pub trait SearchObserver {
    /// A node was taken off the open set and expanded.
    fn on_expand(&self, _index: usize) {}

    fn on_search_finished(
        &self,
        _kind: SearchKind,
        _state: SearchState,
        _expanded: usize,
        _elapsed: Duration,
    ) {
    }
}

impl<T: SearchObserver + ?Sized> SearchObserver for &T {
    fn on_expand(&self, index: usize) {
        (**self).on_expand(index)
    }

    fn on_search_finished(
        &self,
        kind: SearchKind,
        state: SearchState,
        expanded: usize,
        elapsed: Duration,
    ) {
        (**self).on_search_finished(kind, state, expanded, elapsed)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tilepath_core::{GridConfig, OccupantId, Terrain, TileProperty};

    use super::*;

    fn grid_with(props: &[(usize, TileProperty)]) -> Grid {
        let mut grid = Grid::default();
        let props: HashMap<_, _> = props.iter().copied().collect();
        grid.generate(GridConfig::square(3, 3), &props).unwrap();
        grid
    }

    fn step_to(to: usize) -> Step {
        Step {
            from: 4,
            to,
            direction: Direction::North,
        }
    }

    #[test]
    fn filter_list_wins() {
        let grid = grid_with(&[]);
        let prefs = SearchPreferences::default().with_blocked_tiles([7]);
        let a = evaluate_default(&grid, step_to(7), &prefs, SearchType::Fly);
        assert!(!a.passable);
    }

    #[test]
    fn terrain_rejects_unless_ignored() {
        let grid = grid_with(&[(7, TileProperty::with_terrain(Terrain::Water))]);
        let mut prefs = SearchPreferences::default();
        assert!(!evaluate_default(&grid, step_to(7), &prefs, SearchType::Ground).passable);
        assert!(evaluate_default(&grid, step_to(7), &prefs, SearchType::Water).passable);
        assert!(evaluate_default(&grid, step_to(7), &prefs, SearchType::Fly).passable);
        prefs.ignore_terrain = true;
        assert!(evaluate_default(&grid, step_to(7), &prefs, SearchType::Ground).passable);
    }

    #[test]
    fn occupied_tile_scaled_when_ignored() {
        let mut grid = grid_with(&[(7, TileProperty::with_cost(2.0))]);
        assert!(grid.register_occupant(7, OccupantId(1)));
        let mut prefs = SearchPreferences::default();
        assert!(!evaluate_default(&grid, step_to(7), &prefs, SearchType::Ground).passable);

        prefs.ignore_occupants = true;
        prefs.occupant_cost_scale = 5.0;
        let a = evaluate_default(&grid, step_to(7), &prefs, SearchType::Ground);
        assert!(a.passable);
        assert_eq!(a.effective_cost(), 10.0);
    }

    #[test]
    fn obstacles_entered_at_stored_cost() {
        let grid = grid_with(&[(
            7,
            TileProperty {
                cost: 3.0,
                ..TileProperty::blocked()
            },
        )]);
        let mut prefs = SearchPreferences::default();
        assert!(!evaluate_default(&grid, step_to(7), &prefs, SearchType::Ground).passable);
        prefs.ignore_obstacles = true;
        let ground = evaluate_default(&grid, step_to(7), &prefs, SearchType::Ground);
        assert!(ground.passable);
        assert_eq!(ground.cost, 3.0);
        let fly = evaluate_default(&grid, step_to(7), &prefs, SearchType::Fly);
        assert_eq!(fly.cost, 1.0);
    }

    #[test]
    fn custom_policy_can_wrap_default() {
        struct NoNorth;
        impl TraversalPolicy for NoNorth {
            fn evaluate(
                &self,
                grid: &Grid,
                step: Step,
                prefs: &SearchPreferences,
                search_type: SearchType,
            ) -> NodeAccess {
                if step.direction == Direction::North {
                    return NodeAccess::BLOCKED;
                }
                evaluate_default(grid, step, prefs, search_type)
            }
        }

        let grid = grid_with(&[]);
        let prefs = SearchPreferences::default();
        let policy = NoNorth;
        let by_ref = &policy;
        assert!(!by_ref.evaluate(&grid, step_to(7), &prefs, SearchType::Ground).passable);
        let east = Step {
            direction: Direction::East,
            ..step_to(5)
        };
        assert!(by_ref.evaluate(&grid, east, &prefs, SearchType::Ground).passable);
    }
}
