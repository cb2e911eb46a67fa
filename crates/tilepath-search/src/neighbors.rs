use indexmap::IndexSet;
use smallvec::SmallVec;
use tilepath_core::{Direction, Grid, GridType};

use crate::preferences::{SearchPreferences, SearchType};
use crate::traits::{Step, TraversalPolicy};

/// A neighbor accepted for expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) index: usize,
    /// Cost recorded for entering the tile.
    pub(crate) entry_cost: f32,
    /// Whether the step costs a flat 1 (forced uniform cost, or flying).
    pub(crate) uniform: bool,
}

/// Cached neighbor gathering for one search call.
///
/// Applies the traversal policy, the diagonal switch and the corner-cutting
/// rule, and collects rejected neighbors when asked to.
pub(crate) struct Expander<'a, P> {
    grid: &'a Grid,
    policy: &'a P,
    prefs: &'a SearchPreferences,
    search_type: SearchType,
    buf: SmallVec<[Candidate; 8]>,
    pub(crate) obstacles: IndexSet<usize>,
}

impl<'a, P: TraversalPolicy> Expander<'a, P> {
    pub(crate) fn new(
        grid: &'a Grid,
        policy: &'a P,
        prefs: &'a SearchPreferences,
        search_type: SearchType,
    ) -> Self {
        Self {
            grid,
            policy,
            prefs,
            search_type,
            buf: SmallVec::new(),
            obstacles: IndexSet::new(),
        }
    }

    /// Passable neighbors of `current`.
    pub(crate) fn expand(&mut self, current: usize) -> &[Candidate] {
        self.buf.clear();
        let square = self.grid.grid_type() == GridType::Square;
        let neighbors = self.grid.neighbors(current);

        if self.search_type == SearchType::Fly {
            for (dir, index) in neighbors.iter() {
                if square && dir.is_diagonal() && !self.prefs.allow_diagonal {
                    continue;
                }
                self.buf.push(Candidate {
                    index,
                    entry_cost: 1.0,
                    uniform: true,
                });
            }
            return &self.buf;
        }

        let mut open = [false; 8];
        // Orthogonal steps first so diagonals can check their components.
        let passes: [&[Direction]; 2] = if square {
            [&Direction::ORTHOGONAL, &DIAGONALS]
        } else {
            [&Direction::ALL, &[]]
        };
        for dirs in passes {
            for &dir in dirs {
                let Some(index) = neighbors.get(dir) else {
                    continue;
                };
                if square && dir.is_diagonal() {
                    if !self.prefs.allow_diagonal {
                        continue;
                    }
                    if let Some((a, b)) = dir.components() {
                        if !(open[a.slot()] && open[b.slot()]) {
                            continue;
                        }
                    }
                }
                let step = Step {
                    from: current,
                    to: index,
                    direction: dir,
                };
                let access = self
                    .policy
                    .evaluate(self.grid, step, self.prefs, self.search_type);
                if !access.passable {
                    if self.prefs.record_obstacles {
                        self.obstacles.insert(index);
                    }
                    continue;
                }
                open[dir.slot()] = true;
                let uniform = self.prefs.override_cost_to_one;
                self.buf.push(Candidate {
                    index,
                    entry_cost: if uniform { 1.0 } else { access.effective_cost() },
                    uniform,
                });
            }
        }
        &self.buf
    }
}

const DIAGONALS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];
