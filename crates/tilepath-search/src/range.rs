use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use log::{debug, trace};

use crate::PathSearch;
use crate::neighbors::Expander;
use crate::node::{Node, NodeRef};
use crate::preferences::{SearchPreferences, SearchType};
use crate::result::{SearchResult, SearchState};
use crate::traits::{SearchKind, SearchObserver, TraversalPolicy};

impl<P: TraversalPolicy, O: SearchObserver> PathSearch<'_, P, O> {
    /// Every tile reachable from `start` within a cost budget.
    ///
    /// A tile is admitted when its accumulated entry cost is at most
    /// `max_range * default_cost`, or `max_range` when costs are uniform
    /// (forced to one, or flying). `default_cost` is clamped to at least 1.
    /// The result holds a search tree for [`retrace`](Self::retrace).
    pub fn search_at_range(
        &self,
        start: usize,
        max_range: u32,
        prefs: &SearchPreferences,
        search_type: SearchType,
        default_cost: f32,
    ) -> SearchResult {
        let timer = Instant::now();
        let (result, expanded) =
            self.search_at_range_inner(start, max_range, prefs, search_type, default_cost);
        self.observer
            .on_search_finished(SearchKind::Range, result.state, expanded, timer.elapsed());
        result
    }

    fn search_at_range_inner(
        &self,
        start: usize,
        max_range: u32,
        prefs: &SearchPreferences,
        search_type: SearchType,
        default_cost: f32,
    ) -> (SearchResult, usize) {
        trace!("range search from {start}, range {max_range} ({search_type:?})");
        let grid = self.grid;
        if !grid.contains(start) {
            debug!("range search from {start}: index outside grid of {} tiles", grid.len());
            return (SearchResult::with_state(SearchState::SearchFail), 0);
        }

        let uniform = prefs.override_cost_to_one || search_type == SearchType::Fly;
        let default_cost = if default_cost >= 1.0 { default_cost } else { 1.0 };
        let budget = if uniform {
            max_range as f32
        } else {
            max_range as f32 * default_cost
        };

        let mut nodes: HashMap<usize, Node> = HashMap::new();
        nodes.insert(start, Node::START);
        let mut seq = 0u64;
        let mut open = BinaryHeap::new();
        open.push(NodeRef {
            idx: start,
            f: 0.0,
            seq,
        });

        let mut expander = Expander::new(grid, &self.policy, prefs, search_type);
        let mut result = SearchResult::with_state(SearchState::SearchFail);
        let cap = grid.len();
        let mut expanded = 0usize;

        while let Some(current) = open.pop() {
            let ci = current.idx;
            let Some(node) = nodes.get_mut(&ci) else {
                continue;
            };
            if node.closed {
                continue;
            }
            if expanded >= cap {
                debug!("range search from {start}: stopped after {cap} expansions");
                break;
            }
            node.closed = true;
            let current_node = *node;
            expanded += 1;
            self.observer.on_expand(ci);

            if let Some(parent) = current_node.parent {
                result.push(ci, self.pos(ci));
                result.parents.insert(ci, parent);
                result.costs.insert(ci, current_node.entry_cost);
                result.accumulated.insert(ci, current_node.accumulated);
            }

            for cand in expander.expand(ci) {
                if cand.index == start {
                    continue;
                }
                let tentative = current_node.accumulated + cand.entry_cost;
                if tentative > budget {
                    continue;
                }
                let n = nodes.entry(cand.index).or_default();
                if n.closed || tentative >= n.accumulated {
                    continue;
                }
                n.g = tentative;
                n.accumulated = tentative;
                n.entry_cost = cand.entry_cost;
                n.parent = Some(ci);

                seq += 1;
                open.push(NodeRef {
                    idx: cand.index,
                    f: tentative,
                    seq,
                });
            }
        }

        if !result.is_empty() {
            result.state = SearchState::SearchSuccess;
        } else {
            debug!("range search from {start}: nothing reachable within {budget}");
        }
        result.obstacles = expander.obstacles;
        trace!(
            "range search from {start}: {} reached, {expanded} expanded",
            result.len()
        );
        (result, expanded)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use proptest::prelude::*;
    use tilepath_core::{Grid, GridConfig, TileProperty};

    use super::*;

    fn grid(w: usize, h: usize, props: &[(usize, TileProperty)]) -> Grid {
        let props: HashMap<_, _> = props.iter().copied().collect();
        let mut grid = Grid::default();
        grid.generate(GridConfig::square(w, h), &props).unwrap();
        grid
    }

    #[test]
    fn orthogonal_diamond() {
        let g = grid(5, 5, &[]);
        let r = PathSearch::new(&g).search_at_range(
            12,
            1,
            &SearchPreferences::orthogonal(),
            SearchType::Ground,
            1.0,
        );
        assert!(r.is_success());
        let reached: BTreeSet<_> = r.indices().iter().copied().collect();
        assert_eq!(reached, BTreeSet::from([7, 11, 13, 17]));
        assert!(!r.contains(12));
        assert_eq!(r.parent_of(7), Some(12));
        assert_eq!(r.cost_of(7), Some(1.0));
    }

    #[test]
    fn expansion_order_is_by_cost() {
        let g = grid(5, 5, &[]);
        let r = PathSearch::new(&g).search_at_range(
            0,
            3,
            &SearchPreferences::orthogonal(),
            SearchType::Ground,
            1.0,
        );
        let costs: Vec<_> = r
            .indices()
            .iter()
            .map(|&i| r.accumulated_cost_of(i).unwrap())
            .collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(r.len(), 9);
    }

    #[test]
    fn default_cost_widens_budget() {
        let g = grid(5, 1, &[(1, TileProperty::with_cost(2.0)), (2, TileProperty::with_cost(2.0))]);
        let search = PathSearch::new(&g);
        let prefs = SearchPreferences::default();
        let r = search.search_at_range(0, 2, &prefs, SearchType::Ground, 1.0);
        assert_eq!(r.indices(), &[1]);
        let r = search.search_at_range(0, 2, &prefs, SearchType::Ground, 2.0);
        assert_eq!(r.indices(), &[1, 2]);
        // Clamped up to 1.
        let r = search.search_at_range(0, 2, &prefs, SearchType::Ground, 0.25);
        assert_eq!(r.indices(), &[1]);

        let mut uniform = prefs.clone();
        uniform.override_cost_to_one = true;
        let r = search.search_at_range(0, 2, &uniform, SearchType::Ground, 10.0);
        assert_eq!(r.indices(), &[1, 2]);
    }

    #[test]
    fn isolated_start_fails() {
        let g = grid(
            3,
            3,
            &[
                (1, TileProperty::blocked()),
                (3, TileProperty::blocked()),
                (4, TileProperty::blocked()),
            ],
        );
        let prefs = SearchPreferences::default().recording_obstacles();
        let r = PathSearch::new(&g).search_at_range(0, 5, &prefs, SearchType::Ground, 1.0);
        assert_eq!(r.state(), SearchState::SearchFail);
        let mut obstacles: Vec<_> = r.obstacles().collect();
        obstacles.sort_unstable();
        assert_eq!(obstacles, vec![1, 3]);
    }

    #[test]
    fn zero_cost_tiles_terminate() {
        let props: Vec<_> = (0..25).map(|i| (i, TileProperty::with_cost(0.0))).collect();
        let g = grid(5, 5, &props);
        let r = PathSearch::new(&g).search_at_range(
            0,
            0,
            &SearchPreferences::default(),
            SearchType::Ground,
            1.0,
        );
        assert_eq!(r.len(), 24);
    }

    proptest! {
        #[test]
        fn reached_set_grows_with_range(
            w in 2usize..8,
            h in 2usize..8,
            seed in proptest::collection::vec((0usize..64, 0u8..4), 0..20),
            start in 0usize..64,
            range in 0u32..6,
            diagonal in any::<bool>(),
        ) {
            let len = w * h;
            let props: Vec<_> = seed
                .iter()
                .filter(|(i, _)| *i < len)
                .map(|&(i, kind)| {
                    let p = match kind {
                        0 => TileProperty::blocked(),
                        k => TileProperty::with_cost(k as f32),
                    };
                    (i, p)
                })
                .collect();
            let g = grid(w, h, &props);
            let start = start % len;
            let mut prefs = SearchPreferences::default();
            prefs.allow_diagonal = diagonal;
            let search = PathSearch::new(&g);
            let small = search.search_at_range(start, range, &prefs, SearchType::Ground, 1.0);
            let large = search.search_at_range(start, range + 1, &prefs, SearchType::Ground, 1.0);
            for &i in small.indices() {
                prop_assert!(
                    large.contains(i),
                    "{} reached at range {} but not {}",
                    i,
                    range,
                    range + 1
                );
            }
        }
    }
}
