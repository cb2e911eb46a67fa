use std::time::Instant;

use log::{debug, trace, warn};

use crate::PathSearch;
use crate::result::{SearchResult, SearchState};
use crate::traits::{SearchKind, SearchObserver, TraversalPolicy};

impl<P: TraversalPolicy, O: SearchObserver> PathSearch<'_, P, O> {
    /// Rebuild the path from `start` to `end` out of a range-search result.
    ///
    /// With `stop_adjacent`, every neighbor of `end` that was reached and is
    /// not in `excluded` is tried, and the cheapest path wins.
    pub fn retrace(
        &self,
        start: usize,
        end: usize,
        stop_adjacent: bool,
        excluded: &[usize],
        range: &SearchResult,
    ) -> SearchResult {
        let timer = Instant::now();
        let result = self.retrace_inner(start, end, stop_adjacent, excluded, range);
        self.observer
            .on_search_finished(SearchKind::Retrace, result.state, 0, timer.elapsed());
        result
    }

    fn retrace_inner(
        &self,
        start: usize,
        end: usize,
        stop_adjacent: bool,
        excluded: &[usize],
        range: &SearchResult,
    ) -> SearchResult {
        trace!("retrace {start} -> {end} (stop_adjacent={stop_adjacent})");
        if start == end {
            return SearchResult::with_state(SearchState::AlreadyAtGoal);
        }
        let parent_of = |i| range.parent_of(i);
        let cost_of = |i| range.cost_of(i);

        if !stop_adjacent {
            if !range.contains(end) {
                debug!("retrace {start} -> {end}: end was not reached");
                return SearchResult::with_state(SearchState::SearchFail);
            }
            return self.trace_chain(start, end, parent_of, cost_of);
        }

        let neighbors = self.grid.neighbors(end);
        if neighbors.contains(start) {
            return SearchResult::with_state(SearchState::AlreadyAtGoal);
        }
        let mut best: Option<SearchResult> = None;
        for (_, n) in neighbors.iter() {
            if excluded.contains(&n) || !range.contains(n) {
                continue;
            }
            let candidate = self.trace_chain(start, n, parent_of, cost_of);
            match candidate.state {
                SearchState::InfiniteLoop => return candidate,
                SearchState::SearchSuccess => {
                    if best
                        .as_ref()
                        .is_none_or(|b| candidate.total_cost < b.total_cost)
                    {
                        best = Some(candidate);
                    }
                }
                _ => {}
            }
        }
        best.unwrap_or_else(|| {
            debug!("retrace {start} -> {end}: no reachable tile next to end");
            SearchResult::with_state(SearchState::SearchFail)
        })
    }

    /// Walk parent links from `end` back to `start` and lay the chain out in
    /// root→goal order.
    pub(crate) fn trace_chain(
        &self,
        start: usize,
        end: usize,
        parent_of: impl Fn(usize) -> Option<usize>,
        cost_of: impl Fn(usize) -> Option<f32>,
    ) -> SearchResult {
        let limit = self.grid.len();
        let mut chain = Vec::new();
        let mut current = end;
        while current != start {
            if chain.len() >= limit {
                warn!("parent chain from {end} exceeded {limit} steps without reaching {start}");
                return SearchResult::with_state(SearchState::InfiniteLoop);
            }
            chain.push(current);
            match parent_of(current) {
                Some(p) => current = p,
                None => {
                    debug!("parent chain from {end} broke at {current}");
                    return SearchResult::with_state(SearchState::SearchFail);
                }
            }
        }
        chain.reverse();

        let mut result = SearchResult::with_state(SearchState::SearchSuccess);
        let mut parent = start;
        let mut total = 0.0;
        for index in chain {
            let cost = cost_of(index).unwrap_or(0.0);
            total += cost;
            result.push(index, self.pos(index));
            result.parents.insert(index, parent);
            result.costs.insert(index, cost);
            result.accumulated.insert(index, total);
            parent = index;
        }
        result.total_cost = total;
        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tilepath_core::{Grid, GridConfig, TileProperty};

    use super::*;
    use crate::preferences::{SearchPreferences, SearchType};

    fn grid(w: usize, h: usize, props: &[(usize, TileProperty)]) -> Grid {
        let props: HashMap<_, _> = props.iter().copied().collect();
        let mut grid = Grid::default();
        grid.generate(GridConfig::square(w, h), &props).unwrap();
        grid
    }

    #[test]
    fn retrace_matches_range_costs() {
        let g = grid(5, 5, &[(12, TileProperty::with_cost(3.0)), (7, TileProperty::blocked())]);
        let search = PathSearch::new(&g);
        let prefs = SearchPreferences::default();
        let range = search.search_at_range(0, 10, &prefs, SearchType::Ground, 1.0);
        assert!(range.is_success());
        for &i in range.indices() {
            let r = search.retrace(0, i, false, &[], &range);
            assert_eq!(r.state(), SearchState::SearchSuccess, "node {i}");
            assert_eq!(Some(r.total_cost()), range.accumulated_cost_of(i), "node {i}");
            assert_eq!(r.last_index(), Some(i));
        }
    }

    #[test]
    fn degenerate_and_missing() {
        let g = grid(3, 3, &[]);
        let search = PathSearch::new(&g);
        let range = search.search_at_range(
            0,
            1,
            &SearchPreferences::orthogonal(),
            SearchType::Ground,
            1.0,
        );
        assert_eq!(search.retrace(0, 0, false, &[], &range).state(), SearchState::AlreadyAtGoal);
        assert_eq!(search.retrace(0, 8, false, &[], &range).state(), SearchState::SearchFail);
    }

    #[test]
    fn stop_adjacent_picks_cheapest_neighbor() {
        // 5 columns of 2; tile 8 is the far corner with neighbors 6, 7 and 9.
        let g = grid(5, 2, &[]);
        let search = PathSearch::new(&g);
        let prefs = SearchPreferences::orthogonal();
        let range = search.search_at_range(0, 20, &prefs, SearchType::Ground, 1.0);
        let end = 8;
        let r = search.retrace(0, end, true, &[], &range);
        assert!(r.is_success());
        let last = r.last_index().unwrap();
        assert!(g.neighbors(end).contains(last));
        let cheapest = g
            .neighbors(end)
            .iter()
            .filter_map(|(_, n)| range.accumulated_cost_of(n))
            .fold(f32::INFINITY, f32::min);
        assert_eq!(r.total_cost(), cheapest);

        // Excluding the chosen tile forces another neighbor.
        let other = search.retrace(0, end, true, &[last], &range);
        assert!(other.is_success());
        assert_ne!(other.last_index(), Some(last));
    }

    #[test]
    fn stop_adjacent_when_already_adjacent() {
        let g = grid(3, 3, &[]);
        let search = PathSearch::new(&g);
        let range = search.search_at_range(
            4,
            3,
            &SearchPreferences::default(),
            SearchType::Ground,
            1.0,
        );
        assert_eq!(search.retrace(4, 5, true, &[], &range).state(), SearchState::AlreadyAtGoal);
    }

    #[test]
    fn corrupt_chain_reports_infinite_loop() {
        let g = grid(3, 3, &[]);
        let mut range = SearchResult::with_state(SearchState::SearchSuccess);
        range.parents.insert(1, 2);
        range.parents.insert(2, 1);
        let search = PathSearch::new(&g);
        assert_eq!(search.retrace(0, 1, false, &[], &range).state(), SearchState::InfiniteLoop);
    }
}
