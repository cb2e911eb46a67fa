use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use log::{debug, trace};

use crate::PathSearch;
use crate::distance::octile;
use crate::neighbors::Expander;
use crate::node::{Node, NodeRef};
use crate::preferences::{SearchPreferences, SearchType};
use crate::result::{SearchResult, SearchState};
use crate::traits::{SearchKind, SearchObserver, TraversalPolicy};

impl<P: TraversalPolicy, O: SearchObserver> PathSearch<'_, P, O> {
    /// Shortest path from `start` to `goal` using A*.
    ///
    /// With `stop_adjacent` the search ends on the first tile adjacent to
    /// `goal`. `cost_scale` multiplies tile costs in the priority and is
    /// clamped to at least 1. The path excludes `start`.
    pub fn astar(
        &self,
        start: usize,
        goal: usize,
        prefs: &SearchPreferences,
        stop_adjacent: bool,
        search_type: SearchType,
        cost_scale: f32,
    ) -> SearchResult {
        let timer = Instant::now();
        let (result, expanded) =
            self.astar_inner(start, goal, prefs, stop_adjacent, search_type, cost_scale);
        self.observer
            .on_search_finished(SearchKind::AStar, result.state, expanded, timer.elapsed());
        result
    }

    fn astar_inner(
        &self,
        start: usize,
        goal: usize,
        prefs: &SearchPreferences,
        stop_adjacent: bool,
        search_type: SearchType,
        cost_scale: f32,
    ) -> (SearchResult, usize) {
        trace!("astar {start} -> {goal} ({search_type:?}, stop_adjacent={stop_adjacent})");
        let grid = self.grid;
        if grid.is_empty() || !grid.contains(start) || !grid.contains(goal) {
            debug!("astar {start} -> {goal}: index outside grid of {} tiles", grid.len());
            return (SearchResult::with_state(SearchState::SearchFail), 0);
        }
        if start == goal {
            debug!("astar {start} -> {goal}: already at goal");
            return (SearchResult::with_state(SearchState::AlreadyAtGoal), 0);
        }
        let goal_neighbors = grid.neighbors(goal);
        if stop_adjacent && goal_neighbors.contains(start) {
            debug!("astar {start} -> {goal}: already adjacent to goal");
            return (SearchResult::with_state(SearchState::AlreadyAtGoal), 0);
        }

        let cost_scale = if cost_scale >= 1.0 { cost_scale } else { 1.0 };
        let goal_pos = self.pos(goal);

        let mut nodes: HashMap<usize, Node> = HashMap::new();
        nodes.insert(start, Node::START);

        let mut seq = 0u64;
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start,
            f: octile(self.pos(start), goal_pos),
            seq,
        });

        let mut expander = Expander::new(grid, &self.policy, prefs, search_type);
        let mut expanded = 0usize;

        let terminal = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search None;
            };
            let ci = current.idx;

            // Skip stale entries.
            let Some(node) = nodes.get_mut(&ci) else {
                continue;
            };
            if node.closed {
                continue;
            }

            let reached = if stop_adjacent {
                goal_neighbors.contains(ci)
            } else {
                ci == goal
            };
            if reached {
                break 'search Some(ci);
            }

            node.closed = true;
            let (current_g, current_acc) = (node.g, node.accumulated);
            let current_pos = self.pos(ci);
            expanded += 1;
            self.observer.on_expand(ci);

            for cand in expander.expand(ci) {
                let next_pos = self.pos(cand.index);
                let n = nodes.entry(cand.index).or_default();
                if n.closed {
                    continue;
                }
                let terrain = if cand.uniform {
                    1.0
                } else {
                    cand.entry_cost * cost_scale
                };
                let tentative_g = current_g + octile(current_pos, next_pos) + terrain;
                if tentative_g >= n.g {
                    continue;
                }
                n.g = tentative_g;
                n.parent = Some(ci);
                n.entry_cost = cand.entry_cost;
                n.accumulated = current_acc + cand.entry_cost;

                seq += 1;
                open.push(NodeRef {
                    idx: cand.index,
                    f: tentative_g + octile(next_pos, goal_pos),
                    seq,
                });
            }
        };

        let mut result = match terminal {
            Some(end) => self.trace_chain(
                start,
                end,
                |i| nodes.get(&i).and_then(|n| n.parent),
                |i| nodes.get(&i).map(|n| n.entry_cost),
            ),
            None => {
                debug!("astar {start} -> {goal}: no path after {expanded} expansions");
                SearchResult::with_state(SearchState::SearchFail)
            }
        };
        result.obstacles = expander.obstacles;
        if result.is_success() {
            trace!(
                "astar {start} -> {goal}: {} steps, cost {:.2}, {expanded} expanded",
                result.len(),
                result.total_cost
            );
        }
        (result, expanded)
    }
}
