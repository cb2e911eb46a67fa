use indexmap::{IndexMap, IndexSet};
use tilepath_core::Vec3;

/// Outcome tag of a search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    #[default]
    SearchFail,
    SearchSuccess,
    /// The start already satisfies the goal condition.
    AlreadyAtGoal,
    /// A parent chain ran longer than the grid; the search tree is corrupt.
    InfiniteLoop,
}

impl SearchState {
    /// Whether the caller got something to act on (a path, or nothing to do).
    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, SearchState::SearchSuccess | SearchState::AlreadyAtGoal)
    }
}

/// Result of one search call. Immutable once returned.
///
/// For A* and retrace, `positions`/`indices` hold the path in root→goal order,
/// excluding the start tile. For range search they hold every reached tile in
/// expansion order, again excluding the start.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub(crate) state: SearchState,
    pub(crate) positions: Vec<Vec3>,
    pub(crate) indices: Vec<usize>,
    pub(crate) parents: IndexMap<usize, usize>,
    pub(crate) costs: IndexMap<usize, f32>,
    pub(crate) accumulated: IndexMap<usize, f32>,
    pub(crate) total_cost: f32,
    pub(crate) obstacles: IndexSet<usize>,
}

impl SearchResult {
    pub(crate) fn with_state(state: SearchState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, index: usize, position: Vec3) {
        self.indices.push(index);
        self.positions.push(position);
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.state == SearchState::SearchSuccess
    }

    /// Tile positions in result order.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Tile indices, parallel to [`positions`](Self::positions).
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Last tile of the path, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Parent of `index` in the search tree.
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents.get(&index).copied()
    }

    /// Cost paid to enter `index`.
    pub fn cost_of(&self, index: usize) -> Option<f32> {
        self.costs.get(&index).copied()
    }

    /// Cost from the start to `index` along the search tree.
    pub fn accumulated_cost_of(&self, index: usize) -> Option<f32> {
        self.accumulated.get(&index).copied()
    }

    /// Sum of entry costs along the path. Zero for range results.
    #[inline]
    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }

    /// Number of tiles in the result.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether `index` was reached (has a parent in the search tree).
    pub fn contains(&self, index: usize) -> bool {
        self.parents.contains_key(&index)
    }

    /// Neighbors rejected by the traversal policy, when recording was asked
    /// for. Insertion order, no duplicates.
    pub fn obstacles(&self) -> impl Iterator<Item = usize> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result() {
        let r = SearchResult::with_state(SearchState::AlreadyAtGoal);
        assert!(r.state().is_ok());
        assert!(!r.is_success());
        assert!(r.is_empty());
        assert_eq!(r.total_cost(), 0.0);
        assert_eq!(r.last_index(), None);
        assert!(!r.contains(0));
    }

    #[test]
    fn default_is_fail() {
        assert_eq!(SearchResult::default().state(), SearchState::SearchFail);
        assert!(!SearchState::InfiniteLoop.is_ok());
    }
}
