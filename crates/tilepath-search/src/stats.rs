//! Counters for search activity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::result::SearchState;
use crate::traits::{SearchKind, SearchObserver};

/// A [`SearchObserver`] that tallies searches with atomic counters, so one
/// instance can be shared by searches running on several threads.
#[derive(Debug, Default)]
pub struct SearchStats {
    searches: AtomicU64,
    failures: AtomicU64,
    expanded: AtomicU64,
    elapsed_nanos: AtomicU64,
}

/// A point-in-time copy of [`SearchStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    pub searches: u64,
    pub failures: u64,
    pub expanded: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            expanded: self.expanded.load(Ordering::Relaxed),
            elapsed: Duration::from_nanos(self.elapsed_nanos.load(Ordering::Relaxed)),
        }
    }

    pub fn reset(&self) {
        self.searches.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.expanded.store(0, Ordering::Relaxed);
        self.elapsed_nanos.store(0, Ordering::Relaxed);
    }
}

impl SearchObserver for SearchStats {
    fn on_expand(&self, _index: usize) {
        self.expanded.fetch_add(1, Ordering::Relaxed);
    }

    fn on_search_finished(
        &self,
        _kind: SearchKind,
        state: SearchState,
        _expanded: usize,
        elapsed: Duration,
    ) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        if matches!(state, SearchState::SearchFail | SearchState::InfiniteLoop) {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use tilepath_core::{Grid, GridConfig};

    use super::*;
    use crate::{PathSearch, SearchPreferences, SearchType};

    #[test]
    fn counts_searches_and_failures() {
        let grid = Grid::new(GridConfig::square(4, 4)).unwrap();
        let stats = SearchStats::new();
        let search = PathSearch::new(&grid).with_observer(&stats);
        let prefs = SearchPreferences::default();

        let ok = search.astar(0, 15, &prefs, false, SearchType::Ground, 1.0);
        assert!(ok.is_success());
        let bad = search.astar(0, 99, &prefs, false, SearchType::Ground, 1.0);
        assert!(!bad.is_success());

        let snap = stats.snapshot();
        assert_eq!(snap.searches, 2);
        assert_eq!(snap.failures, 1);
        assert!(snap.expanded >= 3);

        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }
}
