use std::cmp::Ordering;

use tilepath_core::{Grid, Vec3};

use crate::traits::{DefaultPolicy, NoopObserver, SearchObserver, TraversalPolicy};

// ---------------------------------------------------------------------------
// Internal node for A*/range priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    /// Priority-queue cost from the start.
    pub(crate) g: f32,
    /// Cost paid to enter this node.
    pub(crate) entry_cost: f32,
    /// Sum of entry costs from the start.
    pub(crate) accumulated: f32,
    pub(crate) parent: Option<usize>,
    pub(crate) closed: bool,
}

impl Node {
    pub(crate) const START: Self = Self {
        g: 0.0,
        entry_cost: 0.0,
        accumulated: 0.0,
        parent: None,
        closed: false,
    };
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            entry_cost: 0.0,
            accumulated: f32::INFINITY,
            parent: None,
            closed: false,
        }
    }
}

/// Heap entry ordered by `f`, then by insertion sequence.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f32,
    pub(crate) seq: u64,
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first, and the
        // earliest pushed among equals.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// PathSearch
// ---------------------------------------------------------------------------

/// Stateless search front-end over a borrowed grid.
///
/// Every call allocates its own working set, so one `PathSearch` (or several
/// sharing the same `&Grid`) may be used from many threads at once as long as
/// the grid is not mutated meanwhile.
#[derive(Debug, Clone)]
pub struct PathSearch<'g, P = DefaultPolicy, O = NoopObserver> {
    pub(crate) grid: &'g Grid,
    pub(crate) policy: P,
    pub(crate) observer: O,
}

impl<'g> PathSearch<'g> {
    /// Search `grid` with the default traversal rules.
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            policy: DefaultPolicy,
            observer: NoopObserver,
        }
    }
}

impl<'g, P: TraversalPolicy, O: SearchObserver> PathSearch<'g, P, O> {
    /// Replace the traversal policy.
    pub fn with_policy<Q: TraversalPolicy>(self, policy: Q) -> PathSearch<'g, Q, O> {
        PathSearch {
            grid: self.grid,
            policy,
            observer: self.observer,
        }
    }

    /// Replace the observer.
    pub fn with_observer<U: SearchObserver>(self, observer: U) -> PathSearch<'g, P, U> {
        PathSearch {
            grid: self.grid,
            policy: self.policy,
            observer,
        }
    }

    #[inline]
    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Position of a tile known to be in range.
    #[inline]
    pub(crate) fn pos(&self, index: usize) -> Vec3 {
        self.grid.position(index).unwrap_or(Vec3::ZERO)
    }
}
