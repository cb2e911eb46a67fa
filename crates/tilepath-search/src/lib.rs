//! Search engine over `tilepath-core` grids.
//!
//! [`PathSearch`] borrows a [`Grid`](tilepath_core::Grid) and answers three
//! kinds of queries, each returning an owned [`SearchResult`]:
//!
//! - [`PathSearch::astar`]: shortest path between two tiles;
//! - [`PathSearch::search_at_range`]: every tile reachable within a budget;
//! - [`PathSearch::retrace`]: a path rebuilt from a range result.
//!
//! Which tiles may be entered, and at what cost, is decided by a
//! [`TraversalPolicy`]; [`SearchObserver`] receives expansion and completion
//! events.

mod astar;
mod distance;
mod neighbors;
mod node;
mod preferences;
mod range;
mod result;
mod retrace;
mod stats;
mod traits;

pub use distance::octile;
pub use node::PathSearch;
pub use preferences::{NodeAccess, SearchPreferences, SearchType};
pub use result::{SearchResult, SearchState};
pub use stats::{SearchStats, StatsSnapshot};
pub use traits::{
    DefaultPolicy, NoopObserver, SearchKind, SearchObserver, Step, TraversalPolicy,
    evaluate_default,
};
