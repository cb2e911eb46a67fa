//! Path following for agents on `tilepath` grids.
//!
//! Feed a [`FollowPath`] (usually built from a
//! [`SearchResult`](tilepath_search::SearchResult)) to a [`PathFollower`] and
//! tick it once per frame with the agent, which implements
//! [`MovementAgent`].

mod agent;
mod block;
mod config;
mod error;
mod follower;
mod path;
mod status;

pub use agent::MovementAgent;
pub use config::{BlockDetectionConfig, FollowerConfig};
pub use error::MoveRequestError;
pub use follower::PathFollower;
pub use path::{FollowPath, MoveRequest, PathPoint};
pub use status::{AbortReason, FollowStatus, MoveRequestId, PathResult};
