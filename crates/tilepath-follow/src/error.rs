//! Move request rejections.

use thiserror::Error;

use crate::status::{FollowStatus, MoveRequestId};

/// Why a move request was refused. The follower is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveRequestError {
    #[error("move request has no path points")]
    EmptyPath,
    #[error("movement is locked by {0}")]
    ResourceLocked(String),
    #[error("invalid acceptance radius {0}")]
    InvalidAcceptanceRadius(f32),
    #[error("agent has no movement capability")]
    MissingMovementCapability,
    /// A path was delivered for a request that is no longer current.
    #[error("request {got} is stale, current request is {current}")]
    StaleRequest {
        current: MoveRequestId,
        got: MoveRequestId,
    },
    #[error("follower is not waiting for a path (status {0:?})")]
    NotWaiting(FollowStatus),
}
