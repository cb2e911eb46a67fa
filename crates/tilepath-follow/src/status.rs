use std::fmt;

/// Lifecycle state of a [`PathFollower`](crate::PathFollower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FollowStatus {
    #[default]
    Idle,
    /// A move was requested but its path has not arrived yet.
    Waiting,
    Moving,
    Paused,
}

/// Why a move was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbortReason {
    /// Superseded by a newer move request.
    NewRequest,
    /// The path or the agent's movement capability went away.
    InvalidPath,
    /// No path was delivered before the waiting timeout.
    WaitingTimeout,
}

/// How a move ended. Reported exactly once per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathResult {
    Success,
    Aborted(AbortReason),
    /// No forward progress over the block-detection window.
    Blocked,
    /// Resume was asked for with no path to follow.
    OffPath,
}

impl PathResult {
    #[inline]
    pub fn is_success(self) -> bool {
        self == PathResult::Success
    }
}

/// Identifier of a move request. Increases with every accepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequestId(pub u32);

impl MoveRequestId {
    /// Id of a follower that never accepted a request.
    pub const NONE: Self = Self(0);

    pub(crate) fn next(self) -> Self {
        match self.0.wrapping_add(1) {
            0 => Self(1),
            n => Self(n),
        }
    }
}

impl fmt::Display for MoveRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_skip_zero_on_wrap() {
        assert_eq!(MoveRequestId::NONE.next(), MoveRequestId(1));
        assert_eq!(MoveRequestId(u32::MAX).next(), MoveRequestId(1));
        assert_eq!(MoveRequestId(7).to_string(), "#7");
    }
}
