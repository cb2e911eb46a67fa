use tilepath_core::Vec3;

use crate::status::PathResult;

/// The host side of path following: the movement executor plus the agent
/// callback surface.
///
/// The follower only reads [`location`](Self::location) and writes the next
/// target; locomotion is up to the implementor. Every callback defaults to
/// a no-op.
pub trait MovementAgent {
    /// Current world position.
    fn location(&self) -> Vec3;

    /// Steer toward `target` until told otherwise.
    fn set_move_target(&mut self, target: Vec3);

    /// Halt immediately.
    fn stop_movement(&mut self) {}

    fn has_movement_capability(&self) -> bool {
        true
    }

    /// Whether the agent touched the goal during the last step.
    fn collided_with_goal(&self) -> bool {
        false
    }

    /// Polled at every tile boundary while moving.
    fn should_pause_now(&self, _segment: usize) -> bool {
        false
    }

    /// Where the agent should face, or `None` to clear.
    fn update_focus(&mut self, _focus: Option<Vec3>) {}

    fn on_begin_movement(&mut self) {}

    fn on_segment_finished(&mut self, _segment: usize) {}

    fn on_path_finished(&mut self, _result: PathResult) {}

    fn on_pause_movement(&mut self) {}

    fn on_resume_movement(&mut self) {}
}
