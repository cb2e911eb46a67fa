//! Segment-by-segment path following.
//!
//! A [`PathFollower`] walks an agent along a [`FollowPath`] one tile-to-tile
//! segment at a time. Segment `i` leads from point `i - 1` (or the agent's
//! location for the first one) to point `i`. Pause requests are deferred to
//! the next segment boundary, so an agent is never frozen between two tiles.

use log::debug;
use tilepath_core::Vec3;

use crate::agent::MovementAgent;
use crate::block::BlockDetector;
use crate::config::FollowerConfig;
use crate::error::MoveRequestError;
use crate::path::{FollowPath, MoveRequest};
use crate::status::{AbortReason, FollowStatus, MoveRequestId, PathResult};

/// Per-agent path-following session.
#[derive(Debug, Clone)]
pub struct PathFollower {
    config: FollowerConfig,
    status: FollowStatus,
    request_id: MoveRequestId,
    path: FollowPath,
    goal: Option<Vec3>,
    acceptance_radius: f32,
    /// Last path point outside the acceptance radius. Segments leading past
    /// it may finish early on the destination check.
    precise_check_start: Option<usize>,

    segment_start: usize,
    segment_end: usize,
    segment_direction: Vec3,
    segment_start_tile: Option<usize>,
    current_target: Option<Vec3>,

    pause_requested: bool,
    location_when_paused: Option<Vec3>,
    paused_at: Option<f32>,

    stop_on_finish: bool,
    lock_owner: Option<String>,
    waited: f32,
    clock: f32,
    block: BlockDetector,
}

impl PathFollower {
    pub fn new(config: FollowerConfig) -> Self {
        Self {
            config,
            status: FollowStatus::Idle,
            request_id: MoveRequestId::NONE,
            path: FollowPath::default(),
            goal: None,
            acceptance_radius: 0.0,
            precise_check_start: None,
            segment_start: 0,
            segment_end: 0,
            segment_direction: Vec3::ZERO,
            segment_start_tile: None,
            current_target: None,
            pause_requested: false,
            location_when_paused: None,
            paused_at: None,
            stop_on_finish: true,
            lock_owner: None,
            waited: 0.0,
            clock: 0.0,
            block: BlockDetector::default(),
        }
    }
}

impl Default for PathFollower {
    fn default() -> Self {
        Self::new(FollowerConfig::default())
    }
}

impl PathFollower {
    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    #[inline]
    pub fn status(&self) -> FollowStatus {
        self.status
    }

    /// Id of the most recent accepted request.
    #[inline]
    pub fn request_id(&self) -> MoveRequestId {
        self.request_id
    }

    #[inline]
    pub fn path(&self) -> &FollowPath {
        &self.path
    }

    #[inline]
    pub fn goal(&self) -> Option<Vec3> {
        self.goal
    }

    #[inline]
    pub fn acceptance_radius(&self) -> f32 {
        self.acceptance_radius
    }

    /// Index of the current segment.
    #[inline]
    pub fn segment_start(&self) -> usize {
        self.segment_start
    }

    /// Index of the point after the current target, or the last point.
    #[inline]
    pub fn segment_end(&self) -> usize {
        self.segment_end
    }

    /// Unit direction of the current segment.
    #[inline]
    pub fn segment_direction(&self) -> Vec3 {
        self.segment_direction
    }

    /// Tile the current segment leads to, when the path carries tiles.
    #[inline]
    pub fn segment_start_tile(&self) -> Option<usize> {
        self.segment_start_tile
    }

    /// Position the agent was last told to steer at.
    #[inline]
    pub fn current_target(&self) -> Option<Vec3> {
        self.current_target
    }

    #[inline]
    pub fn is_pause_requested(&self) -> bool {
        self.pause_requested
    }

    #[inline]
    pub fn location_when_paused(&self) -> Option<Vec3> {
        self.location_when_paused
    }

    /// Follower time at which the current pause began.
    #[inline]
    pub fn paused_at(&self) -> Option<f32> {
        self.paused_at
    }

    /// Seconds of ticks seen by this follower.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.clock
    }

    // -----------------------------------------------------------------------
    // Resource lock
    // -----------------------------------------------------------------------

    /// Reserve movement for `owner`. Move requests are refused until
    /// [`unlock_resource`](Self::unlock_resource).
    pub fn lock_resource(&mut self, owner: impl Into<String>) {
        let owner = owner.into();
        debug!("movement locked by {owner}");
        self.lock_owner = Some(owner);
    }

    /// Release the lock, returning its owner.
    pub fn unlock_resource(&mut self) -> Option<String> {
        self.lock_owner.take()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock_owner.is_some()
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Start following `request.path`.
    ///
    /// A move already in progress is finished with
    /// [`AbortReason::NewRequest`] first, without stopping the agent. When
    /// paused on the same route, the paused move resumes instead and keeps
    /// its id.
    pub fn request_move<A: MovementAgent + ?Sized>(
        &mut self,
        agent: &mut A,
        request: MoveRequest,
    ) -> Result<MoveRequestId, MoveRequestError> {
        let radius = self.check_request(agent, request.acceptance_radius)?;
        if request.path.is_empty() {
            debug!("move request rejected: empty path");
            return Err(MoveRequestError::EmptyPath);
        }

        if self.status == FollowStatus::Paused && self.path.same_route(&request.path) {
            debug!("move request {} resumes the paused route", self.request_id);
            self.pause_requested = false;
            self.resume_path(agent);
            return Ok(self.request_id);
        }

        self.begin_request(agent);
        self.goal = request.goal;
        self.acceptance_radius = radius;
        self.start_path(agent, request.path);
        Ok(self.request_id)
    }

    /// Accept a move whose path is still being computed. The follower waits
    /// up to [`FollowerConfig::waiting_timeout`] for
    /// [`deliver_path`](Self::deliver_path).
    pub fn request_pending_move<A: MovementAgent + ?Sized>(
        &mut self,
        agent: &mut A,
        goal: Option<Vec3>,
        acceptance_radius: Option<f32>,
    ) -> Result<MoveRequestId, MoveRequestError> {
        let radius = self.check_request(agent, acceptance_radius)?;
        self.begin_request(agent);
        self.goal = goal;
        self.acceptance_radius = radius;
        self.set_status(FollowStatus::Waiting);
        Ok(self.request_id)
    }

    /// Hand over the path for a pending request.
    pub fn deliver_path<A: MovementAgent + ?Sized>(
        &mut self,
        agent: &mut A,
        id: MoveRequestId,
        path: FollowPath,
    ) -> Result<(), MoveRequestError> {
        if self.status != FollowStatus::Waiting {
            return Err(MoveRequestError::NotWaiting(self.status));
        }
        if id != self.request_id {
            return Err(MoveRequestError::StaleRequest {
                current: self.request_id,
                got: id,
            });
        }
        if path.is_empty() {
            return Err(MoveRequestError::EmptyPath);
        }
        self.start_path(agent, path);
        Ok(())
    }

    fn check_request<A: MovementAgent + ?Sized>(
        &self,
        agent: &A,
        acceptance_radius: Option<f32>,
    ) -> Result<f32, MoveRequestError> {
        if let Some(owner) = &self.lock_owner {
            debug!("move request rejected: locked by {owner}");
            return Err(MoveRequestError::ResourceLocked(owner.clone()));
        }
        let radius = acceptance_radius.unwrap_or(self.config.default_acceptance_radius);
        if !(radius >= 0.0) {
            debug!("move request rejected: acceptance radius {radius}");
            return Err(MoveRequestError::InvalidAcceptanceRadius(radius));
        }
        if !agent.has_movement_capability() {
            debug!("move request rejected: no movement capability");
            return Err(MoveRequestError::MissingMovementCapability);
        }
        Ok(radius)
    }

    /// Supersede any active move and take a fresh id.
    fn begin_request<A: MovementAgent + ?Sized>(&mut self, agent: &mut A) {
        if self.status != FollowStatus::Idle {
            // The new move keeps the agent going.
            self.stop_on_finish = false;
            self.finish(agent, PathResult::Aborted(AbortReason::NewRequest));
        }
        self.stop_on_finish = true;
        self.reset();
        self.request_id = self.request_id.next();
    }

    fn start_path<A: MovementAgent + ?Sized>(&mut self, agent: &mut A, path: FollowPath) {
        self.path = path;
        let destination = self.destination();
        self.precise_check_start = destination
            .and_then(|d| self.path.last_outside(d, self.acceptance_radius));
        debug!(
            "move {} accepted: {} points, radius {}",
            self.request_id,
            self.path.len(),
            self.acceptance_radius
        );
        self.set_status(FollowStatus::Moving);
        agent.on_begin_movement();
        self.set_move_segment(agent, 0);
    }

    // -----------------------------------------------------------------------
    // Pause / resume
    // -----------------------------------------------------------------------

    /// Ask for a pause at the next segment boundary. Only while moving.
    ///
    /// The flag stays set until movement resumes, and the agent is notified
    /// right away through [`MovementAgent::on_pause_movement`].
    pub fn request_pause<A: MovementAgent + ?Sized>(&mut self, agent: &mut A) -> bool {
        if self.status != FollowStatus::Moving {
            return false;
        }
        debug!("pause requested at segment {}", self.segment_start);
        self.pause_requested = true;
        agent.on_pause_movement();
        true
    }

    /// Pause right now, keeping the agent's velocity. Only while moving.
    pub fn pause_move<A: MovementAgent + ?Sized>(&mut self, agent: &mut A) -> bool {
        if self.status != FollowStatus::Moving {
            return false;
        }
        self.location_when_paused = Some(agent.location());
        self.paused_at = Some(self.clock);
        self.set_status(FollowStatus::Paused);
        true
    }

    /// Resume from `Paused` (or `Idle`), continuing with the next segment.
    ///
    /// An idle follower with nothing left to follow does nothing. A paused
    /// move whose path is gone ends with [`PathResult::OffPath`].
    /// When movement actually resumes, the pause request is cleared and the
    /// agent is notified through [`MovementAgent::on_resume_movement`].
    pub fn resume_move<A: MovementAgent + ?Sized>(&mut self, agent: &mut A) -> bool {
        if !matches!(self.status, FollowStatus::Idle | FollowStatus::Paused) {
            return false;
        }
        if self.status == FollowStatus::Idle && self.path.is_empty() {
            debug!("resume ignored: no active move");
            return false;
        }
        self.resume_path(agent);
        if self.status != FollowStatus::Moving {
            return false;
        }
        self.pause_requested = false;
        agent.on_resume_movement();
        true
    }

    fn resume_path<A: MovementAgent + ?Sized>(&mut self, agent: &mut A) {
        if self.path.is_empty() {
            self.finish(agent, PathResult::OffPath);
            return;
        }
        let next = self.segment_start + 1;
        if next >= self.path.len() {
            // Paused on the final point.
            self.finish(agent, PathResult::Success);
            return;
        }
        self.location_when_paused = None;
        self.paused_at = None;
        self.block.reset();
        self.set_status(FollowStatus::Moving);
        self.set_move_segment(agent, next);
    }

    /// Pause if one was asked for. Returns whether the path may advance.
    fn determine_path_status<A: MovementAgent + ?Sized>(&mut self, agent: &mut A) -> bool {
        if matches!(self.status, FollowStatus::Paused | FollowStatus::Idle) {
            return false;
        }
        if self.pause_requested || agent.should_pause_now(self.segment_start) {
            self.pause_move(agent);
        }
        self.status != FollowStatus::Paused
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the session by `dt` seconds.
    pub fn tick<A: MovementAgent + ?Sized>(&mut self, agent: &mut A, dt: f32) {
        let dt = dt.max(0.0);
        self.clock += dt;
        match self.status {
            FollowStatus::Waiting => {
                self.waited += dt;
                if self.waited >= self.config.waiting_timeout {
                    debug!("move {} timed out waiting for a path", self.request_id);
                    self.finish(agent, PathResult::Aborted(AbortReason::WaitingTimeout));
                }
                return;
            }
            FollowStatus::Moving => {}
            FollowStatus::Idle | FollowStatus::Paused => return,
        }
        self.update_path_segment(agent, dt);
    }

    fn update_path_segment<A: MovementAgent + ?Sized>(&mut self, agent: &mut A, dt: f32) {
        if self.path.is_empty() || !agent.has_movement_capability() {
            debug!("move {} lost its path or movement", self.request_id);
            self.finish(agent, PathResult::Aborted(AbortReason::InvalidPath));
            return;
        }

        let id = self.request_id;
        let location = agent.location();
        let segment = self.segment_start;
        let last_segment = segment + 1 >= self.path.len();

        if agent.collided_with_goal() {
            agent.on_segment_finished(segment);
            self.finish(agent, PathResult::Success);
        } else if self.precise_check_active() && self.reached_destination(location) {
            agent.on_segment_finished(segment);
            self.finish(agent, PathResult::Success);
        } else if let (true, true, Some(goal)) = (
            last_segment,
            self.config.move_to_goal_on_last_segment,
            self.goal,
        ) {
            self.current_target = Some(goal);
            agent.set_move_target(goal);
            agent.update_focus(Some(goal));
        } else if self.reached_current_target(location) {
            agent.on_segment_finished(segment);
            if last_segment {
                self.finish(agent, PathResult::Success);
            } else if self.determine_path_status(agent) {
                self.set_move_segment(agent, segment + 1);
            }
        }

        let detection = self.config.block_detection;
        if detection.enabled && self.status == FollowStatus::Moving && self.request_id == id {
            let sampled = self.block.update(&detection, location, dt);
            if sampled && self.block.is_blocked(&detection) {
                debug!("move {} blocked near {location}", self.request_id);
                self.finish(agent, PathResult::Blocked);
            }
        }
    }

    fn set_move_segment<A: MovementAgent + ?Sized>(&mut self, agent: &mut A, index: usize) {
        let Some(point) = self.path.get(index).copied() else {
            return;
        };
        let from = match index {
            0 => agent.location(),
            i => self
                .path
                .get(i - 1)
                .map_or(point.position, |p| p.position),
        };
        self.segment_start = index;
        self.segment_end = (index + 1).min(self.path.len() - 1);
        self.segment_start_tile = point.tile;
        self.segment_direction = (point.position - from).normalize_or_zero();
        self.current_target = Some(point.position);
        agent.set_move_target(point.position);
        agent.update_focus(Some(point.position));
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    fn finish<A: MovementAgent + ?Sized>(&mut self, agent: &mut A, result: PathResult) {
        debug!("move {} finished: {result:?}", self.request_id);
        let stop = self.stop_on_finish;
        self.reset();
        if stop {
            agent.stop_movement();
        }
        agent.update_focus(None);
        agent.on_path_finished(result);
    }

    fn reset(&mut self) {
        self.set_status(FollowStatus::Idle);
        self.path.clear();
        self.goal = None;
        self.precise_check_start = None;
        self.segment_start = 0;
        self.segment_end = 0;
        self.segment_direction = Vec3::ZERO;
        self.segment_start_tile = None;
        self.current_target = None;
        self.pause_requested = false;
        self.location_when_paused = None;
        self.paused_at = None;
        self.waited = 0.0;
        self.block.reset();
    }

    fn set_status(&mut self, status: FollowStatus) {
        if self.status != status {
            debug!("follower {:?} -> {status:?}", self.status);
            self.status = status;
        }
    }

    // -----------------------------------------------------------------------
    // Reach tests
    // -----------------------------------------------------------------------

    fn destination(&self) -> Option<Vec3> {
        self.goal.or_else(|| self.path.destination())
    }

    fn precise_check_active(&self) -> bool {
        self.precise_check_start
            .is_none_or(|start| self.segment_start > start)
    }

    fn reached_destination(&self, location: Vec3) -> bool {
        self.destination().is_some_and(|d| {
            location.distance_2d(d) <= self.acceptance_radius + self.config.reach_tolerance
        })
    }

    fn reached_current_target(&self, location: Vec3) -> bool {
        self.current_target
            .is_some_and(|t| location.distance_2d(t) <= self.config.reach_tolerance)
    }
}
