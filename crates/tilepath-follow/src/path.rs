//! Paths handed to the follower.

use tilepath_core::Vec3;
use tilepath_search::SearchResult;

/// One point of a path: a world position and, when known, its tile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPoint {
    pub position: Vec3,
    pub tile: Option<usize>,
}

impl PathPoint {
    pub fn new(position: Vec3, tile: Option<usize>) -> Self {
        Self { position, tile }
    }
}

impl From<Vec3> for PathPoint {
    fn from(position: Vec3) -> Self {
        Self {
            position,
            tile: None,
        }
    }
}

/// Ordered path points. Segment `i` leads to point `i`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowPath {
    points: Vec<PathPoint>,
}

impl FollowPath {
    pub fn new(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&PathPoint> {
        self.points.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of the final point.
    pub fn destination(&self) -> Option<Vec3> {
        self.points.last().map(|p| p.position)
    }

    /// Whether both paths visit the same positions in the same order.
    pub fn same_route(&self, other: &FollowPath) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.position == b.position)
    }

    /// Index of the last point farther than `radius` from `destination`.
    pub(crate) fn last_outside(&self, destination: Vec3, radius: f32) -> Option<usize> {
        self.points
            .iter()
            .rposition(|p| p.position.distance_2d(destination) > radius)
    }

    pub(crate) fn clear(&mut self) {
        self.points.clear();
    }
}

impl From<&SearchResult> for FollowPath {
    fn from(result: &SearchResult) -> Self {
        let points = result
            .positions()
            .iter()
            .zip(result.indices())
            .map(|(&position, &tile)| PathPoint::new(position, Some(tile)))
            .collect();
        Self { points }
    }
}

impl FromIterator<Vec3> for FollowPath {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(PathPoint::from).collect(),
        }
    }
}

/// A request to follow a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveRequest {
    pub path: FollowPath,
    /// Falls back to [`FollowerConfig::default_acceptance_radius`](crate::FollowerConfig).
    pub acceptance_radius: Option<f32>,
    /// Literal goal location, when it differs from the last path point.
    pub goal: Option<Vec3>,
}

impl MoveRequest {
    pub fn new(path: impl Into<FollowPath>) -> Self {
        Self {
            path: path.into(),
            acceptance_radius: None,
            goal: None,
        }
    }

    pub fn with_acceptance_radius(mut self, radius: f32) -> Self {
        self.acceptance_radius = Some(radius);
        self
    }

    pub fn with_goal(mut self, goal: Vec3) -> Self {
        self.goal = Some(goal);
        self
    }
}
