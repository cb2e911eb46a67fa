/// Stuck-agent detection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlockDetectionConfig {
    pub enabled: bool,
    /// Seconds between location samples.
    pub interval: f32,
    /// Samples needed before a verdict.
    pub sample_count: usize,
    /// The agent is blocked when every sample lies this close to their centroid.
    pub distance: f32,
}

impl Default for BlockDetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 0.5,
            sample_count: 10,
            distance: 10.0,
        }
    }
}

/// Per-agent path-following settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FollowerConfig {
    /// Acceptance radius used when a request does not give one.
    pub default_acceptance_radius: f32,
    /// Distance at which a segment target counts as reached.
    pub reach_tolerance: f32,
    /// On the last segment, steer at the request's goal rather than the
    /// last path point.
    pub move_to_goal_on_last_segment: bool,
    /// Seconds to wait for a path before aborting.
    pub waiting_timeout: f32,
    pub block_detection: BlockDetectionConfig,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            default_acceptance_radius: 0.0,
            reach_tolerance: 5.0,
            move_to_goal_on_last_segment: true,
            waiting_timeout: 6.0,
            block_detection: BlockDetectionConfig::default(),
        }
    }
}
