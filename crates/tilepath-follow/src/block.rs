use std::collections::VecDeque;

use tilepath_core::Vec3;

use crate::config::BlockDetectionConfig;

/// Ring buffer of recent agent locations.
#[derive(Debug, Clone, Default)]
pub(crate) struct BlockDetector {
    samples: VecDeque<Vec3>,
    since_sample: f32,
}

impl BlockDetector {
    pub(crate) fn reset(&mut self) {
        self.samples.clear();
        self.since_sample = 0.0;
    }

    /// Record `location` if a sample is due. Returns whether one was taken.
    pub(crate) fn update(&mut self, cfg: &BlockDetectionConfig, location: Vec3, dt: f32) -> bool {
        if cfg.sample_count == 0 {
            return false;
        }
        self.since_sample += dt;
        if !self.samples.is_empty() && self.since_sample < cfg.interval {
            return false;
        }
        self.since_sample = 0.0;
        if self.samples.len() >= cfg.sample_count {
            self.samples.pop_front();
        }
        self.samples.push_back(location);
        true
    }

    /// Whether a full window of samples stayed within `distance` of its
    /// centroid.
    pub(crate) fn is_blocked(&self, cfg: &BlockDetectionConfig) -> bool {
        if cfg.sample_count == 0 || self.samples.len() < cfg.sample_count {
            return false;
        }
        let sum = self.samples.iter().fold(Vec3::ZERO, |acc, &p| acc + p);
        let centroid = sum / self.samples.len() as f32;
        let limit = cfg.distance * cfg.distance;
        self.samples
            .iter()
            .all(|p| p.distance_squared(centroid) <= limit)
    }
}
