use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::contact::ContactRule;
use crate::obstacle::ObstacleKind;

/// Travel time of each obstacle kind from lane start to lane end, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindDurations {
    pub linear: f32,
    pub proximity: f32,
    pub sweep: f32,
    pub long: f32,
    pub rock: f32,
}

impl Default for KindDurations {
    fn default() -> Self {
        Self {
            linear: 6.0,
            proximity: 8.0,
            sweep: 9.0,
            long: 7.0,
            rock: 5.0,
        }
    }
}

impl KindDurations {
    pub fn get(&self, kind: ObstacleKind) -> f32 {
        match kind {
            ObstacleKind::LinearEnemy => self.linear,
            ObstacleKind::ProximityEnemy => self.proximity,
            ObstacleKind::SweepHazard => self.sweep,
            ObstacleKind::LongEnemy => self.long,
            ObstacleKind::Rock => self.rock,
        }
    }
}

/// Tunables for one run. Every field has a default, so a partial JSON
/// document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReefConfig {
    pub scene_width: f32,
    pub scene_height: f32,
    pub lane_count: usize,
    /// Seconds between spawns on one lane.
    pub spawn_interval: f32,
    pub durations: KindDurations,
    /// Per-lane duration overrides, indexed by lane. Non-positive entries
    /// fall back to the kind's duration.
    pub lane_durations: Vec<f32>,
    /// Kind spawned on each lane, cycled when shorter than `lane_count`.
    pub lane_plan: Vec<ObstacleKind>,
    pub grid_size: f32,
    pub move_duration: f32,
    pub double_tap_window: f32,
    pub detection_radius: f32,
    /// Scale applied to a proximity enemy while inflated.
    pub puff_scale: f32,
    /// Added to (or overriding) the default contact table.
    pub contact_rules: Vec<ContactRule>,
    pub seed: u64,
}

impl Default for ReefConfig {
    fn default() -> Self {
        Self {
            scene_width: 400.0,
            scene_height: 800.0,
            lane_count: 8,
            spawn_interval: 3.0,
            durations: KindDurations::default(),
            lane_durations: Vec::new(),
            lane_plan: vec![
                ObstacleKind::LinearEnemy,
                ObstacleKind::Rock,
                ObstacleKind::ProximityEnemy,
                ObstacleKind::LongEnemy,
                ObstacleKind::SweepHazard,
                ObstacleKind::LinearEnemy,
                ObstacleKind::Rock,
                ObstacleKind::ProximityEnemy,
            ],
            grid_size: 50.0,
            move_duration: 0.2,
            double_tap_window: 0.3,
            detection_radius: 100.0,
            puff_scale: 1.6,
            contact_rules: Vec::new(),
            seed: 0x5EED_CAFE,
        }
    }
}

impl ReefConfig {
    /// Parse a config document and sanitize it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: ReefConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.scene_width, self.scene_height)
    }

    /// Replace values the game cannot run with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(value: &mut f32, fallback: f32, name: &str) {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("config: {} = {} is not positive, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        positive(&mut self.scene_width, defaults.scene_width, "scene_width");
        positive(&mut self.scene_height, defaults.scene_height, "scene_height");
        positive(&mut self.spawn_interval, defaults.spawn_interval, "spawn_interval");
        positive(&mut self.grid_size, defaults.grid_size, "grid_size");
        positive(&mut self.move_duration, defaults.move_duration, "move_duration");
        positive(&mut self.detection_radius, defaults.detection_radius, "detection_radius");
        positive(&mut self.puff_scale, defaults.puff_scale, "puff_scale");
        positive(&mut self.durations.linear, defaults.durations.linear, "durations.linear");
        positive(&mut self.durations.proximity, defaults.durations.proximity, "durations.proximity");
        positive(&mut self.durations.sweep, defaults.durations.sweep, "durations.sweep");
        positive(&mut self.durations.long, defaults.durations.long, "durations.long");
        positive(&mut self.durations.rock, defaults.durations.rock, "durations.rock");

        if !(self.double_tap_window.is_finite() && self.double_tap_window >= 0.0) {
            log::warn!("config: double_tap_window = {} is invalid, using {}",
                self.double_tap_window, defaults.double_tap_window);
            self.double_tap_window = defaults.double_tap_window;
        }
        if self.lane_count == 0 {
            log::warn!("config: lane_count must be at least 1");
            self.lane_count = 1;
        }
        if self.lane_plan.is_empty() {
            log::warn!("config: empty lane_plan, using the default plan");
            self.lane_plan = defaults.lane_plan;
        }
        self
    }

    /// Kind spawned on `lane`.
    pub fn kind_for_lane(&self, lane: usize) -> ObstacleKind {
        if self.lane_plan.is_empty() {
            return ObstacleKind::LinearEnemy;
        }
        self.lane_plan[lane % self.lane_plan.len()]
    }

    /// Travel time on `lane`: the lane override if set, else the kind's.
    pub fn duration_for_lane(&self, lane: usize) -> f32 {
        match self.lane_durations.get(lane) {
            Some(&d) if d > 0.0 => d,
            _ => self.durations.get(self.kind_for_lane(lane)),
        }
    }
}
