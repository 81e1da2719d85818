use glam::Vec2;
use reef_engine::{EntityId, Easing, Tween, TweenId};
use serde::{Deserialize, Serialize};

use crate::contact::ContactCategory;
use crate::lanes::Lane;

/// Tween completion code for an obstacle reaching its lane end.
pub const ARRIVED: u32 = 1;

/// Hitboxes are this fraction of the visual size, so neighbours on
/// adjacent grid rows do not touch edge to edge.
pub const HITBOX_INSET: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    LinearEnemy,
    /// Inflates while the player is within the detection radius.
    ProximityEnemy,
    /// Full-width hazard that enters from far off-screen.
    SweepHazard,
    LongEnemy,
    Rock,
}

impl ObstacleKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ObstacleKind; Self::COUNT] = [
        ObstacleKind::LinearEnemy,
        ObstacleKind::ProximityEnemy,
        ObstacleKind::SweepHazard,
        ObstacleKind::LongEnemy,
        ObstacleKind::Rock,
    ];

    pub fn category(self) -> ContactCategory {
        match self {
            ObstacleKind::LinearEnemy | ObstacleKind::ProximityEnemy | ObstacleKind::LongEnemy => {
                ContactCategory::Enemy
            }
            ObstacleKind::SweepHazard => ContactCategory::Lava,
            ObstacleKind::Rock => ContactCategory::Rock,
        }
    }

    /// Visual size for a given grid cell and scene width.
    pub fn size(self, grid: f32, scene_width: f32) -> Vec2 {
        match self {
            ObstacleKind::SweepHazard => Vec2::new(scene_width, grid),
            ObstacleKind::LongEnemy => Vec2::new(grid * 3.0, grid),
            _ => Vec2::splat(grid),
        }
    }

    /// Sprite name looked up in the asset manifest.
    pub fn sprite_name(self) -> &'static str {
        match self {
            ObstacleKind::LinearEnemy => "fish",
            ObstacleKind::ProximityEnemy => "puffer",
            ObstacleKind::SweepHazard => "lava",
            ObstacleKind::LongEnemy => "eel",
            ObstacleKind::Rock => "rock",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ObstacleKind::LinearEnemy => "enemy",
            ObstacleKind::ProximityEnemy => "puffer",
            ObstacleKind::SweepHazard => "sweep",
            ObstacleKind::LongEnemy => "eel",
            ObstacleKind::Rock => "rock",
        }
    }
}

/// Horizontal roll of a rock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollSpeed {
    /// World units per second, signed.
    pub velocity_x: f32,
    /// `1.0` or `-1.0`.
    pub direction: f32,
}

/// Straight-line path from `start` to `end` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub start: Vec2,
    pub end: Vec2,
    pub duration: f32,
    /// Only rocks carry a speed; nothing in the run consumes it yet.
    pub speed: Option<RollSpeed>,
}

impl Trajectory {
    /// Path of a `kind` obstacle along `lane`, with the lane field anchored
    /// at world height `anchor_y`.
    pub fn for_lane(kind: ObstacleKind, lane: &Lane, anchor_y: f32, duration: f32, scene_width: f32) -> Self {
        let y = anchor_y + lane.y();
        let mut start = Vec2::new(lane.start.x, y);
        let end = Vec2::new(lane.end.x, y);

        if kind == ObstacleKind::SweepHazard {
            start.x -= lane.direction.x * 2.0 * scene_width;
        }

        let speed = (kind == ObstacleKind::Rock && duration > 0.0).then(|| RollSpeed {
            velocity_x: (end.x - start.x) / duration,
            direction: if end.x >= start.x { 1.0 } else { -1.0 },
        });

        Self { start, end, duration, speed }
    }

    pub fn position_at(&self, t: f32) -> Vec2 {
        if self.duration <= 0.0 {
            return self.end;
        }
        self.start.lerp(self.end, (t / self.duration).clamp(0.0, 1.0))
    }

    /// Linear tween reporting `ARRIVED` at the end.
    pub fn tween(&self) -> Tween {
        Tween::position(self.start, self.end, self.duration, Easing::Linear).with_on_complete(ARRIVED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleState {
    Spawned,
    Moving,
    /// Proximity enemy, inflated.
    Puffed,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityChange {
    None,
    Inflated,
    Deflated,
}

/// Game-side record of one obstacle. Its live position is the scene
/// entity's `pos`, written by the trajectory tween.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub category: ContactCategory,
    pub trajectory: Trajectory,
    pub state: ObstacleState,
    pub lane: usize,
    inflated: bool,
    scale_tween: Option<TweenId>,
}

impl Obstacle {
    pub fn new(id: EntityId, kind: ObstacleKind, lane: usize, trajectory: Trajectory) -> Self {
        Self {
            id,
            kind,
            category: kind.category(),
            trajectory,
            state: ObstacleState::Spawned,
            lane,
            inflated: false,
            scale_tween: None,
        }
    }

    /// Spawned → Moving. Returns the trajectory tween, or None if already launched.
    pub fn launch(&mut self) -> Option<Tween> {
        if self.state != ObstacleState::Spawned {
            return None;
        }
        self.state = ObstacleState::Moving;
        Some(self.trajectory.tween())
    }

    pub fn is_inflated(&self) -> bool {
        self.inflated
    }

    /// The puff/deflate pop currently driving this obstacle's scale.
    pub fn scale_tween(&self) -> Option<TweenId> {
        self.scale_tween
    }

    /// Store the new scale tween and hand back the one it supersedes.
    pub fn replace_scale_tween(&mut self, tween: TweenId) -> Option<TweenId> {
        self.scale_tween.replace(tween)
    }

    /// Horizontal roll velocity, rocks only.
    pub fn velocity(&self) -> Option<RollSpeed> {
        self.trajectory.speed
    }

    /// Compare the distance to the player against `radius`. Inflates once on
    /// entering, deflates once on leaving. Other kinds never change.
    pub fn check_proximity(&mut self, distance: f32, radius: f32) -> ProximityChange {
        if self.kind != ObstacleKind::ProximityEnemy || self.state == ObstacleState::Removed {
            return ProximityChange::None;
        }
        let inside = distance < radius;
        match (inside, self.inflated) {
            (true, false) => {
                self.inflated = true;
                self.state = ObstacleState::Puffed;
                ProximityChange::Inflated
            }
            (false, true) => {
                self.inflated = false;
                self.state = ObstacleState::Moving;
                ProximityChange::Deflated
            }
            _ => ProximityChange::None,
        }
    }

    pub fn mark_removed(&mut self) {
        self.state = ObstacleState::Removed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::build_lanes;

    fn lanes() -> Vec<Lane> {
        build_lanes(Vec2::new(400.0, 800.0), 8)
    }

    #[test]
    fn categories() {
        assert_eq!(ObstacleKind::LinearEnemy.category(), ContactCategory::Enemy);
        assert_eq!(ObstacleKind::ProximityEnemy.category(), ContactCategory::Enemy);
        assert_eq!(ObstacleKind::LongEnemy.category(), ContactCategory::Enemy);
        assert_eq!(ObstacleKind::SweepHazard.category(), ContactCategory::Lava);
        assert_eq!(ObstacleKind::Rock.category(), ContactCategory::Rock);
    }

    #[test]
    fn linear_path_follows_lane() {
        let lanes = lanes();
        let t = Trajectory::for_lane(ObstacleKind::LinearEnemy, &lanes[1], 1000.0, 6.0, 400.0);
        assert_eq!(t.start, Vec2::new(200.0, 1000.0 + lanes[1].y()));
        assert_eq!(t.end, Vec2::new(-200.0, 1000.0 + lanes[1].y()));
        assert!(t.speed.is_none());
        assert_eq!(t.position_at(3.0), Vec2::new(0.0, t.start.y));
        assert_eq!(t.position_at(99.0), t.end);
    }

    #[test]
    fn sweep_starts_two_widths_out() {
        let lanes = lanes();
        let right = Trajectory::for_lane(ObstacleKind::SweepHazard, &lanes[0], 0.0, 9.0, 400.0);
        assert_eq!(right.start.x, -200.0 - 800.0);
        assert_eq!(right.end.x, 200.0);

        let left = Trajectory::for_lane(ObstacleKind::SweepHazard, &lanes[1], 0.0, 9.0, 400.0);
        assert_eq!(left.start.x, 200.0 + 800.0);
        assert_eq!(left.end.x, -200.0);
    }

    #[test]
    fn rock_carries_velocity() {
        let lanes = lanes();
        let t = Trajectory::for_lane(ObstacleKind::Rock, &lanes[1], 0.0, 5.0, 400.0);
        let speed = t.speed.unwrap();
        assert!((speed.velocity_x - -80.0).abs() < 1e-4);
        assert_eq!(speed.direction, -1.0);

        let o = Obstacle::new(EntityId(1), ObstacleKind::Rock, 1, t);
        assert_eq!(o.velocity(), Some(speed));
        assert_eq!(o.category, ContactCategory::Rock);
    }

    #[test]
    fn launch_once() {
        let lanes = lanes();
        let t = Trajectory::for_lane(ObstacleKind::LinearEnemy, &lanes[0], 0.0, 6.0, 400.0);
        let mut o = Obstacle::new(EntityId(1), ObstacleKind::LinearEnemy, 0, t);
        let tween = o.launch().unwrap();
        assert_eq!(tween.on_complete, Some(ARRIVED));
        assert_eq!(tween.duration, 6.0);
        assert_eq!(o.state, ObstacleState::Moving);
        assert!(o.launch().is_none());
    }

    #[test]
    fn proximity_hysteresis() {
        let lanes = lanes();
        let t = Trajectory::for_lane(ObstacleKind::ProximityEnemy, &lanes[0], 0.0, 8.0, 400.0);
        let mut o = Obstacle::new(EntityId(1), ObstacleKind::ProximityEnemy, 0, t);
        o.launch();

        assert_eq!(o.check_proximity(99.0, 100.0), ProximityChange::Inflated);
        assert!(o.is_inflated());
        assert_eq!(o.state, ObstacleState::Puffed);
        assert_eq!(o.check_proximity(80.0, 100.0), ProximityChange::None);

        assert_eq!(o.check_proximity(150.0, 100.0), ProximityChange::Deflated);
        assert!(!o.is_inflated());
        assert_eq!(o.state, ObstacleState::Moving);
        assert_eq!(o.check_proximity(150.0, 100.0), ProximityChange::None);

        assert_eq!(o.check_proximity(50.0, 100.0), ProximityChange::Inflated);
        assert!(o.is_inflated());
        assert_eq!(o.category, ContactCategory::Enemy);
    }

    #[test]
    fn other_kinds_ignore_proximity() {
        let lanes = lanes();
        let t = Trajectory::for_lane(ObstacleKind::LinearEnemy, &lanes[0], 0.0, 6.0, 400.0);
        let mut o = Obstacle::new(EntityId(1), ObstacleKind::LinearEnemy, 0, t);
        assert_eq!(o.check_proximity(10.0, 100.0), ProximityChange::None);
        assert!(!o.is_inflated());
    }
}
