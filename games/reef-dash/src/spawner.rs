use reef_engine::{BodyDesc, ColliderDesc, EngineContext, Entity, EntityId, TimerFire, TimerId, TimerSet, TweenState};

use crate::config::ReefConfig;
use crate::contact::ContactCategory;
use crate::lanes::Lane;
use crate::obstacle::{Obstacle, ObstacleKind, Trajectory, HITBOX_INSET};
use crate::sprites::SpriteSet;

/// Per-lane spawn scheduler and owner of the live obstacles.
///
/// Each lane gets its own recurring timer tagged with the lane index. The
/// first firings are staggered across one interval so lanes do not spawn
/// in lockstep; after that every lane keeps its own cadence.
#[derive(Debug)]
pub struct Spawner {
    lanes: Vec<Lane>,
    kinds: Vec<ObstacleKind>,
    durations: Vec<f32>,
    interval: f32,
    grid: f32,
    scene_width: f32,
    timers: Vec<TimerId>,
    obstacles: Vec<Obstacle>,
}

impl Spawner {
    pub fn new(lanes: Vec<Lane>, config: &ReefConfig) -> Self {
        let kinds = (0..lanes.len()).map(|i| config.kind_for_lane(i)).collect();
        let durations = (0..lanes.len()).map(|i| config.duration_for_lane(i)).collect();
        Self {
            lanes,
            kinds,
            durations,
            interval: config.spawn_interval,
            grid: config.grid_size,
            scene_width: config.scene_width,
            timers: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn kind_for_lane(&self, lane: usize) -> Option<ObstacleKind> {
        self.kinds.get(lane).copied()
    }

    pub fn is_running(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Schedule one recurring timer per lane. No-op without lanes or when
    /// already running.
    pub fn start(&mut self, timers: &mut TimerSet) {
        if self.is_running() || self.lanes.is_empty() {
            return;
        }
        let n = self.lanes.len() as f32;
        for lane in 0..self.lanes.len() {
            let first = self.interval * lane as f32 / n;
            self.timers.push(timers.every_after(self.interval, first, lane as u32));
        }
        log::info!("spawner: {} lanes every {}s", self.lanes.len(), self.interval);
    }

    /// Cancel every lane timer. Live obstacles are left alone.
    pub fn stop(&mut self, timers: &mut TimerSet) {
        for id in self.timers.drain(..) {
            timers.cancel(id);
        }
    }

    /// Lanes whose timer fired in `fires`, in firing order.
    pub fn due_lanes<'a>(&'a self, fires: &'a [TimerFire]) -> impl Iterator<Item = usize> + 'a {
        fires
            .iter()
            .filter(|f| self.timers.contains(&f.id))
            .map(|f| f.tag as usize)
    }

    /// Create one obstacle at the start of `lane` and launch it. The lane
    /// field is anchored at world height `anchor_y` (the camera center).
    pub fn spawn(
        &mut self,
        lane: usize,
        anchor_y: f32,
        ctx: &mut EngineContext,
        tweens: &mut TweenState,
        sprites: &SpriteSet,
    ) -> Option<EntityId> {
        let Some(lane_ref) = self.lanes.get(lane) else {
            log::debug!("spawner: no lane {}", lane);
            return None;
        };
        let kind = self.kinds[lane];
        let trajectory = Trajectory::for_lane(kind, lane_ref, anchor_y, self.durations[lane], self.scene_width);
        let size = kind.size(self.grid, self.scene_width);

        let id = ctx.next_id();
        let entity = Entity::new(id)
            .with_tag(kind.tag())
            .with_pos(trajectory.start)
            .with_scale(size)
            .with_sprite(sprites.obstacle(kind));
        ctx.spawn_with_body(entity, BodyDesc::hitbox(ColliderDesc::cuboid(size * 0.5 * HITBOX_INSET)));

        let mut obstacle = Obstacle::new(id, kind, lane, trajectory);
        if let Some(tween) = obstacle.launch() {
            tweens.add(id, tween);
        }
        log::debug!("spawned {:?} on lane {} at {:?}", kind, lane, trajectory.start);
        self.obstacles.push(obstacle);
        Some(id)
    }

    /// Remove an obstacle that reached its lane end. Returns false if `id`
    /// is not one of ours.
    pub fn arrive(&mut self, id: EntityId, ctx: &mut EngineContext) -> bool {
        let Some(index) = self.obstacles.iter().position(|o| o.id == id) else {
            return false;
        };
        let mut obstacle = self.obstacles.swap_remove(index);
        obstacle.mark_removed();
        ctx.despawn(id);
        true
    }

    pub fn get(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn category_of(&self, id: EntityId) -> Option<ContactCategory> {
        self.get(id).map(|o| o.category)
    }

    /// Stop spawning and destroy every live obstacle.
    pub fn reset(&mut self, ctx: &mut EngineContext, tweens: &mut TweenState) {
        self.stop(&mut ctx.timers);
        for mut obstacle in self.obstacles.drain(..) {
            obstacle.mark_removed();
            tweens.remove_entity(obstacle.id);
            ctx.despawn(obstacle.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use reef_engine::GameConfig;
    use crate::lanes::build_lanes;

    fn setup(lane_count: usize) -> (Spawner, EngineContext, TweenState) {
        let config = ReefConfig { lane_count, ..ReefConfig::default() };
        let lanes = build_lanes(config.scene_size(), lane_count);
        let ctx = EngineContext::with_config(&GameConfig::default());
        (Spawner::new(lanes, &config), ctx, TweenState::new())
    }

    fn spawn_due(s: &mut Spawner, ctx: &mut EngineContext, tweens: &mut TweenState, dt: f32) -> usize {
        let fires = ctx.advance_clock(dt).to_vec();
        let due: Vec<usize> = s.due_lanes(&fires).collect();
        for &lane in &due {
            s.spawn(lane, 0.0, ctx, tweens, &SpriteSet::default());
        }
        due.len()
    }

    #[test]
    fn one_timer_per_lane() {
        let (mut s, mut ctx, _) = setup(4);
        s.start(&mut ctx.timers);
        assert!(s.is_running());
        assert_eq!(ctx.timers.len(), 4);
        s.start(&mut ctx.timers);
        assert_eq!(ctx.timers.len(), 4);
    }

    #[test]
    fn each_lane_spawns_once_per_interval() {
        let (mut s, mut ctx, mut tweens) = setup(4);
        s.start(&mut ctx.timers);

        let mut total = 0;
        // 5.5 seconds: lanes first fire at 0, 0.75, 1.5, 2.25 and again 3s later.
        for _ in 0..110 {
            total += spawn_due(&mut s, &mut ctx, &mut tweens, 0.05);
        }
        assert_eq!(total, 8);
        for lane in 0..4 {
            let n = s.obstacles().iter().filter(|o| o.lane == lane).count();
            assert!(n >= 1, "lane {} never spawned", lane);
        }
    }

    #[test]
    fn spawn_places_at_lane_start_and_launches() {
        let (mut s, mut ctx, mut tweens) = setup(8);
        let id = s.spawn(1, 1000.0, &mut ctx, &mut tweens, &SpriteSet::default()).unwrap();
        let lane = s.lanes()[1];

        let entity = ctx.scene.get(id).unwrap();
        assert_eq!(entity.pos, Vec2::new(lane.start.x, 1000.0 + lane.y()));
        assert!(entity.body.is_some());
        assert!(entity.sprite.is_none());
        assert!(tweens.is_animating(id));
        assert_eq!(s.category_of(id), Some(s.kind_for_lane(1).unwrap().category()));
    }

    #[test]
    fn arrival_removes_obstacle() {
        let (mut s, mut ctx, mut tweens) = setup(1);
        let id = s.spawn(0, 0.0, &mut ctx, &mut tweens, &SpriteSet::default()).unwrap();
        let duration = s.get(id).unwrap().trajectory.duration;

        let mut arrived = Vec::new();
        let mut t = 0.0;
        while t < duration + 0.1 {
            tweens.tick(0.05, &mut ctx.scene);
            arrived.extend(tweens.drain_completed().map(|d| d.entity));
            t += 0.05;
        }
        assert_eq!(arrived, vec![id]);
        assert!(s.arrive(id, &mut ctx));
        assert!(s.obstacles().is_empty());
        assert!(!ctx.scene.contains(id));
        assert!(!s.arrive(id, &mut ctx));
    }

    #[test]
    fn stop_cancels_timers() {
        let (mut s, mut ctx, mut tweens) = setup(3);
        s.start(&mut ctx.timers);
        s.stop(&mut ctx.timers);
        assert!(!s.is_running());
        assert!(ctx.timers.is_empty());
        for _ in 0..100 {
            assert_eq!(spawn_due(&mut s, &mut ctx, &mut tweens, 0.1), 0);
        }
    }

    #[test]
    fn reset_destroys_everything() {
        let (mut s, mut ctx, mut tweens) = setup(2);
        s.start(&mut ctx.timers);
        let a = s.spawn(0, 0.0, &mut ctx, &mut tweens, &SpriteSet::default()).unwrap();
        let b = s.spawn(1, 0.0, &mut ctx, &mut tweens, &SpriteSet::default()).unwrap();
        s.reset(&mut ctx, &mut tweens);
        assert!(s.obstacles().is_empty());
        assert!(!ctx.scene.contains(a) && !ctx.scene.contains(b));
        assert!(tweens.is_empty());
        assert!(ctx.timers.is_empty());
        assert_eq!(ctx.physics.body_count(), 0);
    }

    #[test]
    fn no_lanes_is_a_no_op() {
        let config = ReefConfig::default();
        let mut s = Spawner::new(Vec::new(), &config);
        let mut ctx = EngineContext::new();
        let mut tweens = TweenState::new();
        s.start(&mut ctx.timers);
        assert!(!s.is_running());
        assert!(s.spawn(0, 0.0, &mut ctx, &mut tweens, &SpriteSet::default()).is_none());
    }
}
