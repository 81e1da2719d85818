use crate::assets::manifest::AssetManifest;
use crate::core::scene::Scene;
use crate::core::timer::{TimerFire, TimerSet};
use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::input::queue::InputQueue;
#[cfg(feature = "physics")]
use crate::core::physics::{PhysicsWorld, BodyDesc, CollisionPair};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Visible world width in game units.
    pub world_width: f32,
    /// Visible world height in game units.
    pub world_height: f32,
    /// Sound cues kept per frame; extras are dropped (default: 32).
    pub max_sounds: usize,
    /// Game events kept per frame; extras are dropped (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 400.0,
            world_height: 800.0,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The contract every game fulfills. The runner calls, per fixed step:
/// timers → `update` → physics pass → `after_physics`.
pub trait Game {
    /// Engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Assets arrived from the host. May come before or after `init`.
    fn load_assets(&mut self, _manifest: &AssetManifest) {}

    /// Scene activation: spawn the world, start timers.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One simulation step. Input for this step is in `input`;
    /// timers that fired are in `ctx.fired_timers()`.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Runs after the physics pass; `ctx.collisions()` holds this step's
    /// contacts, computed from post-movement positions.
    fn after_physics(&mut self, _ctx: &mut EngineContext) {}

    /// The host is discarding the game. Cancel anything still scheduled.
    fn teardown(&mut self, _ctx: &mut EngineContext) {}
}

/// Mutable access to engine state, passed to every `Game` hook.
pub struct EngineContext {
    pub scene: Scene,
    /// Recurring timers on the simulation clock.
    pub timers: TimerSet,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    next_id: u32,
    elapsed: f32,
    max_sounds: usize,
    max_events: usize,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let physics = {
            let mut world = PhysicsWorld::new();
            world.set_dt(config.fixed_dt);
            world
        };
        Self {
            scene: Scene::new(),
            timers: TimerSet::new(),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            next_id: 1,
            elapsed: 0.0,
            max_sounds: config.max_sounds,
            max_events: config.max_events,
            #[cfg(feature = "physics")]
            physics,
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Queue a one-shot sound cue for the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        if self.sounds.len() < self.max_sounds {
            self.sounds.push(event);
        } else {
            log::debug!("sound queue full; dropped cue {}", event.0);
        }
    }

    /// Queue a game event for the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            log::debug!("event queue full; dropped kind {}", event.kind);
        }
    }

    /// Clear per-frame host data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    /// Advance the simulation clock and the timers that run on it.
    pub fn advance_clock(&mut self, dt: f32) -> &[TimerFire] {
        self.elapsed += dt.max(0.0);
        self.timers.advance(dt)
    }

    /// Timers that fired during the most recent `advance_clock`.
    pub fn fired_timers(&self) -> &[TimerFire] {
        self.timers.fired()
    }

    /// Seconds of simulation time since the context was created.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Detach an entity, releasing its physics body if it has one.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.scene.despawn(id) {
            #[cfg(feature = "physics")]
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            #[cfg(not(feature = "physics"))]
            Some(_) => true,
            None => false,
        }
    }

    // -- Physics convenience methods --

    /// Attach an entity with a physics body. The body starts at the entity's
    /// position, whatever `desc.position` says.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(&mut self, entity: Entity, desc: BodyDesc) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc.with_position(entity.pos));
        self.scene.spawn(entity.with_body(body));
        id
    }

    /// Resize an entity's cuboid hitbox.
    #[cfg(feature = "physics")]
    pub fn set_hitbox(&mut self, id: EntityId, half: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_half_extents(&body, half);
        }
    }

    /// Contact events from the most recent physics pass.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Push scripted positions into the physics world and step it.
    /// Called by the runner after `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        for entity in self.scene.iter() {
            if let Some(body) = &entity.body {
                if entity.active {
                    self.physics.set_kinematic_position(body, entity.pos);
                }
            }
        }

        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn event_queues_are_capped() {
        let config = GameConfig { max_sounds: 2, max_events: 1, ..GameConfig::default() };
        let mut ctx = EngineContext::with_config(&config);
        for i in 0..5 {
            ctx.emit_sound(SoundEvent(i));
            ctx.emit_event(GameEvent::new(i as f32, 0.0, 0.0, 0.0));
        }
        assert_eq!(ctx.sounds.len(), 2);
        assert_eq!(ctx.events.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.sounds.is_empty() && ctx.events.is_empty());
    }

    #[test]
    fn clock_drives_timers() {
        let mut ctx = EngineContext::new();
        ctx.timers.every(0.5, 3);
        assert!(ctx.advance_clock(0.25).is_empty());
        assert_eq!(ctx.advance_clock(0.25).len(), 1);
        assert_eq!(ctx.fired_timers()[0].tag, 3);
        assert!((ctx.elapsed() - 0.5).abs() < 1e-6);
    }
}

#[cfg(test)]
#[cfg(feature = "physics")]
mod physics_tests {
    use super::*;
    use crate::core::physics::ColliderDesc;

    #[test]
    fn spawn_with_body_creates_entity_and_body() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let entity = Entity::new(id).with_pos(Vec2::new(100.0, 200.0));
        ctx.spawn_with_body(entity, BodyDesc::hitbox(ColliderDesc::cuboid(Vec2::splat(25.0))));

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        let body = ctx.scene.get(id).and_then(|e| e.body).unwrap();
        assert_eq!(ctx.physics.body_position(&body), Some(Vec2::new(100.0, 200.0)));
    }

    #[test]
    fn despawn_cleans_up_physics() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.spawn_with_body(Entity::new(id), BodyDesc::hitbox(ColliderDesc::cuboid(Vec2::splat(10.0))));
        assert!(ctx.despawn(id));
        assert_eq!(ctx.scene.len(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(!ctx.despawn(id));
    }

    #[test]
    fn step_physics_reports_scripted_overlap() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        let half = Vec2::splat(20.0);
        ctx.spawn_with_body(
            Entity::new(a).with_pos(Vec2::new(-300.0, 0.0)),
            BodyDesc::hitbox(ColliderDesc::cuboid(half)),
        );
        ctx.spawn_with_body(Entity::new(b), BodyDesc::hitbox(ColliderDesc::cuboid(half)));

        ctx.step_physics();
        assert!(ctx.collisions().is_empty());

        // Game code moves the entity; the pass must see the new position.
        ctx.scene.get_mut(a).unwrap().pos = Vec2::new(10.0, 0.0);
        let mut started = false;
        for _ in 0..3 {
            ctx.step_physics();
            started |= ctx.collisions().iter().any(|c| c.started && c.other(a) == Some(b));
        }
        assert!(started);
    }
}
