use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use reef_engine::*;

use crate::backdrop::Backdrop;
use crate::config::ReefConfig;
use crate::contact::{CollisionResolver, ContactCategory, Resolution};
use crate::lanes::build_lanes;
use crate::obstacle::{ProximityChange, ARRIVED, HITBOX_INSET};
use crate::player::{MoveOutcome, PlayerBox, PlayerController, MOVE_DONE};
use crate::session::{events, ExitSummary, GameContext, SceneHandle};
use crate::spawner::Spawner;
use crate::sprites::SpriteSet;

/// Sound cue played when a puffer inflates, unless the manifest names one.
pub const SOUND_PUFF: SoundEvent = SoundEvent(1);

// Duration of the puff/deflate scale pop (seconds)
const PUFF_POP: f32 = 0.15;

/// The live run: camera, backdrop, player, spawners and contacts.
///
/// Per step, in order: fired lane timers spawn, swipes start moves, tweens
/// advance, puffers react, then the camera and backdrop follow the player.
/// Contacts are resolved after the physics pass in `after_physics`.
pub struct RunScene {
    handle: SceneHandle,
    context: Weak<RefCell<GameContext>>,
    config: ReefConfig,
    dt: f32,
    camera: Camera2D,
    backdrop: Backdrop,
    spawner: Spawner,
    controller: PlayerController,
    resolver: CollisionResolver,
    tweens: TweenState,
    player: Option<PlayerBox>,
    sprites: SpriteSet,
    puff_cue: SoundEvent,
    start_y: f32,
    best_y: f32,
    drag_start: Option<Vec2>,
}

impl RunScene {
    /// Build the scene and attach it to `context`.
    pub fn new(handle: SceneHandle, context: &Rc<RefCell<GameContext>>, config: ReefConfig, dt: f32) -> Self {
        let size = config.scene_size();
        let table = {
            let mut ctx = context.borrow_mut();
            ctx.attach(handle);
            ctx.mode().contact_table(&config.contact_rules)
        };
        Self {
            handle,
            context: Rc::downgrade(context),
            dt,
            camera: Camera2D::new(size.x, size.y),
            backdrop: Backdrop::new(size, config.seed),
            spawner: Spawner::new(build_lanes(size, config.lane_count), &config),
            controller: PlayerController::new(
                config.grid_size,
                config.scene_width,
                config.move_duration,
                config.double_tap_window,
            ),
            resolver: CollisionResolver::new(table),
            tweens: TweenState::new(),
            player: None,
            sprites: SpriteSet::default(),
            puff_cue: SOUND_PUFF,
            start_y: 0.0,
            best_y: 0.0,
            drag_start: None,
            config,
        }
    }

    pub fn handle(&self) -> SceneHandle {
        self.handle
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn player(&self) -> Option<&PlayerBox> {
        self.player.as_ref()
    }

    pub fn tweens(&self) -> &TweenState {
        &self.tweens
    }

    /// Distance between the start row and the highest row reached.
    pub fn climbed(&self) -> f32 {
        self.best_y - self.start_y
    }

    pub fn load_assets(&mut self, manifest: &AssetManifest) {
        let registry = SpriteRegistry::from_manifest(manifest);
        self.sprites = SpriteSet::resolve(&registry);
        self.puff_cue = registry.sound("puff").unwrap_or(SOUND_PUFF);
        log::info!("reef-dash: {} sprites from manifest", registry.len());
    }

    /// Run `f` against the session context. A dropped context is a wiring
    /// bug: log it and skip the call.
    fn with_context<R>(&self, f: impl FnOnce(&mut GameContext) -> R) -> Option<R> {
        match self.context.upgrade() {
            Some(context) => Some(f(&mut context.borrow_mut())),
            None => {
                log::error!("scene {:?}: session context is gone", self.handle);
                None
            }
        }
    }

    /// Whether this step should simulate: the run is live and not exited.
    fn is_running(&self) -> bool {
        self.with_context(|c| c.machine().is_live() && !c.has_exited())
            .unwrap_or(false)
    }

    /// Set up the world and enter Idle. Returns false if the scene was
    /// already activated or its context is gone.
    pub fn activate(&mut self, ctx: &mut EngineContext) -> bool {
        let ready = self.with_context(|c| c.machine().current().is_none() && c.scene() == Some(self.handle));
        if ready != Some(true) {
            return false;
        }

        let start = Vec2::ZERO;
        let size = Vec2::splat(self.config.grid_size);
        let id = ctx.next_id();
        let entity = Entity::new(id)
            .with_tag("player")
            .with_pos(start)
            .with_scale(size)
            .with_sprite(self.sprites.player());
        ctx.spawn_with_body(entity, BodyDesc::hitbox(ColliderDesc::cuboid(size * 0.5 * HITBOX_INSET)));
        self.player = Some(PlayerBox::new(id, start));
        self.start_y = start.y;
        self.best_y = start.y;

        self.camera.look_at(Vec2::new(0.0, start.y));
        self.backdrop.stream(self.camera.position.y, ctx, self.sprites.tile().as_ref());
        self.spawner.start(&mut ctx.timers);

        let session = self.with_context(|c| {
            c.machine_mut().enter_idle();
            c.session().id
        });
        if let Some(session) = session {
            ctx.emit_event(GameEvent::new(events::READY, session as f32, 0.0, 0.0));
        }
        true
    }

    pub fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if !self.is_running() {
            return;
        }

        // Lanes hang off the player's resting row so spawns stay on the grid
        // while the camera is mid-glide.
        let fires = ctx.fired_timers().to_vec();
        let anchor = self.player.as_ref().map_or(self.camera.position.y, |p| p.position.y);
        let due: Vec<usize> = self.spawner.due_lanes(&fires).collect();
        for lane in due {
            self.spawner.spawn(lane, anchor, ctx, &mut self.tweens, &self.sprites);
        }

        let now = ctx.elapsed();
        for event in input.iter() {
            let swipe = match *event {
                InputEvent::PointerDown { x, y } => {
                    self.drag_start = Some(Vec2::new(x, y));
                    None
                }
                InputEvent::PointerUp { x, y } => self.drag_start.take().and_then(|start| {
                    SwipeDirection::from_drag(start, Vec2::new(x, y), self.config.grid_size * 0.5)
                }),
                _ => event.as_swipe(),
            };
            if let Some(dir) = swipe {
                self.handle_swipe(dir, now);
            }
        }

        self.tweens.tick(self.dt, &mut ctx.scene);
        let done: Vec<TweenDone> = self.tweens.drain_completed().collect();
        for d in done {
            match d.event {
                MOVE_DONE => self.land_player(d.entity),
                ARRIVED => {
                    self.spawner.arrive(d.entity, ctx);
                }
                _ => {}
            }
        }

        self.update_proximity(ctx);

        if let Some(y) = self.player_pos(ctx).map(|p| p.y) {
            self.camera.track_vertical(y);
        }
        self.backdrop.stream(self.camera.position.y, ctx, self.sprites.tile().as_ref());
    }

    fn handle_swipe(&mut self, dir: SwipeDirection, now: f32) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        match self.controller.request(player, dir, now) {
            MoveOutcome::Started { target } => {
                let tween = self.controller.move_tween(player.position, target);
                self.tweens.add(player.id, tween);
            }
            outcome => log::debug!("swipe {:?} dropped: {:?}", dir, outcome),
        }
    }

    fn land_player(&mut self, entity: EntityId) {
        if let Some(player) = self.player.as_mut().filter(|p| p.id == entity) {
            self.controller.finish(player);
            self.best_y = self.best_y.max(player.position.y);
        }
    }

    fn player_pos(&self, ctx: &EngineContext) -> Option<Vec2> {
        let id = self.player.as_ref()?.id;
        ctx.scene.get(id).map(|e| e.pos)
    }

    fn update_proximity(&mut self, ctx: &mut EngineContext) {
        let Some(player_pos) = self.player_pos(ctx) else {
            return;
        };
        let radius = self.config.detection_radius;

        for obstacle in self.spawner.obstacles_mut() {
            let Some(entity) = ctx.scene.get(obstacle.id) else {
                continue;
            };
            let (pos, scale) = (entity.pos, entity.scale);
            let base = obstacle.kind.size(self.config.grid_size, self.config.scene_width);
            let size = match obstacle.check_proximity(pos.distance(player_pos), radius) {
                ProximityChange::None => continue,
                ProximityChange::Inflated => {
                    ctx.emit_sound(self.puff_cue);
                    base * self.config.puff_scale
                }
                ProximityChange::Deflated => base,
            };
            let pop = self.tweens.add(obstacle.id, Tween::scale(scale, size, PUFF_POP, Easing::BackOut));
            if let Some(previous) = obstacle.replace_scale_tween(pop) {
                self.tweens.remove(previous);
            }
            ctx.set_hitbox(obstacle.id, size * 0.5 * HITBOX_INSET);
        }
    }

    fn category_of(&self, id: EntityId) -> Option<ContactCategory> {
        match &self.player {
            Some(player) if player.id == id => Some(player.category),
            _ => self.spawner.category_of(id),
        }
    }

    /// Resolve this step's new contacts.
    pub fn after_physics(&mut self, ctx: &mut EngineContext) {
        if !self.is_running() {
            return;
        }
        let Some(context) = self.context.upgrade() else {
            return;
        };

        let mut ended = false;
        {
            let mut context = context.borrow_mut();
            for pair in ctx.collisions().iter().filter(|p| p.started) {
                let (Some(a), Some(b)) = (self.category_of(pair.entity_a), self.category_of(pair.entity_b)) else {
                    continue;
                };
                if self.resolver.resolve(context.machine_mut(), a, b) == Resolution::GameOver {
                    log::info!("reef-dash: {:?} hit {:?}", a, b);
                    ended = true;
                }
            }
        }

        if ended {
            self.halt(ctx);
            let (elapsed, climbed) = (ctx.elapsed(), self.climbed());
            if let Some(event) = self.with_context(|c| c.record_game_over(elapsed, climbed)) {
                ctx.emit_event(event);
            }
        }
    }

    /// Stop spawning, moving and listening. Obstacles stay where they are.
    fn halt(&mut self, ctx: &mut EngineContext) {
        self.spawner.stop(&mut ctx.timers);
        self.tweens.clear();
        self.controller.disable();
    }

    /// Leave to the score screen. Works from a live or finished run.
    pub fn request_exit(&mut self, ctx: &mut EngineContext) {
        let summary = ExitSummary {
            elapsed: ctx.elapsed(),
            climbed: self.climbed(),
        };
        if let Some(event) = self.with_context(|c| c.exit(summary)).flatten() {
            self.halt(ctx);
            ctx.emit_event(event);
        }
    }

    /// Destroy everything the scene spawned and detach from the context.
    pub fn teardown(&mut self, ctx: &mut EngineContext) {
        self.spawner.reset(ctx, &mut self.tweens);
        self.backdrop.clear(ctx);
        self.tweens.clear();
        self.controller.disable();
        if let Some(player) = self.player.take() {
            ctx.despawn(player.id);
        }
        let handle = self.handle;
        self.with_context(|c| c.detach(handle));
    }
}
