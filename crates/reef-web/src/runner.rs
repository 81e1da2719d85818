use reef_engine::{
    AssetManifest, EngineContext, FixedTimestep, Game, GameConfig, GameEvent, InputEvent,
    InputQueue,
};

/// Generic game runner: the tick driver between the host loop and a `Game`.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    torn_down: bool,
    /// Flat buffer of sound cue IDs for the host to read.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::with_config(&config),
            timestep: FixedTimestep::new(config.fixed_dt),
            sound_buffer: Vec::with_capacity(config.max_sounds),
            input: InputQueue::new(),
            initialized: false,
            torn_down: false,
            config,
            game,
        }
    }

    /// Activate the game. Later calls are ignored.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Parse an asset manifest and hand it to the game. A bad manifest is
    /// logged and ignored; the game keeps running without visuals.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => self.game.load_assets(&manifest),
            Err(err) => log::warn!("asset manifest rejected: {}", err),
        }
    }

    /// Run one host frame: zero or more fixed steps of
    /// timers → update → physics → after_physics.
    /// Ticks before `init` or after `teardown` do nothing.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.torn_down {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.ctx.advance_clock(self.timestep.dt());
            self.game.update(&mut self.ctx, &self.input);
            // Each event is seen by exactly one step. With zero steps this
            // frame, input waits for the next one.
            self.input.drain();
            #[cfg(feature = "physics")]
            self.ctx.step_physics();
            self.game.after_physics(&mut self.ctx);
        }

        self.sound_buffer.clear();
        for sound in &self.ctx.sounds {
            self.sound_buffer.push(sound.0 as u8);
        }
    }

    /// Stop the game for good: the game cancels its work, then any timer
    /// left behind is cancelled too.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.game.teardown(&mut self.ctx);
        self.ctx.timers.cancel_all();
        self.torn_down = true;
        log::info!("runner torn down after {:.1}s", self.ctx.elapsed());
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for host reads ----

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        GameEvent::as_floats(&self.ctx.events).as_ptr()
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }
}
