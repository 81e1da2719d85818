use std::cell::RefCell;
use std::rc::Rc;

use reef_engine::*;

use crate::config::ReefConfig;
use crate::scene::RunScene;
use crate::session::{GameContext, GameMode, LayoutInfo, SceneHandle, SessionInfo};

// Fixed simulation step (seconds)
const FIXED_DT: f32 = 1.0 / 60.0;

// Custom event kinds (host → Rust)
pub const CUSTOM_EXIT: u32 = 1;

/// One Reef Dash session: the shared context plus the run scene attached
/// to it. A new session is a new `ReefDash`.
pub struct ReefDash {
    config: ReefConfig,
    context: Rc<RefCell<GameContext>>,
    scene: RunScene,
}

impl ReefDash {
    pub fn new() -> Self {
        Self::with_config(ReefConfig::default(), GameMode::Endless)
    }

    pub fn with_config(config: ReefConfig, mode: GameMode) -> Self {
        let config = config.sanitized();
        let layout = LayoutInfo {
            scene_size: config.scene_size(),
            grid: config.grid_size,
            lane_count: config.lane_count,
        };
        let session = SessionInfo { id: 1, seed: config.seed };
        let context = Rc::new(RefCell::new(GameContext::new(mode, session, layout)));
        let scene = RunScene::new(SceneHandle(session.id), &context, config.clone(), FIXED_DT);
        Self { config, context, scene }
    }

    /// Parse a JSON config; on error, log it and play with defaults.
    pub fn from_json(json: &str, mode: GameMode) -> Self {
        match ReefConfig::from_json(json) {
            Ok(config) => Self::with_config(config, mode),
            Err(e) => {
                log::warn!("reef-dash: bad config ({}), using defaults", e);
                Self::with_config(ReefConfig::default(), mode)
            }
        }
    }

    pub fn context(&self) -> &Rc<RefCell<GameContext>> {
        &self.context
    }

    pub fn scene(&self) -> &RunScene {
        &self.scene
    }
}

impl Default for ReefDash {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for ReefDash {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: FIXED_DT,
            world_width: self.config.scene_width,
            world_height: self.config.scene_height,
            ..GameConfig::default()
        }
    }

    fn load_assets(&mut self, manifest: &AssetManifest) {
        self.scene.load_assets(manifest);
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if self.scene.activate(ctx) {
            log::info!(
                "reef-dash: run started, {} lanes every {}s",
                self.config.lane_count, self.config.spawn_interval
            );
        }
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let exit = input
            .iter()
            .any(|e| matches!(e, InputEvent::Custom { kind: CUSTOM_EXIT, .. }));
        if exit {
            self.scene.request_exit(ctx);
        }
        self.scene.update(ctx, input);
    }

    fn after_physics(&mut self, ctx: &mut EngineContext) {
        self.scene.after_physics(ctx);
    }

    fn teardown(&mut self, ctx: &mut EngineContext) {
        self.scene.teardown(ctx);
        log::info!("reef-dash: session {} torn down", self.context.borrow().session().id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::events;
    use crate::state::SceneState;
    use reef_web::GameRunner;

    #[test]
    fn config_matches_scene() {
        let game = ReefDash::from_json(r#"{ "scene_width": 300, "scene_height": 600 }"#, GameMode::Endless);
        let config = game.config();
        assert_eq!(config.world_width, 300.0);
        assert_eq!(config.world_height, 600.0);
        assert_eq!(config.fixed_dt, FIXED_DT);
    }

    #[test]
    fn bad_config_falls_back() {
        let game = ReefDash::from_json("not json", GameMode::Practice);
        assert_eq!(game.config().world_width, 400.0);
        assert_eq!(game.context().borrow().mode(), GameMode::Practice);
    }

    #[test]
    fn runs_under_the_runner() {
        let mut runner = GameRunner::new(ReefDash::new());
        runner.init();
        assert_eq!(runner.game().context().borrow().machine().current(), Some(SceneState::Idle));

        runner.push_input(InputEvent::Swipe(SwipeDirection::Up));
        for _ in 0..30 {
            runner.tick(FIXED_DT);
        }
        assert_eq!(runner.game().scene().player().unwrap().position.y, 50.0);
        assert_eq!(runner.game().scene().camera().position.y, 50.0);
    }

    #[test]
    fn exit_event_from_host() {
        let mut runner = GameRunner::new(ReefDash::new());
        runner.init();
        runner.tick(FIXED_DT);

        runner.push_input(InputEvent::Custom { kind: CUSTOM_EXIT, a: 0.0, b: 0.0, c: 0.0 });
        runner.tick(FIXED_DT);
        let exits = runner.ctx().events.iter().filter(|e| e.kind == events::EXIT).count();
        assert_eq!(exits, 1);
        assert!(runner.game().context().borrow().has_exited());
    }

    #[test]
    fn practice_mode_survives_enemies() {
        let config = ReefConfig {
            lane_count: 1,
            lane_plan: vec![crate::obstacle::ObstacleKind::LinearEnemy],
            ..ReefConfig::default()
        };
        let mut runner = GameRunner::new(ReefDash::with_config(config, GameMode::Practice));
        runner.init();
        for _ in 0..(60 * 7) {
            runner.tick(FIXED_DT);
        }
        assert_eq!(runner.game().context().borrow().machine().current(), Some(SceneState::Idle));
    }

    #[test]
    fn teardown_detaches_scene() {
        let mut runner = GameRunner::new(ReefDash::new());
        runner.init();
        runner.tick(FIXED_DT);
        runner.teardown();
        assert_eq!(runner.game().context().borrow().scene(), None);
        assert!(runner.ctx().scene.is_empty());
    }
}
