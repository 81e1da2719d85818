use glam::Vec2;
use reef_engine::GameEvent;

use crate::contact::{ContactRule, ContactTable};
use crate::state::StateMachine;

/// `GameEvent.kind` codes surfaced to the host.
pub mod events {
    /// Run is live. `a` = session id.
    pub const READY: f32 = 1.0;
    /// Run ended. `a` = elapsed seconds, `b` = distance climbed.
    pub const GAME_OVER: f32 = 2.0;
    /// Leave to the score screen. `a` = elapsed seconds, `b` = distance climbed.
    pub const EXIT: f32 = 3.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Endless,
    /// Contacts never end the run unless a config rule says so.
    Practice,
}

impl GameMode {
    pub fn contact_table(self, rules: &[ContactRule]) -> ContactTable {
        match self {
            GameMode::Endless => ContactTable::with_rules(rules),
            GameMode::Practice => {
                let mut table = ContactTable::empty();
                table.apply(rules);
                table
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: u32,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInfo {
    pub scene_size: Vec2,
    pub grid: f32,
    pub lane_count: usize,
}

/// Identifies the scene attached to a context, without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u32);

/// What the score screen gets when the player leaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitSummary {
    pub elapsed: f32,
    pub climbed: f32,
}

/// Per-session state shared between the host and the run scene.
///
/// The scene keeps a `Weak` to the context; the context only remembers
/// which scene handle is attached. Either side missing turns the other's
/// calls into no-ops.
#[derive(Debug)]
pub struct GameContext {
    mode: GameMode,
    session: SessionInfo,
    layout: LayoutInfo,
    scene: Option<SceneHandle>,
    machine: StateMachine,
    game_over_at: Option<f32>,
    exit: Option<ExitSummary>,
}

impl GameContext {
    pub fn new(mode: GameMode, session: SessionInfo, layout: LayoutInfo) -> Self {
        Self {
            mode,
            session,
            layout,
            scene: None,
            machine: StateMachine::new(),
            game_over_at: None,
            exit: None,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn session(&self) -> SessionInfo {
        self.session
    }

    pub fn layout(&self) -> LayoutInfo {
        self.layout
    }

    /// Attach a scene. Refused while another scene is attached.
    pub fn attach(&mut self, handle: SceneHandle) -> bool {
        match self.scene {
            Some(current) if current != handle => {
                log::warn!("context: scene {:?} already attached, refusing {:?}", current, handle);
                false
            }
            _ => {
                self.scene = Some(handle);
                true
            }
        }
    }

    /// Detach `handle` if it is the attached scene.
    pub fn detach(&mut self, handle: SceneHandle) -> bool {
        if self.scene == Some(handle) {
            self.scene = None;
            true
        } else {
            false
        }
    }

    pub fn scene(&self) -> Option<SceneHandle> {
        self.scene
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }

    /// Note the end of the run and build the host event for it.
    pub fn record_game_over(&mut self, elapsed: f32, climbed: f32) -> GameEvent {
        self.game_over_at.get_or_insert(elapsed);
        GameEvent::new(events::GAME_OVER, elapsed, climbed, 0.0)
    }

    pub fn game_over_at(&self) -> Option<f32> {
        self.game_over_at
    }

    /// Hand off to the score screen. Only the first call produces an event.
    pub fn exit(&mut self, summary: ExitSummary) -> Option<GameEvent> {
        if self.exit.is_some() {
            return None;
        }
        self.exit = Some(summary);
        log::info!(
            "session {}: exit after {:.1}s, climbed {:.0}",
            self.session.id, summary.elapsed, summary.climbed
        );
        Some(GameEvent::new(events::EXIT, summary.elapsed, summary.climbed, 0.0))
    }

    pub fn exit_summary(&self) -> Option<ExitSummary> {
        self.exit
    }

    pub fn has_exited(&self) -> bool {
        self.exit.is_some()
    }
}
