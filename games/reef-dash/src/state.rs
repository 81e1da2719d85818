/// Lifecycle of a run scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Setup finished; the run is live.
    Idle,
    /// Terminal.
    GameOver,
}

/// One-way gate: unset → Idle → GameOver. A new session needs a new machine.
#[derive(Debug, Default, Clone)]
pub struct StateMachine {
    current: Option<SceneState>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SceneState> {
        self.current
    }

    /// Enter Idle once setup completes. Returns false if already entered.
    pub fn enter_idle(&mut self) -> bool {
        match self.current {
            None => {
                self.current = Some(SceneState::Idle);
                log::info!("scene state: Idle");
                true
            }
            Some(_) => false,
        }
    }

    /// Idle → GameOver. Returns false from any other state.
    pub fn game_over(&mut self) -> bool {
        match self.current {
            Some(SceneState::Idle) => {
                self.current = Some(SceneState::GameOver);
                log::info!("scene state: GameOver");
                true
            }
            _ => false,
        }
    }

    /// The run accepts ticks, input and contacts.
    pub fn is_live(&self) -> bool {
        self.current == Some(SceneState::Idle)
    }

    pub fn is_over(&self) -> bool {
        self.current == Some(SceneState::GameOver)
    }
}
