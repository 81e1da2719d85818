use glam::Vec2;

/// One of the four discrete swipe directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Unit step in a Y-up world.
    pub fn unit(self) -> Vec2 {
        match self {
            SwipeDirection::Up => Vec2::Y,
            SwipeDirection::Down => Vec2::NEG_Y,
            SwipeDirection::Left => Vec2::NEG_X,
            SwipeDirection::Right => Vec2::X,
        }
    }

    /// Arrow keys (DOM key codes 37–40) map to swipes.
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            37 => Some(SwipeDirection::Left),
            38 => Some(SwipeDirection::Up),
            39 => Some(SwipeDirection::Right),
            40 => Some(SwipeDirection::Down),
            _ => None,
        }
    }

    /// Classify a pointer drag in world space. Drags shorter than
    /// `min_distance` are taps, not swipes.
    pub fn from_drag(start: Vec2, end: Vec2, min_distance: f32) -> Option<Self> {
        let d = end - start;
        if d.length() < min_distance {
            return None;
        }
        if d.x.abs() >= d.y.abs() {
            Some(if d.x > 0.0 { SwipeDirection::Right } else { SwipeDirection::Left })
        } else {
            Some(if d.y > 0.0 { SwipeDirection::Up } else { SwipeDirection::Down })
        }
    }

    /// Numeric code used on the host boundary (0 = up, 1 = down, 2 = left, 3 = right).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(SwipeDirection::Up),
            1 => Some(SwipeDirection::Down),
            2 => Some(SwipeDirection::Left),
            3 => Some(SwipeDirection::Right),
            _ => None,
        }
    }
}

/// Input event types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A recognized swipe gesture from the host.
    Swipe(SwipeDirection),
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// A custom event from the UI layer; `kind` picks the meaning.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// The swipe this event stands for, if any. Arrow keys count as swipes.
    pub fn as_swipe(&self) -> Option<SwipeDirection> {
        match *self {
            InputEvent::Swipe(dir) => Some(dir),
            InputEvent::KeyDown { key_code } => SwipeDirection::from_key_code(key_code),
            _ => None,
        }
    }
}

/// A queue of input events.
/// The host pushes events between frames; the game reads them during update.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Pending swipes in arrival order.
    pub fn swipes(&self) -> impl Iterator<Item = SwipeDirection> + '_ {
        self.events.iter().filter_map(InputEvent::as_swipe)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
