use glam::Vec2;

/// 2D camera over a Y-up world.
/// Holds the viewport size and center; projection is the host's business.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center in world space.
    pub position: Vec2,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            position: Vec2::ZERO,
        }
    }

    /// Snap the center to `target`.
    pub fn look_at(&mut self, target: Vec2) {
        self.position = target;
    }

    /// Snap only the vertical coordinate; X stays where it is.
    pub fn track_vertical(&mut self, y: f32) {
        self.position.y = y;
    }
}
