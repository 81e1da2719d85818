// extensions/easing.rs
//
// Easing curves for tweens. Pure math, no Entity/Scene access.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity. Obstacle trajectories use this.
    #[default]
    Linear,
    /// Fast start, soft landing; player moves.
    QuadOut,
    /// Overshoot then settle; used for the puff-up pop.
    BackOut,
}

impl Easing {
    /// Map normalized time `t` in [0, 1] through the curve.
    /// BackOut may overshoot 1.0 mid-way.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// Interpolate between two points with easing.
#[inline]
pub fn ease_vec2(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    a.lerp(b, easing.apply(t))
}
