use glam::Vec2;
use reef_engine::{Easing, EntityId, SwipeDirection, Tween};

use crate::contact::ContactCategory;

/// Tween completion code for a finished player move.
pub const MOVE_DONE: u32 = 2;

/// The player-controlled box.
#[derive(Debug, Clone)]
pub struct PlayerBox {
    pub id: EntityId,
    /// Grid-quantized resting position. Updated when a move lands.
    pub position: Vec2,
    /// Set while a move is in flight; further input is dropped.
    pub is_moving: bool,
    pub category: ContactCategory,
    /// Cell being moved into, while `is_moving`.
    pub pending: Option<Vec2>,
}

impl PlayerBox {
    pub fn new(id: EntityId, position: Vec2) -> Self {
        Self {
            id,
            position,
            is_moving: false,
            category: ContactCategory::Box,
            pending: None,
        }
    }
}

/// Drops a command whose target equals the previous accepted target within
/// `window` seconds.
#[derive(Debug, Clone)]
pub struct RepeatGate {
    window: f32,
    last: Option<(Vec2, f32)>,
}

impl RepeatGate {
    pub fn new(window: f32) -> Self {
        Self { window, last: None }
    }

    /// Whether `target` repeats the last accepted target inside the window.
    pub fn is_repeat(&self, target: Vec2, now: f32) -> bool {
        matches!(self.last, Some((last, at)) if last == target && now - at < self.window)
    }

    pub fn record(&mut self, target: Vec2, now: f32) {
        self.last = Some((target, now));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Started { target: Vec2 },
    /// A move is already in flight.
    Busy,
    /// The clamp left the box where it is.
    Blocked,
    /// Same target again within the double-tap window.
    Repeat,
    /// Input is switched off (game over).
    Disabled,
}

/// Swipes → one-cell moves, serialized against the in-flight guard.
#[derive(Debug, Clone)]
pub struct PlayerController {
    grid: f32,
    half_width: f32,
    move_duration: f32,
    gate: RepeatGate,
    enabled: bool,
}

impl PlayerController {
    pub fn new(grid: f32, scene_width: f32, move_duration: f32, double_tap_window: f32) -> Self {
        Self {
            grid,
            half_width: scene_width / 2.0,
            move_duration,
            gate: RepeatGate::new(double_tap_window),
            enabled: true,
        }
    }

    /// Cell reached from `from` by one step in `dir`, clamped horizontally.
    pub fn target_for(&self, from: Vec2, dir: SwipeDirection) -> Vec2 {
        let target = from + dir.unit() * self.grid;
        Vec2::new(target.x.clamp(-self.half_width, self.half_width), target.y)
    }

    /// Try to start a move. On `Started` the caller animates the box with
    /// `move_tween` and calls `finish` on `MOVE_DONE`.
    ///
    /// Targets are measured from the resting cell, so a second tap in the
    /// same direction mid-move names the in-flight target and reports
    /// `Repeat`; any other command mid-move reports `Busy`.
    pub fn request(&mut self, player: &mut PlayerBox, dir: SwipeDirection, now: f32) -> MoveOutcome {
        if !self.enabled {
            return MoveOutcome::Disabled;
        }
        let target = self.target_for(player.position, dir);
        if target == player.position {
            return MoveOutcome::Blocked;
        }
        if self.gate.is_repeat(target, now) {
            return MoveOutcome::Repeat;
        }
        if player.is_moving {
            return MoveOutcome::Busy;
        }
        self.gate.record(target, now);
        player.is_moving = true;
        player.pending = Some(target);
        MoveOutcome::Started { target }
    }

    pub fn move_tween(&self, from: Vec2, to: Vec2) -> Tween {
        Tween::position(from, to, self.move_duration, Easing::QuadOut).with_on_complete(MOVE_DONE)
    }

    /// Land the in-flight move. No-op when nothing is pending.
    pub fn finish(&self, player: &mut PlayerBox) {
        if let Some(target) = player.pending.take() {
            player.position = target;
        }
        player.is_moving = false;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlayerController {
        PlayerController::new(50.0, 400.0, 0.2, 0.3)
    }

    #[test]
    fn one_cell_steps() {
        let c = controller();
        let at = Vec2::new(0.0, 100.0);
        assert_eq!(c.target_for(at, SwipeDirection::Up), Vec2::new(0.0, 150.0));
        assert_eq!(c.target_for(at, SwipeDirection::Down), Vec2::new(0.0, 50.0));
        assert_eq!(c.target_for(at, SwipeDirection::Left), Vec2::new(-50.0, 100.0));
        assert_eq!(c.target_for(at, SwipeDirection::Right), Vec2::new(50.0, 100.0));
    }

    #[test]
    fn second_move_while_moving_is_dropped() {
        let mut c = controller();
        let mut p = PlayerBox::new(EntityId(1), Vec2::ZERO);

        assert_eq!(
            c.request(&mut p, SwipeDirection::Right, 0.0),
            MoveOutcome::Started { target: Vec2::new(50.0, 0.0) }
        );
        assert_eq!(c.request(&mut p, SwipeDirection::Up, 0.05), MoveOutcome::Busy);
        c.finish(&mut p);

        assert_eq!(p.position, Vec2::new(50.0, 0.0));
        assert!(!p.is_moving);
    }

    #[test]
    fn clamps_at_left_edge() {
        let mut c = controller();
        let mut p = PlayerBox::new(EntityId(1), Vec2::new(-200.0, 0.0));
        assert_eq!(c.request(&mut p, SwipeDirection::Left, 0.0), MoveOutcome::Blocked);
        assert_eq!(p.position.x, -200.0);
        assert!(!p.is_moving);

        // Half a cell from the edge: the step is cut short.
        let mut p = PlayerBox::new(EntityId(1), Vec2::new(-175.0, 0.0));
        assert_eq!(
            c.request(&mut p, SwipeDirection::Left, 1.0),
            MoveOutcome::Started { target: Vec2::new(-200.0, 0.0) }
        );
    }

    #[test]
    fn repeat_target_within_window() {
        let mut gate = RepeatGate::new(0.3);
        let t = Vec2::new(50.0, 0.0);
        assert!(!gate.is_repeat(t, 0.0));
        gate.record(t, 0.0);
        assert!(gate.is_repeat(t, 0.29));
        assert!(!gate.is_repeat(t, 0.3));
        assert!(!gate.is_repeat(Vec2::ZERO, 0.1));
    }

    #[test]
    fn double_tap_mid_move_is_a_repeat() {
        let mut c = controller();
        let mut p = PlayerBox::new(EntityId(1), Vec2::ZERO);
        assert!(matches!(c.request(&mut p, SwipeDirection::Up, 0.0), MoveOutcome::Started { .. }));
        assert_eq!(c.request(&mut p, SwipeDirection::Up, 0.1), MoveOutcome::Repeat);
        assert_eq!(c.request(&mut p, SwipeDirection::Left, 0.1), MoveOutcome::Busy);
        // Outside the window the guard is what drops it.
        assert_eq!(c.request(&mut p, SwipeDirection::Up, 0.35), MoveOutcome::Busy);

        c.finish(&mut p);
        assert_eq!(
            c.request(&mut p, SwipeDirection::Up, 0.4),
            MoveOutcome::Started { target: Vec2::new(0.0, 100.0) }
        );
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let mut c = controller();
        let mut p = PlayerBox::new(EntityId(1), Vec2::ZERO);
        c.disable();
        assert_eq!(c.request(&mut p, SwipeDirection::Up, 0.0), MoveOutcome::Disabled);
        assert!(!p.is_moving);
    }

    #[test]
    fn move_tween_reports_done() {
        let c = controller();
        let tween = c.move_tween(Vec2::ZERO, Vec2::new(0.0, 50.0));
        assert_eq!(tween.duration, 0.2);
        assert_eq!(tween.on_complete, Some(MOVE_DONE));
    }
}
