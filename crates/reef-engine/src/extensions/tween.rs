// extensions/tween.rs
//
// Tween system: fire-and-forget animated transitions keyed by EntityId.
// Completions are reported back as `TweenDone` records so the game can run
// its own follow-up (clear a movement guard, despawn an obstacle, ...).
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(id, Tween::position(from, to, 0.2, Easing::QuadOut).with_on_complete(MOVE_DONE));
//   tweens.tick(dt, &mut scene);
//   for done in tweens.drain_completed() { ... }

use std::collections::BTreeMap;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{Easing, ease_vec2};

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Animate Entity.pos
    Position { from: Vec2, to: Vec2 },
    /// Animate Entity.scale
    Scale { from: Vec2, to: Vec2 },
}

#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    /// Event code reported in `TweenDone` when the tween finishes.
    pub on_complete: Option<u32>,
}

impl Tween {
    fn with_target(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            on_complete: None,
        }
    }

    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::with_target(TweenTarget::Position { from, to }, duration, easing)
    }

    pub fn scale(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::with_target(TweenTarget::Scale { from, to }, duration, easing)
    }

    pub fn with_on_complete(mut self, event_id: u32) -> Self {
        self.on_complete = Some(event_id);
        self
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// A finished tween that carried an `on_complete` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenDone {
    pub tween: TweenId,
    pub entity: EntityId,
    pub event: u32,
}

/// Manages all active tweens. Iteration is in creation order.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: BTreeMap<TweenId, (EntityId, Tween)>,
    next_id: u32,
    completed: Vec<TweenDone>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (entity, tween));
        id
    }

    /// Remove a tween without reporting completion.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Remove all tweens for an entity without reporting completion.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.tweens.retain(|_, (e, _)| *e != entity);
        self.completed.retain(|d| d.entity != entity);
    }

    /// Whether any tween is driving this entity.
    pub fn is_animating(&self, entity: EntityId) -> bool {
        self.tweens.values().any(|(e, _)| *e == entity)
    }

    /// Advance all tweens and apply them to entities in the scene.
    /// Tweens whose entity is gone are dropped silently.
    /// Returns the number of tweens that finished this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let mut finished = Vec::new();

        for (&id, (entity_id, tween)) in self.tweens.iter_mut() {
            let Some(entity) = scene.get_mut(*entity_id) else {
                finished.push(id);
                continue;
            };

            tween.elapsed += dt;
            let t = if tween.duration > 0.0 {
                tween.elapsed / tween.duration
            } else {
                1.0
            };

            match tween.target {
                TweenTarget::Position { from, to } => {
                    entity.pos = ease_vec2(from, to, t, tween.easing);
                }
                TweenTarget::Scale { from, to } => {
                    entity.scale = ease_vec2(from, to, t, tween.easing);
                }
            }

            if tween.elapsed >= tween.duration {
                if let Some(event) = tween.on_complete {
                    self.completed.push(TweenDone {
                        tween: id,
                        entity: *entity_id,
                        event,
                    });
                }
                finished.push(id);
            }
        }

        let count = finished.len();
        for id in finished {
            self.tweens.remove(&id);
        }
        count
    }

    /// Drain completion records accumulated since the last drain.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = TweenDone> + '_ {
        self.completed.drain(..)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Cancel every tween; pending completions are discarded too.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed.clear();
    }
}
