use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::sprite::SpriteComponent;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// Fat Entity: one struct with optional parts.
/// Player box, obstacles and backdrop tiles are all plain entities; the game
/// keeps its own typed records keyed by `EntityId`.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Free-form tag ("player", "obstacle", "tile", ...).
    pub tag: String,
    /// Inactive entities are skipped by the physics sync.
    pub active: bool,
    /// Center position in world space (Y-up).
    pub pos: Vec2,
    /// Rendered size in world units. Also the hitbox size for sensor bodies.
    pub scale: Vec2,
    /// Entities without a sprite are invisible but still simulate.
    pub sprite: Option<SpriteComponent>,
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            sprite: None,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Attach a sprite if one was found; `None` leaves the entity invisible.
    pub fn with_sprite(mut self, sprite: Option<SpriteComponent>) -> Self {
        self.sprite = sprite;
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let e = Entity::new(EntityId(3))
            .with_tag("obstacle")
            .with_pos(Vec2::new(10.0, -5.0))
            .with_scale(Vec2::new(50.0, 30.0))
            .with_sprite(None);
        assert_eq!(e.tag, "obstacle");
        assert_eq!(e.pos, Vec2::new(10.0, -5.0));
        assert_eq!(e.scale, Vec2::new(50.0, 30.0));
        assert!(e.sprite.is_none());
        assert!(e.active);
    }
}
