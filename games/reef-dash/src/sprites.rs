use reef_engine::{SpriteComponent, SpriteRegistry};

use crate::obstacle::ObstacleKind;

pub const PLAYER_SPRITE: &str = "box";
pub const TILE_SPRITE: &str = "reef";

/// Sprites resolved once per manifest load, so a missing name warns once
/// instead of on every spawn.
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    player: Option<SpriteComponent>,
    tile: Option<SpriteComponent>,
    obstacles: [Option<SpriteComponent>; ObstacleKind::COUNT],
}

impl SpriteSet {
    pub fn resolve(registry: &SpriteRegistry) -> Self {
        let mut set = Self {
            player: registry.sprite(PLAYER_SPRITE),
            tile: registry.sprite(TILE_SPRITE),
            ..Self::default()
        };
        for (slot, kind) in set.obstacles.iter_mut().zip(ObstacleKind::ALL) {
            *slot = registry.sprite(kind.sprite_name());
        }
        set
    }

    pub fn player(&self) -> Option<SpriteComponent> {
        self.player.clone()
    }

    pub fn tile(&self) -> Option<SpriteComponent> {
        self.tile.clone()
    }

    pub fn obstacle(&self, kind: ObstacleKind) -> Option<SpriteComponent> {
        self.obstacles[kind as usize].clone()
    }
}
