use std::collections::HashMap;
use crate::api::types::SoundEvent;
use crate::assets::manifest::AssetManifest;
use crate::components::sprite::{SpriteComponent, AtlasId};

/// Name-based sprite and sound lookup built from an AssetManifest.
/// Missing names are logged once per lookup and degrade to "no asset";
/// callers still spawn the entity.
#[derive(Debug, Default)]
pub struct SpriteRegistry {
    sprites: HashMap<String, SpriteComponent>,
    sounds: HashMap<String, SoundEvent>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let sprites = manifest
            .sprites
            .iter()
            .map(|(name, desc)| {
                let sprite = SpriteComponent {
                    atlas: AtlasId(desc.atlas),
                    col: desc.col as f32,
                    row: desc.row as f32,
                    cell_span: desc.span as f32,
                    alpha: 1.0,
                };
                (name.clone(), sprite)
            })
            .collect();
        let sounds = manifest
            .sounds
            .iter()
            .filter_map(|(name, desc)| desc.event_id.map(|id| (name.clone(), SoundEvent(id))))
            .collect();
        Self { sprites, sounds }
    }

    /// Look up a sprite by name, logging when it is missing.
    pub fn sprite(&self, name: &str) -> Option<SpriteComponent> {
        let found = self.sprites.get(name).cloned();
        if found.is_none() {
            log::warn!("sprite '{}' not in manifest; spawning without visuals", name);
        }
        found
    }

    /// Look up a sound cue by name, logging when it is missing.
    pub fn sound(&self, name: &str) -> Option<SoundEvent> {
        let found = self.sounds.get(name).copied();
        if found.is_none() {
            log::warn!("sound '{}' not in manifest; cue skipped", name);
        }
        found
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
