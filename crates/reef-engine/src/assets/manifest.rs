use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Asset manifest: atlases, named sprites and sound cues for a game.
/// Loaded from JSON supplied by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub atlases: Vec<AtlasDescriptor>,
    /// Named sprite lookup: name → atlas index + cell coordinates.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    pub name: String,
    pub cols: u32,
    pub rows: u32,
    /// Relative path to the image file; the host loads it.
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Index into the atlases array.
    pub atlas: u32,
    pub col: u32,
    pub row: u32,
    #[serde(default = "default_span")]
    pub span: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    pub path: String,
    /// Numeric cue ID that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
}

fn default_span() -> u32 {
    1
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest() {
        let json = r#"{
            "atlases": [
                { "name": "reef", "cols": 8, "rows": 4, "path": "reef.png" }
            ],
            "sprites": {
                "box": { "atlas": 0, "col": 0, "row": 0 },
                "eel": { "atlas": 0, "col": 1, "row": 2, "span": 2 }
            },
            "sounds": {
                "puff": { "path": "puff.ogg", "event_id": 1 },
                "music": { "path": "theme.ogg" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.atlases[0].cols, 8);
        assert_eq!(manifest.sprites["box"].span, 1);
        assert_eq!(manifest.sprites["eel"].span, 2);
        assert_eq!(manifest.sounds["puff"].event_id, Some(1));
        assert_eq!(manifest.sounds["music"].event_id, None);
    }

    #[test]
    fn empty_object_is_valid() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert!(manifest.sprites.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AssetManifest::from_json("{ \"atlases\": 3 }").is_err());
    }
}
