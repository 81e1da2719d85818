pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use assets::manifest::AssetManifest;
pub use assets::registry::SpriteRegistry;
pub use components::entity::Entity;
pub use components::sprite::{SpriteComponent, AtlasId};
pub use core::camera::Camera2D;
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::timer::{TimerSet, TimerId, TimerFire};
pub use input::queue::{InputEvent, InputQueue, SwipeDirection};

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, ColliderDesc, CollisionPair,
};

pub use extensions::{
    Easing, ease_vec2,
    TweenState, Tween, TweenDone, TweenId, TweenTarget,
};
