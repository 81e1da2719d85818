pub mod camera;
#[cfg(feature = "physics")]
pub mod physics;
pub mod rng;
pub mod scene;
pub mod time;
pub mod timer;
