// extensions/mod.rs
//
// Optional systems decoupled from core Entity/Scene storage.
// Games opt in by owning a TweenState.

pub mod easing;
pub mod tween;

pub use easing::{Easing, ease_vec2};
pub use tween::{TweenState, Tween, TweenDone, TweenId, TweenTarget};
