//! Tween system for the hero's entrance and any future timed effects.

pub mod easing;
pub mod scope;

pub use easing::EasingFunction;
pub use scope::{AnimationScope, TweenId};
