//! Fixed perspective camera for the hero scene.
//!
//! The visual never orbits: the eye sits on +Z looking at the solid, and
//! only the aspect ratio follows the viewport.

/// Core camera struct and ray generation.
pub mod core;

pub use self::core::{Camera, Ray};
