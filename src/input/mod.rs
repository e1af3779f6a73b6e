//! Input handling: host events and pointer normalization.

/// Platform-agnostic host events.
pub mod event;
/// Normalized pointer position.
pub mod pointer;

pub use event::InputEvent;
pub use pointer::PointerState;
