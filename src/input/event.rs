/// Platform-agnostic host events.
///
/// The winit viewer and the web host translate their native events into
/// these and hand them to [`HeroVisual::handle_event`](crate::HeroVisual::handle_event).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position relative to the hosting element.
    PointerMoved {
        /// Horizontal position in physical pixels from the left edge.
        x: f32,
        /// Vertical position in physical pixels from the top edge.
        y: f32,
    },
    /// Pointer left the hosting element.
    PointerLeft,
    /// The hosting element changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// The hosting element entered or left the viewport.
    VisibilityChanged {
        /// Whether any part of it is on screen.
        visible: bool,
    },
}
