//! Frame orchestration: pure uniform computation, the explicit three-stage
//! pass sequence, and the driver that runs it against a backend.

mod driver;
mod stage;
/// Per-frame uniform computation.
pub mod uniforms;

pub use driver::{FrameDriver, FrameOutcome, PassBackend, SkipReason};
pub use stage::{PassDescriptor, PassStage, PassTarget};
pub use uniforms::{compute_uniforms, FrameInputs, FrameUniforms};

/// A drawable viewport size. Zero-area sizes are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Width in pixels (non-zero).
    pub width: u32,
    /// Height in pixels (non-zero).
    pub height: u32,
}

impl Viewport {
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
