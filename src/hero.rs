//! The mounted hero visual.
//!
//! Ties the frame driver to the host: pointer and visibility events come
//! in through [`HeroVisual::handle_event`], the host's frame callback calls
//! [`HeroVisual::tick`], and dropping the visual tears everything down.

use crate::{
    animation::{AnimationScope, EasingFunction, TweenId},
    error::PrismaError,
    frame::{FrameDriver, FrameInputs, FrameOutcome, PassBackend},
    gpu::render_context::RenderContext,
    input::{InputEvent, PointerState},
    options::Options,
    renderer::GpuBackend,
};

/// A mounted hero visual rendering through backend `B`.
pub struct HeroVisual<B: PassBackend> {
    driver: FrameDriver<B>,
    scope: AnimationScope,
    reveal: TweenId,
    pointer: PointerState,
    size: (u32, u32),
}

impl<B: PassBackend> HeroVisual<B> {
    /// Mount the visual at `size` and start its entrance tween at time 0.
    pub fn mount(backend: B, options: Options, size: (u32, u32)) -> Self {
        let mut scope = AnimationScope::new();
        let motion = &options.motion;
        let reveal = scope.tween(
            motion.reveal_from,
            1.0,
            0.0,
            motion.reveal_secs,
            EasingFunction::DEFAULT,
        );
        log::info!("hero mounted at {}x{}", size.0, size.1);
        Self {
            driver: FrameDriver::new(backend, options, size),
            scope,
            reveal,
            pointer: PointerState::new(),
            size,
        }
    }

    /// Apply one host event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.pointer.update(x, y, self.size.0, self.size.1);
            }
            InputEvent::PointerLeft => self.pointer.reset(),
            InputEvent::Resized { width, height } => {
                self.size = (width, height);
                self.driver.resize(width, height);
            }
            InputEvent::VisibilityChanged { visible } => {
                self.driver.set_visible(visible);
            }
        }
    }

    /// Render one frame `elapsed` seconds after mount.
    pub fn tick(&mut self, elapsed: f32) -> FrameOutcome {
        let inputs = FrameInputs {
            pointer: self.pointer.normalized(),
            elapsed,
            reveal: self.reveal_at(elapsed),
        };
        self.driver.tick(&inputs)
    }

    /// Solid scale from the entrance tween at `elapsed`.
    #[must_use]
    pub fn reveal_at(&self, elapsed: f32) -> f32 {
        self.scope.value(self.reveal, elapsed).unwrap_or(1.0)
    }

    /// Kill every tween, release the targets and stop rendering.
    /// Idempotent; also run on drop.
    pub fn unmount(&mut self) {
        if self.driver.is_mounted() {
            log::info!("hero unmounted");
        }
        self.scope.kill_all();
        self.driver.unmount();
    }

    /// Replace the options. Takes effect on the next tick.
    pub fn set_options(&mut self, options: Options) {
        self.driver.set_options(options);
    }

    /// Current normalized pointer.
    #[must_use]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// The tween scope owned by this visual.
    #[must_use]
    pub fn scope(&self) -> &AnimationScope {
        &self.scope
    }

    /// The frame driver.
    #[must_use]
    pub fn driver(&self) -> &FrameDriver<B> {
        &self.driver
    }

    /// The pass backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        self.driver.backend()
    }
}

impl HeroVisual<GpuBackend> {
    /// Create the GPU context for a window or canvas and mount on it.
    ///
    /// # Errors
    ///
    /// Returns [`PrismaError::Gpu`] if the surface, adapter, device or a
    /// shader cannot be created.
    pub async fn with_surface(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, PrismaError> {
        let context = RenderContext::new(target, size).await?;
        let backend = GpuBackend::new(context, &options)?;
        Ok(Self::mount(backend, options, size))
    }
}

impl<B: PassBackend> Drop for HeroVisual<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
