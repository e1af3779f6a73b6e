use super::{
    compute_uniforms, FrameInputs, FrameUniforms, PassDescriptor, PassStage,
    Viewport,
};
use crate::options::Options;

/// Why a tick produced no frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The hosting element is not visible.
    Hidden,
    /// The viewport has zero width or height.
    ZeroArea,
    /// The presentation surface could not be acquired this tick.
    SurfaceUnavailable,
    /// The surface was lost or outdated and has just been reconfigured.
    SurfaceReconfigured,
    /// The visual has been unmounted.
    Unmounted,
}

/// Result of one [`FrameDriver::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// All three passes ran and the frame was presented.
    Presented {
        /// Number of frames presented so far, including this one.
        frame: u64,
    },
    /// Nothing was drawn. Retried on the next tick.
    Skipped(SkipReason),
}

/// Executes the passes of a frame.
///
/// Implementations own the offscreen targets exclusively. The driver
/// guarantees `resize_targets` is never called with a zero dimension and
/// that `execute` only runs between a successful `begin_frame` and its
/// `end_frame`.
pub trait PassBackend {
    /// Reallocate the back and front targets for a new viewport.
    fn resize_targets(&mut self, viewport: Viewport);
    /// Drop the offscreen targets (zero-area viewport or unmount).
    fn release_targets(&mut self);
    /// Prepare a frame. An `Err` skips the whole frame.
    fn begin_frame(
        &mut self,
        uniforms: &FrameUniforms,
    ) -> Result<(), SkipReason>;
    /// Run one stage.
    fn execute(&mut self, pass: &PassDescriptor, uniforms: &FrameUniforms);
    /// Submit and present.
    fn end_frame(&mut self);
}

/// Runs the `RenderBack -> RenderFront -> Present` sequence once per tick,
/// skipping ticks while hidden, unmounted or at zero area.
pub struct FrameDriver<B: PassBackend> {
    backend: B,
    options: Options,
    viewport: Option<Viewport>,
    visible: bool,
    mounted: bool,
    frames_presented: u64,
}

impl<B: PassBackend> FrameDriver<B> {
    /// Create a driver. Targets are allocated immediately when the initial
    /// size has non-zero area.
    pub fn new(mut backend: B, options: Options, size: (u32, u32)) -> Self {
        let viewport = Viewport::new(size.0, size.1);
        if let Some(viewport) = viewport {
            backend.resize_targets(viewport);
        }
        Self {
            backend,
            options,
            viewport,
            visible: true,
            mounted: true,
            frames_presented: 0,
        }
    }

    /// The backend, for inspection.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options. Takes effect on the next tick.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Current drawable viewport, if any.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Whether frames are currently drawn when ticked.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Resize the offscreen targets. A zero dimension releases them and
    /// suspends rendering until a valid size arrives. Ignored once
    /// unmounted.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.mounted {
            return;
        }
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        match viewport {
            Some(viewport) => self.backend.resize_targets(viewport),
            None => {
                log::debug!("zero-area viewport {width}x{height}; rendering suspended");
                self.backend.release_targets();
            }
        }
        self.viewport = viewport;
    }

    /// Show or hide the hosting element.
    pub fn set_visible(&mut self, visible: bool) {
        if !self.mounted {
            return;
        }
        if visible != self.visible {
            log::debug!("hero visibility -> {visible}");
        }
        self.visible = visible;
    }

    /// Stop all per-frame work for good and release the targets.
    pub fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            self.backend.release_targets();
        }
    }

    /// Whether the driver is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of frames presented since construction.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Render one frame for the given inputs.
    pub fn tick(&mut self, inputs: &FrameInputs) -> FrameOutcome {
        if !self.mounted {
            return FrameOutcome::Skipped(SkipReason::Unmounted);
        }
        if !self.visible {
            return FrameOutcome::Skipped(SkipReason::Hidden);
        }
        let Some(viewport) = self.viewport else {
            return FrameOutcome::Skipped(SkipReason::ZeroArea);
        };

        let uniforms = compute_uniforms(inputs, &self.options, viewport);
        if let Err(reason) = self.backend.begin_frame(&uniforms) {
            log::debug!("frame skipped: {reason:?}");
            return FrameOutcome::Skipped(reason);
        }

        let mut stage = Some(PassStage::FIRST);
        while let Some(current) = stage {
            self.backend.execute(&current.descriptor(), &uniforms);
            stage = current.next();
        }
        self.backend.end_frame();

        self.frames_presented += 1;
        FrameOutcome::Presented {
            frame: self.frames_presented,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::frame::PassTarget;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Resize(Viewport),
        Release,
        Begin,
        Execute(PassStage),
        End,
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
        fail_next_begin: bool,
    }

    impl RecordingBackend {
        fn draws(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Execute(_)))
                .count()
        }
    }

    impl PassBackend for RecordingBackend {
        fn resize_targets(&mut self, viewport: Viewport) {
            self.calls.push(Call::Resize(viewport));
        }

        fn release_targets(&mut self) {
            self.calls.push(Call::Release);
        }

        fn begin_frame(
            &mut self,
            _uniforms: &FrameUniforms,
        ) -> Result<(), SkipReason> {
            if std::mem::take(&mut self.fail_next_begin) {
                return Err(SkipReason::SurfaceUnavailable);
            }
            self.calls.push(Call::Begin);
            Ok(())
        }

        fn execute(
            &mut self,
            pass: &PassDescriptor,
            _uniforms: &FrameUniforms,
        ) {
            self.calls.push(Call::Execute(pass.stage));
        }

        fn end_frame(&mut self) {
            self.calls.push(Call::End);
        }
    }

    fn driver(size: (u32, u32)) -> FrameDriver<RecordingBackend> {
        FrameDriver::new(RecordingBackend::default(), Options::default(), size)
    }

    fn inputs() -> FrameInputs {
        FrameInputs::new(Vec2::new(0.5, 0.5), 1.0)
    }

    #[test]
    fn tick_runs_stages_between_begin_and_end() {
        let mut driver = driver((64, 48));
        let outcome = driver.tick(&inputs());
        assert_eq!(outcome, FrameOutcome::Presented { frame: 1 });
        assert_eq!(
            driver.backend().calls,
            vec![
                Call::Resize(Viewport::new(64, 48).unwrap()),
                Call::Begin,
                Call::Execute(PassStage::RenderBack),
                Call::Execute(PassStage::RenderFront),
                Call::Execute(PassStage::Present),
                Call::End,
            ]
        );
    }

    #[test]
    fn zero_area_resize_releases_and_skips() {
        let mut driver = driver((64, 48));
        driver.resize(0, 48);
        assert_eq!(
            driver.tick(&inputs()),
            FrameOutcome::Skipped(SkipReason::ZeroArea)
        );
        driver.resize(64, 0);
        assert_eq!(
            driver.tick(&inputs()),
            FrameOutcome::Skipped(SkipReason::ZeroArea)
        );
        assert_eq!(driver.backend().draws(), 0);
        assert!(!driver
            .backend()
            .calls
            .iter()
            .any(|c| matches!(c, Call::Resize(v) if v.width == 0 || v.height == 0)));
        assert!(driver.backend().calls.contains(&Call::Release));
    }

    #[test]
    fn zero_area_at_construction_allocates_nothing() {
        let mut driver = driver((0, 0));
        assert!(driver.backend().calls.is_empty());
        assert_eq!(
            driver.tick(&inputs()),
            FrameOutcome::Skipped(SkipReason::ZeroArea)
        );
        driver.resize(32, 32);
        assert_eq!(driver.tick(&inputs()), FrameOutcome::Presented { frame: 1 });
    }

    #[test]
    fn hidden_element_issues_no_draws() {
        let mut driver = driver((64, 48));
        driver.set_visible(false);
        for _ in 0..5 {
            assert_eq!(
                driver.tick(&inputs()),
                FrameOutcome::Skipped(SkipReason::Hidden)
            );
        }
        assert_eq!(driver.backend().draws(), 0);

        driver.set_visible(true);
        assert_eq!(driver.tick(&inputs()), FrameOutcome::Presented { frame: 1 });
        assert_eq!(driver.backend().draws(), 3);
    }

    #[test]
    fn surface_failure_skips_one_frame_then_recovers() {
        let mut driver = driver((64, 48));
        driver.backend_mut().fail_next_begin = true;
        assert_eq!(
            driver.tick(&inputs()),
            FrameOutcome::Skipped(SkipReason::SurfaceUnavailable)
        );
        assert_eq!(driver.backend().draws(), 0);
        assert_eq!(driver.tick(&inputs()), FrameOutcome::Presented { frame: 1 });
    }

    #[test]
    fn unmount_stops_all_work() {
        let mut driver = driver((64, 48));
        driver.unmount();
        driver.unmount();
        assert_eq!(
            driver.tick(&inputs()),
            FrameOutcome::Skipped(SkipReason::Unmounted)
        );
        let releases = driver
            .backend()
            .calls
            .iter()
            .filter(|c| **c == Call::Release)
            .count();
        assert_eq!(releases, 1);
        assert!(!driver.is_mounted());
    }

    #[test]
    fn events_after_unmount_touch_no_targets() {
        let mut driver = driver((64, 48));
        driver.unmount();
        let calls = driver.backend().calls.len();

        driver.resize(128, 96);
        driver.resize(0, 0);
        driver.set_visible(false);
        driver.set_visible(true);
        assert_eq!(driver.backend().calls.len(), calls);
        assert_eq!(
            driver.tick(&inputs()),
            FrameOutcome::Skipped(SkipReason::Unmounted)
        );
    }

    #[test]
    fn present_samples_the_front_target() {
        let present = PassStage::Present.descriptor();
        assert_eq!(present.input, Some(PassTarget::Front));
    }
}
