//! Deterministic CPU implementation of the pass pipeline.
//!
//! Ray casts the same faceted meshes the GPU draws and shades the solid
//! with [`crate::shading`], so it produces a reference image for any
//! `(pointer, elapsed, options)` without a GPU. Used by the test-suite and
//! for headless snapshots.

mod buffer;

use glam::{Vec2, Vec3};

pub use buffer::ColorBuffer;

use crate::{
    camera::Ray,
    frame::{
        FrameUniforms, PassBackend, PassDescriptor, PassStage, PassTarget,
        SkipReason, Viewport,
    },
    scene::{self, ConvexHull, PlacedHull, SolidFace},
    shading::{self, Fragment},
};

/// What one executed pass saw when it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRecord {
    /// The stage that ran.
    pub stage: PassStage,
    /// Where it wrote.
    pub target: PassTarget,
    /// Whether its input target had already been written this frame.
    pub input_ready: bool,
}

/// CPU pass backend.
pub struct SoftwareBackend {
    solid: ConvexHull,
    backdrop: ConvexHull,
    back: Option<ColorBuffer>,
    front: Option<ColorBuffer>,
    screen: Option<ColorBuffer>,
    draw_calls: u64,
    passes: Vec<PassRecord>,
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareBackend {
    /// Create a backend with no targets allocated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            solid: ConvexHull::from_mesh(&scene::solid_mesh()),
            backdrop: ConvexHull::from_mesh(&scene::backdrop_mesh()),
            back: None,
            front: None,
            screen: None,
            draw_calls: 0,
            passes: Vec::new(),
        }
    }

    /// Total passes executed since construction.
    #[must_use]
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Passes executed during the most recent frame.
    #[must_use]
    pub fn last_frame_passes(&self) -> &[PassRecord] {
        &self.passes
    }

    /// The offscreen or presented buffer for a target, if allocated.
    #[must_use]
    pub fn target(&self, target: PassTarget) -> Option<&ColorBuffer> {
        match target {
            PassTarget::Back => self.back.as_ref(),
            PassTarget::Front => self.front.as_ref(),
            PassTarget::Screen => self.screen.as_ref(),
        }
    }

    /// The most recently presented frame.
    #[must_use]
    pub fn presented(&self) -> Option<&ColorBuffer> {
        self.screen.as_ref().filter(|s| s.is_written())
    }

    fn slot(&mut self, target: PassTarget) -> &mut Option<ColorBuffer> {
        match target {
            PassTarget::Back => &mut self.back,
            PassTarget::Front => &mut self.front,
            PassTarget::Screen => &mut self.screen,
        }
    }

    /// Ray cast every pixel of one pass into `output`.
    fn rasterize(
        &self,
        pass: &PassDescriptor,
        uniforms: &FrameUniforms,
        input: Option<&ColorBuffer>,
        output: &mut ColorBuffer,
    ) {
        let placed: Vec<_> = uniforms
            .backdrop
            .iter()
            .map(|instance| {
                let tint = Vec3::new(
                    instance.tint[0],
                    instance.tint[1],
                    instance.tint[2],
                );
                (self.backdrop.place(instance.model_matrix()), tint)
            })
            .collect();
        let solid = self.solid.place(uniforms.model);

        let (width, height) = (output.width(), output.height());
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                let ray = uniforms.camera.ray_through(uv);
                let behind =
                    Self::trace_backdrop(&placed, &ray, uniforms.light);
                let mut rgba = behind.map_or_else(
                    || uniforms.background.extend(1.0).to_array(),
                    |(_, color)| color.extend(1.0).to_array(),
                );

                let surface = pass.solid.zip(input).and_then(|(face, scene)| {
                    let hit = solid.intersect(&ray)?;
                    let (t, normal) = match face {
                        SolidFace::Front => (hit.t_enter, hit.enter_normal),
                        SolidFace::Back => (hit.t_exit, -hit.exit_normal),
                    };
                    let occluded = behind.is_some_and(|(bt, _)| bt < t);
                    (t > 0.0 && !occluded).then_some((normal, scene))
                });
                if let Some((normal, scene)) = surface {
                    let fragment = Fragment {
                        uv,
                        normal,
                        eye: ray.direction,
                    };
                    rgba = shading::shade(
                        &fragment,
                        &uniforms.dispersion,
                        uniforms.light,
                        scene,
                    );
                }
                output.set(x, y, rgba);
            }
        }
    }

    /// Nearest backdrop facet along the ray: `(t, color)`.
    fn trace_backdrop(
        placed: &[(PlacedHull<'_>, Vec3)],
        ray: &Ray,
        light: Vec3,
    ) -> Option<(f32, Vec3)> {
        placed
            .iter()
            .filter_map(|(hull, tint)| {
                let hit = hull.intersect(ray)?;
                (hit.t_enter > 0.0).then(|| {
                    let color =
                        shading::backdrop_shade(hit.enter_normal, light, *tint);
                    (hit.t_enter, color)
                })
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}

impl PassBackend for SoftwareBackend {
    fn resize_targets(&mut self, viewport: Viewport) {
        self.back = Some(ColorBuffer::new(viewport));
        self.front = Some(ColorBuffer::new(viewport));
        self.screen = Some(ColorBuffer::new(viewport));
    }

    fn release_targets(&mut self) {
        self.back = None;
        self.front = None;
        self.screen = None;
    }

    fn begin_frame(
        &mut self,
        uniforms: &FrameUniforms,
    ) -> Result<(), SkipReason> {
        let expected = uniforms.viewport;
        let matches = self.back.as_ref().is_some_and(|b| {
            b.width() == expected.width && b.height() == expected.height
        });
        if !matches {
            return Err(SkipReason::ZeroArea);
        }
        for target in [PassTarget::Back, PassTarget::Front, PassTarget::Screen]
        {
            if let Some(buffer) = self.slot(target) {
                buffer.clear();
            }
        }
        self.passes.clear();
        Ok(())
    }

    fn execute(&mut self, pass: &PassDescriptor, uniforms: &FrameUniforms) {
        let Some(mut output) = self.slot(pass.target).take() else {
            log::warn!("{:?} has no {:?} target", pass.stage, pass.target);
            return;
        };
        let input = pass.input.and_then(|t| self.slot(t).take());

        let input_ready = input.as_ref().is_some_and(ColorBuffer::is_written);
        self.rasterize(pass, uniforms, input.as_ref(), &mut output);
        output.mark_written();

        self.draw_calls += 1;
        self.passes.push(PassRecord {
            stage: pass.stage,
            target: pass.target,
            input_ready,
        });
        *self.slot(pass.target) = Some(output);
        if let (Some(source), Some(buffer)) = (pass.input, input) {
            *self.slot(source) = Some(buffer);
        }
    }

    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frame::{FrameDriver, FrameInputs, FrameOutcome},
        options::Options,
    };

    const SIZE: (u32, u32) = (48, 32);

    fn driver() -> FrameDriver<SoftwareBackend> {
        FrameDriver::new(SoftwareBackend::new(), Options::default(), SIZE)
    }

    fn center(buffer: &ColorBuffer) -> [f32; 4] {
        buffer.get(buffer.width() / 2, buffer.height() / 2)
    }

    #[test]
    fn identical_inputs_render_identical_pixels() {
        let inputs = FrameInputs::new(Vec2::new(0.2, -0.4), 2.5);
        let mut a = driver();
        let mut b = driver();
        let _ = a.tick(&inputs);
        let _ = b.tick(&inputs);
        let a = a.backend().presented().unwrap().pixels().to_vec();
        let b = b.backend().presented().unwrap().pixels().to_vec();
        assert_eq!(a, b);
    }

    #[test]
    fn offscreen_targets_are_filled_before_present() {
        let mut driver = driver();
        let outcome = driver.tick(&FrameInputs::new(Vec2::new(0.5, 0.5), 1.0));
        assert_eq!(outcome, FrameOutcome::Presented { frame: 1 });

        let backend = driver.backend();
        let passes = backend.last_frame_passes();
        assert_eq!(passes.len(), 3);
        assert_eq!(passes[2].stage, PassStage::Present);
        assert!(passes[1].input_ready, "front pass read an empty back target");
        assert!(passes[2].input_ready, "present read an empty front target");

        for target in [PassTarget::Back, PassTarget::Front] {
            let buffer = backend.target(target).unwrap();
            assert!(buffer.is_written());
            assert!(!buffer.is_blank());
        }
    }

    #[test]
    fn back_target_does_not_contain_the_solid() {
        let mut driver = driver();
        let _ = driver.tick(&FrameInputs::new(Vec2::ZERO, 0.0));
        let backend = driver.backend();
        let back = backend.target(PassTarget::Back).unwrap();
        let front = backend.target(PassTarget::Front).unwrap();
        // The solid sits in the middle of the frame: only the front target
        // shows its rear surface there.
        assert_ne!(center(back), center(front));
        assert_eq!(center(front)[3], 1.0);
    }

    #[test]
    fn hiding_draws_nothing_and_resumes_identically() {
        let inputs = FrameInputs::new(Vec2::new(-0.3, 0.6), 4.0);
        let mut driver = driver();
        let _ = driver.tick(&inputs);
        let before = driver.backend().presented().unwrap().clone();
        let calls = driver.backend().draw_calls();

        driver.set_visible(false);
        for _ in 0..3 {
            let _ = driver.tick(&inputs);
        }
        assert_eq!(driver.backend().draw_calls(), calls);

        driver.set_visible(true);
        let _ = driver.tick(&inputs);
        assert_eq!(driver.backend().draw_calls(), calls + 3);
        assert_eq!(driver.backend().presented().unwrap(), &before);
    }

    #[test]
    fn zero_area_resize_releases_buffers() {
        let mut driver = driver();
        driver.resize(0, 32);
        assert!(driver.backend().target(PassTarget::Back).is_none());
        assert_eq!(
            driver.tick(&FrameInputs::new(Vec2::ZERO, 0.0)),
            FrameOutcome::Skipped(SkipReason::ZeroArea)
        );
        assert_eq!(driver.backend().draw_calls(), 0);

        driver.resize(16, 8);
        let _ = driver.tick(&FrameInputs::new(Vec2::ZERO, 0.0));
        let frame = driver.backend().presented().unwrap();
        assert_eq!((frame.width(), frame.height()), (16, 8));
    }

    #[test]
    fn pointer_changes_the_picture() {
        let mut driver = driver();
        let _ = driver.tick(&FrameInputs::new(Vec2::ZERO, 1.0));
        let still = driver.backend().presented().unwrap().clone();
        let _ = driver.tick(&FrameInputs::new(Vec2::new(0.9, -0.9), 1.0));
        assert_ne!(driver.backend().presented().unwrap(), &still);
    }
}
