//! The three passes of a dispersion frame.
//!
//! A frame always runs `RenderBack -> RenderFront -> Present`. Each stage
//! names its destination, which solid mesh is visible, and which earlier
//! target it samples, so the sequencing is data rather than implicit mesh
//! toggling.

use crate::scene::SolidFace;

/// Where a pass writes its color output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassTarget {
    /// Offscreen target holding everything behind the solid.
    Back,
    /// Offscreen target holding the scene plus the solid's rear surface.
    Front,
    /// The presented surface.
    Screen,
}

/// One stage of the per-frame pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassStage {
    /// Both solid meshes hidden; render the scene into the back target.
    RenderBack,
    /// Back-face mesh shown, sampling the back target; render into the
    /// front target.
    RenderFront,
    /// Front-face mesh shown, sampling the front target; render to screen.
    Present,
}

/// What a backend must do to execute one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDescriptor {
    /// The stage this descriptor was built from.
    pub stage: PassStage,
    /// Color destination.
    pub target: PassTarget,
    /// Which solid mesh is drawn, if any.
    pub solid: Option<SolidFace>,
    /// Offscreen target bound as the solid's scene texture.
    pub input: Option<PassTarget>,
}

impl PassStage {
    /// First stage of every frame.
    pub const FIRST: Self = Self::RenderBack;

    /// The stage that follows this one, or `None` after presenting.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::RenderBack => Some(Self::RenderFront),
            Self::RenderFront => Some(Self::Present),
            Self::Present => None,
        }
    }

    /// Describe this stage for a backend.
    #[must_use]
    pub fn descriptor(self) -> PassDescriptor {
        match self {
            Self::RenderBack => PassDescriptor {
                stage: self,
                target: PassTarget::Back,
                solid: None,
                input: None,
            },
            Self::RenderFront => PassDescriptor {
                stage: self,
                target: PassTarget::Front,
                solid: Some(SolidFace::Back),
                input: Some(PassTarget::Back),
            },
            Self::Present => PassDescriptor {
                stage: self,
                target: PassTarget::Screen,
                solid: Some(SolidFace::Front),
                input: Some(PassTarget::Front),
            },
        }
    }

    /// Iterate all stages of one frame in order.
    pub fn sequence() -> impl Iterator<Item = Self> {
        std::iter::successors(Some(Self::FIRST), |stage| stage.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_runs_three_stages_in_order() {
        let stages: Vec<_> = PassStage::sequence().collect();
        assert_eq!(
            stages,
            vec![
                PassStage::RenderBack,
                PassStage::RenderFront,
                PassStage::Present
            ]
        );
    }

    #[test]
    fn every_input_was_written_by_an_earlier_stage() {
        let mut written = Vec::new();
        for stage in PassStage::sequence() {
            let pass = stage.descriptor();
            if let Some(input) = pass.input {
                assert!(written.contains(&input), "{stage:?} reads {input:?}");
                assert_ne!(input, pass.target);
            }
            written.push(pass.target);
        }
    }

    #[test]
    fn back_pass_hides_the_solid() {
        let pass = PassStage::RenderBack.descriptor();
        assert_eq!(pass.solid, None);
        assert_eq!(pass.input, None);
        assert_eq!(PassStage::Present.descriptor().target, PassTarget::Screen);
    }
}
