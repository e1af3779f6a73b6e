//! Per-frame uniform computation.
//!
//! Everything a frame needs is derived here from `(pointer, elapsed,
//! options)` in one pure call. Nothing is mutated in place between frames,
//! so identical inputs always produce identical uniforms.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::Viewport;
use crate::{
    camera::Camera,
    options::Options,
    scene::{backdrop_instances, BackdropInstance, SolidFace},
};

/// Host-provided inputs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Pointer position normalized to `[-1, 1]` (y up).
    pub pointer: Vec2,
    /// Seconds since the visual was mounted.
    pub elapsed: f32,
    /// Solid scale factor from the reveal tween (1.0 = settled).
    pub reveal: f32,
}

impl FrameInputs {
    /// Inputs with the reveal already settled.
    #[must_use]
    pub fn new(pointer: Vec2, elapsed: f32) -> Self {
        Self {
            pointer,
            elapsed,
            reveal: 1.0,
        }
    }
}

/// Frame-wide scene block shared by every pipeline.
/// NOTE: Must match `SceneUniform` in `modules/scene.wgsl` (128 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub eye: [f32; 3],
    /// Seconds since mount.
    pub elapsed: f32,
    /// Light vector (base light offset by the pointer, not normalized).
    pub light: [f32; 3],
    pub(crate) pad_a: f32,
    /// Linear clear color.
    pub background: [f32; 3],
    pub(crate) pad_b: f32,
    /// Render target size in pixels.
    pub resolution: [f32; 2],
    pub(crate) pad_c: [f32; 2],
}

/// Solid transform for one of its two mesh representations.
/// NOTE: Must match `SolidUniform` in `raster/dispersion.wgsl` (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SolidUniform {
    /// Model matrix (rotation and uniform scale).
    pub model: [[f32; 4]; 4],
    /// +1 for the front-face mesh, -1 for the back-face mesh.
    pub face_sign: f32,
    pub(crate) pad: [f32; 3],
}

/// Dispersion shading parameters.
/// NOTE: Must match `DispersionUniform` in `raster/dispersion.wgsl`
/// (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DispersionUniform {
    /// IORs for red, yellow, green, cyan.
    pub ior_rygc: [f32; 4],
    /// IORs for blue and violet (last two lanes unused).
    pub ior_bv: [f32; 4],
    /// Scales refracted sample offsets.
    pub refraction_power: f32,
    /// Multiplier on per-channel offsets.
    pub chromatic_aberration: f32,
    /// Per-sample saturation.
    pub saturation: f32,
    /// Specular exponent.
    pub shininess: f32,
    /// Diffuse weight added to the highlight.
    pub diffuseness: f32,
    /// Fresnel falloff exponent.
    pub fresnel_power: f32,
    pub(crate) pad: [f32; 2],
}

impl DispersionUniform {
    /// The six IORs in spectral order (red through violet).
    #[must_use]
    pub fn iors(&self) -> [f32; 6] {
        [
            self.ior_rygc[0],
            self.ior_rygc[1],
            self.ior_rygc[2],
            self.ior_rygc[3],
            self.ior_bv[0],
            self.ior_bv[1],
        ]
    }
}

/// The complete uniform set for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    /// Viewport the frame is rendered at.
    pub viewport: Viewport,
    /// Camera for this viewport.
    pub camera: Camera,
    /// Light vector fed to the specular and backdrop terms.
    pub light: Vec3,
    /// Solid model matrix.
    pub model: Mat4,
    /// Backdrop rotation angle in radians.
    pub backdrop_angle: f32,
    /// Backdrop cells oriented for this frame.
    pub backdrop: Vec<BackdropInstance>,
    /// Seconds since mount.
    pub elapsed: f32,
    /// Linear clear color.
    pub background: Vec3,
    /// Dispersion block.
    pub dispersion: DispersionUniform,
}

impl FrameUniforms {
    /// GPU layout of the scene block.
    #[must_use]
    pub fn scene_uniform(&self) -> SceneUniform {
        SceneUniform {
            view_proj: self.camera.build_matrix().to_cols_array_2d(),
            eye: self.camera.eye.to_array(),
            elapsed: self.elapsed,
            light: self.light.to_array(),
            pad_a: 0.0,
            background: self.background.to_array(),
            pad_b: 0.0,
            resolution: [
                self.viewport.width as f32,
                self.viewport.height as f32,
            ],
            pad_c: [0.0; 2],
        }
    }

    /// GPU layout of the solid transform for the given mesh.
    #[must_use]
    pub fn solid_uniform(&self, face: SolidFace) -> SolidUniform {
        SolidUniform {
            model: self.model.to_cols_array_2d(),
            face_sign: face.normal_sign(),
            pad: [0.0; 3],
        }
    }
}

/// Light vector for a pointer position.
///
/// The pointer swings the light in the screen plane around the base
/// vector. At the origin the base vector is returned unchanged.
#[must_use]
pub fn light_direction(base: Vec3, pointer: Vec2, offset: f32) -> Vec3 {
    base + Vec3::new(pointer.x, pointer.y, 0.0) * offset
}

/// Solid orientation: idle spin from elapsed time plus pointer tilt.
#[must_use]
pub fn solid_rotation(
    elapsed: f32,
    pointer: Vec2,
    idle_speed: Vec2,
    tilt: f32,
) -> Quat {
    let yaw = elapsed * idle_speed.y + pointer.x * tilt;
    let pitch = elapsed * idle_speed.x - pointer.y * tilt;
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Compute the full uniform set for one frame.
#[must_use]
pub fn compute_uniforms(
    inputs: &FrameInputs,
    options: &Options,
    viewport: Viewport,
) -> FrameUniforms {
    let dispersion = &options.dispersion;
    let motion = &options.motion;
    let [red, yellow, green, cyan, blue, violet] = dispersion.iors();

    let light = light_direction(
        Vec3::from(dispersion.light),
        inputs.pointer,
        motion.light_offset,
    );
    let rotation = solid_rotation(
        inputs.elapsed,
        inputs.pointer,
        Vec2::new(motion.idle_speed_x, motion.idle_speed_y),
        motion.tilt,
    );
    let scale = options.scene.solid_radius * inputs.reveal;
    let backdrop_angle = inputs.elapsed * options.scene.backdrop_spin;
    let model = Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        rotation,
        Vec3::ZERO,
    );

    FrameUniforms {
        viewport,
        camera: Camera::from_options(&options.camera, viewport.aspect()),
        light,
        model,
        backdrop_angle,
        backdrop: backdrop_instances(&options.scene, backdrop_angle),
        elapsed: inputs.elapsed,
        background: Vec3::from(options.scene.background),
        dispersion: DispersionUniform {
            ior_rygc: [red, yellow, green, cyan],
            ior_bv: [blue, violet, 0.0, 0.0],
            refraction_power: dispersion.refraction_power,
            chromatic_aberration: dispersion.chromatic_aberration,
            saturation: dispersion.saturation,
            shininess: dispersion.shininess,
            diffuseness: dispersion.diffuseness,
            fresnel_power: dispersion.fresnel_power,
            pad: [0.0; 2],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(640, 360).unwrap()
    }

    #[test]
    fn centered_pointer_keeps_base_light() {
        let options = Options::default();
        let inputs = FrameInputs::new(Vec2::ZERO, 3.7);
        let uniforms = compute_uniforms(&inputs, &options, viewport());
        assert_eq!(uniforms.light, Vec3::from(options.dispersion.light));
    }

    #[test]
    fn pointer_swings_light_in_screen_plane() {
        let base = Vec3::new(-1.0, 1.0, 1.0);
        let light = light_direction(base, Vec2::new(0.5, -0.5), 2.0);
        assert_eq!(light, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn identical_inputs_give_identical_uniforms() {
        let options = Options::default();
        let inputs = FrameInputs::new(Vec2::new(0.3, -0.2), 1.25);
        let a = compute_uniforms(&inputs, &options, viewport());
        let b = compute_uniforms(&inputs, &options, viewport());
        assert_eq!(a, b);
        assert_eq!(
            bytemuck::bytes_of(&a.scene_uniform()),
            bytemuck::bytes_of(&b.scene_uniform())
        );
    }

    #[test]
    fn rotation_combines_idle_spin_and_tilt() {
        let still = solid_rotation(0.0, Vec2::ZERO, Vec2::new(0.1, 0.25), 0.35);
        assert!(still.abs_diff_eq(Quat::IDENTITY, 1e-6));

        let spun = solid_rotation(2.0, Vec2::ZERO, Vec2::new(0.0, 0.25), 0.35);
        let expected = Quat::from_rotation_y(0.5);
        assert!(spun.abs_diff_eq(expected, 1e-6));

        let tilted = solid_rotation(0.0, Vec2::new(1.0, 0.0), Vec2::ZERO, 0.35);
        assert!(tilted.abs_diff_eq(Quat::from_rotation_y(0.35), 1e-6));
    }

    #[test]
    fn reveal_scales_the_solid() {
        let options = Options::default();
        let mut inputs = FrameInputs::new(Vec2::ZERO, 0.0);
        inputs.reveal = 0.5;
        let uniforms = compute_uniforms(&inputs, &options, viewport());
        let (scale, _, _) = uniforms.model.to_scale_rotation_translation();
        let expected = options.scene.solid_radius * 0.5;
        assert!((scale.x - expected).abs() < 1e-5);
    }

    #[test]
    fn uniform_blocks_match_shader_sizes() {
        assert_eq!(size_of::<SceneUniform>(), 128);
        assert_eq!(size_of::<SolidUniform>(), 80);
        assert_eq!(size_of::<DispersionUniform>(), 64);
    }

    #[test]
    fn back_face_uniform_flips_normals() {
        let uniforms = compute_uniforms(
            &FrameInputs::new(Vec2::ZERO, 0.0),
            &Options::default(),
            viewport(),
        );
        assert_eq!(uniforms.solid_uniform(SolidFace::Back).face_sign, -1.0);
        assert_eq!(uniforms.solid_uniform(SolidFace::Front).face_sign, 1.0);
    }
}
