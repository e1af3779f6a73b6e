//! CPU reference of the dispersion fragment shader.
//!
//! Mirrors `raster/dispersion.wgsl` term by term. The software backend
//! shades with these functions, and the unit tests pin down the
//! properties the GPU path is expected to share (neutral saturation,
//! gray-preserving spectral blend, Fresnel falloff).

use glam::{Vec2, Vec3};

use crate::frame::uniforms::DispersionUniform;

/// Subsamples averaged per fragment.
pub const LOOP_COUNT: u32 = 16;
/// Extra sample reach gained over the full loop.
pub const SLIDE_RANGE: f32 = 0.1;
/// IOR drift per unit of slide, simulating accumulated angular blur.
pub const IOR_SPREAD: f32 = 0.05;
/// Rec.709 luma weights.
pub const LUMA: Vec3 = Vec3::new(0.2125, 0.7154, 0.0721);

/// Something the dispersion loop can sample "what is behind" from.
pub trait SceneSampler {
    /// Linear color at a screen UV (origin top-left). Out-of-range UVs
    /// clamp to the edge.
    fn sample(&self, uv: Vec2) -> Vec3;
}

/// The per-fragment geometry the shader receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Screen UV of the fragment center.
    pub uv: Vec2,
    /// Unit surface normal, already flipped for back faces.
    pub normal: Vec3,
    /// Unit vector from the eye toward the surface point.
    pub eye: Vec3,
}

/// Snell refraction of `incident` through a surface with unit `normal`
/// and relative index `eta`. Total internal reflection yields zero.
#[must_use]
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Vec3 {
    let n_dot_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - n_dot_i * n_dot_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * incident - (eta * n_dot_i + k.sqrt()) * normal
    }
}

/// Interpolate between the color's luminance and the color.
///
/// `saturation == 1.0` returns `color` exactly.
#[must_use]
pub fn saturate(color: Vec3, saturation: f32) -> Vec3 {
    let luma = color.dot(LUMA);
    color * saturation + Vec3::splat(luma) * (1.0 - saturation)
}

/// Collapse six channel samples into RGB.
///
/// Each channel keeps only its own part of the sample it was refracted
/// to: red/green/blue read their primary, yellow/cyan/violet read a
/// balanced mix of their two neighbouring primaries. The secondaries are
/// then folded back into the primaries. A uniform gray input maps to
/// itself.
#[must_use]
pub fn spectral_blend(samples: &[Vec3; 6]) -> Vec3 {
    let [s_r, s_y, s_g, s_c, s_b, s_v] = *samples;
    let red = s_r.x * 0.5;
    let yellow = (s_y.x * 2.0 + s_y.y * 2.0 - s_y.z) / 6.0;
    let green = s_g.y * 0.5;
    let cyan = (s_c.y * 2.0 + s_c.z * 2.0 - s_c.x) / 6.0;
    let blue = s_b.z * 0.5;
    let violet = (s_v.z * 2.0 + s_v.x * 2.0 - s_v.y) / 6.0;

    Vec3::new(
        red + (2.0 * violet + 2.0 * yellow - cyan) / 3.0,
        green + (2.0 * yellow + 2.0 * cyan - violet) / 3.0,
        blue + (2.0 * cyan + 2.0 * violet - yellow) / 3.0,
    )
}

/// Screen-space landing offset of a refracted ray.
///
/// World +Y is up while UV +Y is down, hence the flip.
#[must_use]
pub fn refraction_offset(refracted: Vec3, reach: f32) -> Vec2 {
    Vec2::new(refracted.x, -refracted.y) * reach
}

/// Averaged six-channel dispersion sample for one fragment.
pub fn dispersion(
    fragment: &Fragment,
    params: &DispersionUniform,
    scene: &impl SceneSampler,
) -> Vec3 {
    let iors = params.iors();
    let mut color = Vec3::ZERO;
    for i in 0..LOOP_COUNT {
        let slide = i as f32 / LOOP_COUNT as f32 * SLIDE_RANGE;
        let reach =
            (params.refraction_power + slide) * params.chromatic_aberration;
        let samples = iors.map(|ior| {
            let eta = 1.0 / (ior + slide * IOR_SPREAD);
            let refracted = refract(fragment.eye, fragment.normal, eta);
            scene.sample(fragment.uv + refraction_offset(refracted, reach))
        });
        color += saturate(spectral_blend(&samples), params.saturation);
    }
    color / LOOP_COUNT as f32
}

/// Half-vector highlight plus a weighted diffuse term.
#[must_use]
pub fn specular(
    normal: Vec3,
    eye: Vec3,
    light: Vec3,
    shininess: f32,
    diffuseness: f32,
) -> f32 {
    let light_dir = (-light).normalize_or_zero();
    let half = (eye + light_dir).normalize_or_zero();
    let n_dot_l = normal.dot(light_dir);
    let n_dot_h = normal.dot(half);
    let k_specular = (n_dot_h * n_dot_h).powf(shininess);
    let k_diffuse = n_dot_l.max(0.0);
    k_specular + k_diffuse * diffuseness
}

/// Edge brightening: 0 at normal incidence, 1 at grazing.
#[must_use]
pub fn fresnel(eye: Vec3, normal: Vec3, power: f32) -> f32 {
    let facing = eye.dot(normal).abs().min(1.0);
    (1.0 - facing).powf(power)
}

/// Final fragment color. Alpha is always 1.
pub fn shade(
    fragment: &Fragment,
    params: &DispersionUniform,
    light: Vec3,
    scene: &impl SceneSampler,
) -> [f32; 4] {
    let base = dispersion(fragment, params, scene);
    let highlight = specular(
        fragment.normal,
        fragment.eye,
        light,
        params.shininess,
        params.diffuseness,
    );
    let edge = fresnel(fragment.eye, fragment.normal, params.fresnel_power);
    let rgb = base + Vec3::splat(highlight + edge);
    [rgb.x, rgb.y, rgb.z, 1.0]
}

/// Share of the backdrop tint that is lit regardless of orientation.
pub const BACKDROP_AMBIENT: f32 = 0.35;

/// Flat-lit backdrop facet color. Facets light up whichever side faces the
/// light axis so the grid never goes fully dark.
#[must_use]
pub fn backdrop_shade(normal: Vec3, light: Vec3, tint: Vec3) -> Vec3 {
    let light_dir = (-light).normalize_or_zero();
    let lambert = normal.dot(light_dir).abs();
    tint * (BACKDROP_AMBIENT + (1.0 - BACKDROP_AMBIENT) * lambert)
}
