use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-wavelength refraction and surface shading parameters.
///
/// These are the base values; the per-frame uniform block is derived from
/// them together with pointer position and elapsed time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Dispersion", inline)]
#[serde(default)]
pub struct DispersionOptions {
    /// Index of refraction for the red channel.
    #[schemars(title = "IOR Red", range(min = 1.0, max = 2.0), extend("step" = 0.005))]
    pub ior_red: f32,
    /// Index of refraction for the yellow channel.
    #[schemars(title = "IOR Yellow", range(min = 1.0, max = 2.0), extend("step" = 0.005))]
    pub ior_yellow: f32,
    /// Index of refraction for the green channel.
    #[schemars(title = "IOR Green", range(min = 1.0, max = 2.0), extend("step" = 0.005))]
    pub ior_green: f32,
    /// Index of refraction for the cyan channel.
    #[schemars(title = "IOR Cyan", range(min = 1.0, max = 2.0), extend("step" = 0.005))]
    pub ior_cyan: f32,
    /// Index of refraction for the blue channel.
    #[schemars(title = "IOR Blue", range(min = 1.0, max = 2.0), extend("step" = 0.005))]
    pub ior_blue: f32,
    /// Index of refraction for the violet channel.
    #[schemars(title = "IOR Violet", range(min = 1.0, max = 2.0), extend("step" = 0.005))]
    pub ior_violet: f32,
    /// Scales how far refracted samples land from the fragment.
    #[schemars(title = "Refraction Power", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub refraction_power: f32,
    /// Multiplier on the per-channel sample offsets.
    #[schemars(title = "Chromatic Aberration", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub chromatic_aberration: f32,
    /// Saturation applied to each dispersion sample (1.0 = unchanged).
    #[schemars(title = "Saturation", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub saturation: f32,
    /// Specular exponent.
    #[schemars(title = "Shininess", range(min = 1.0, max = 128.0), extend("step" = 1.0))]
    pub shininess: f32,
    /// Weight of the diffuse term added to the specular highlight.
    #[schemars(title = "Diffuseness", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub diffuseness: f32,
    /// Fresnel falloff exponent (higher = tighter edge band).
    #[schemars(title = "Fresnel Power", range(min = 0.5, max = 16.0), extend("step" = 0.1))]
    pub fresnel_power: f32,
    /// Base light vector before pointer offset is applied.
    #[schemars(skip)]
    pub light: [f32; 3],
}

impl Default for DispersionOptions {
    fn default() -> Self {
        Self {
            ior_red: 1.15,
            ior_yellow: 1.16,
            ior_green: 1.18,
            ior_cyan: 1.19,
            ior_blue: 1.21,
            ior_violet: 1.22,
            refraction_power: 0.3,
            chromatic_aberration: 1.0,
            saturation: 1.08,
            shininess: 40.0,
            diffuseness: 0.2,
            fresnel_power: 8.0,
            light: [-1.0, 1.0, 1.0],
        }
    }
}

impl DispersionOptions {
    /// The six IORs in spectral order: red, yellow, green, cyan, blue,
    /// violet.
    #[must_use]
    pub fn iors(&self) -> [f32; 6] {
        [
            self.ior_red,
            self.ior_yellow,
            self.ior_green,
            self.ior_cyan,
            self.ior_blue,
            self.ior_violet,
        ]
    }
}
