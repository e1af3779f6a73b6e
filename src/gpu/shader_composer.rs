use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use super::render_context::RenderContextError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import prisma::scene` to pull in the frame uniform. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/scene.wgsl"),
    file_path: "modules/scene.wgsl",
}];

/// Dispersion shader drawn for the back-face and front-face passes.
pub const DISPERSION_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/raster/dispersion.wgsl"),
    "raster/dispersion.wgsl",
);

/// Instanced backdrop polyhedra.
pub const BACKDROP_SHADER: (&str, &str) = (
    include_str!("../../assets/shaders/raster/backdrop.wgsl"),
    "raster/backdrop.wgsl",
);

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError::Shader`] if a module fails to parse.
    pub fn new() -> Result<Self, RenderContextError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    RenderContextError::Shader(format!("{}: {e:?}", m.file_path))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        (source, file_path): (&str, &str),
    ) -> Result<wgpu::ShaderModule, RenderContextError> {
        let naga_module = self
            .compose_naga(source, file_path)
            .map_err(|e| RenderContextError::Shader(format!("{file_path}: {e}")))?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Lets tests validate shaders without a device.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<naga_oil::compose::ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;
    use crate::frame::uniforms::{
        DispersionUniform, SceneUniform, SolidUniform,
    };

    /// Size and `(member, offset)` pairs of the struct whose name starts
    /// with `name`. Imported types carry a naga_oil suffix.
    fn struct_layout(
        module: &naga::Module,
        name: &str,
    ) -> (usize, Vec<(String, usize)>) {
        module
            .types
            .iter()
            .find_map(|(_, ty)| {
                let naga::TypeInner::Struct { members, span } = &ty.inner
                else {
                    return None;
                };
                let _ = ty.name.as_deref().filter(|n| n.starts_with(name))?;
                let members = members
                    .iter()
                    .map(|m| {
                        let member = m.name.as_deref().unwrap_or_default();
                        let member =
                            member.split("X_naga_oil").next().unwrap_or(member);
                        (member.to_owned(), m.offset as usize)
                    })
                    .filter(|(member, _)| !member.starts_with("pad"))
                    .collect();
                Some((*span as usize, members))
            })
            .unwrap_or_else(|| panic!("struct {name} not found"))
    }

    fn fields(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
        pairs.iter().map(|(n, o)| ((*n).to_owned(), *o)).collect()
    }

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in [DISPERSION_SHADER, BACKDROP_SHADER] {
            let _ = composer.compose_naga(source, file_path).unwrap_or_else(
                |e| panic!("Shader '{file_path}' failed to compose: {e}"),
            );
        }
    }

    #[test]
    fn dispersion_shader_exposes_both_entry_points() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, path) = DISPERSION_SHADER;
        let module = composer.compose_naga(source, path).unwrap();
        let names: Vec<_> =
            module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn composed_shaders_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in [DISPERSION_SHADER, BACKDROP_SHADER] {
            let module = composer.compose_naga(source, file_path).unwrap();
            let _ = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            )
            .validate(&module)
            .unwrap_or_else(|e| panic!("{file_path} is invalid: {e:?}"));
        }
    }

    #[test]
    fn uniform_layouts_match_rust_structs() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, path) = DISPERSION_SHADER;
        let module = composer.compose_naga(source, path).unwrap();

        let (size, members) = struct_layout(&module, "SceneUniform");
        assert_eq!(size, size_of::<SceneUniform>());
        assert_eq!(
            members,
            fields(&[
                ("view_proj", offset_of!(SceneUniform, view_proj)),
                ("eye", offset_of!(SceneUniform, eye)),
                ("elapsed", offset_of!(SceneUniform, elapsed)),
                ("light", offset_of!(SceneUniform, light)),
                ("background", offset_of!(SceneUniform, background)),
                ("resolution", offset_of!(SceneUniform, resolution)),
            ])
        );

        let (size, members) = struct_layout(&module, "SolidUniform");
        assert_eq!(size, size_of::<SolidUniform>());
        assert_eq!(
            members,
            fields(&[
                ("model", offset_of!(SolidUniform, model)),
                ("face_sign", offset_of!(SolidUniform, face_sign)),
            ])
        );

        let (size, members) = struct_layout(&module, "DispersionUniform");
        assert_eq!(size, size_of::<DispersionUniform>());
        assert_eq!(
            members,
            fields(&[
                ("ior_rygc", offset_of!(DispersionUniform, ior_rygc)),
                ("ior_bv", offset_of!(DispersionUniform, ior_bv)),
                (
                    "refraction_power",
                    offset_of!(DispersionUniform, refraction_power),
                ),
                (
                    "chromatic_aberration",
                    offset_of!(DispersionUniform, chromatic_aberration),
                ),
                ("saturation", offset_of!(DispersionUniform, saturation)),
                ("shininess", offset_of!(DispersionUniform, shininess)),
                ("diffuseness", offset_of!(DispersionUniform, diffuseness)),
                (
                    "fresnel_power",
                    offset_of!(DispersionUniform, fresnel_power),
                ),
            ])
        );
    }
}
