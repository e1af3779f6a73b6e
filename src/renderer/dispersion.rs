//! Refractive solid: the six-channel dispersion shader drawn once per face
//! set.
//!
//! The back-face pipeline culls front faces and flips normals inward; the
//! front-face pipeline culls back faces. Each face set has its own solid
//! uniform buffer because both are written before the frame is submitted.

use super::GpuMesh;
use crate::{
    frame::{uniforms::SolidUniform, FrameUniforms},
    gpu::{
        pipeline_helpers::{self, MeshPipelineDesc},
        render_context::{RenderContext, RenderContextError},
        shader_composer::{ShaderComposer, DISPERSION_SHADER},
    },
    scene::{self, SolidFace, Vertex},
};

struct FaceBinding {
    pipeline: wgpu::RenderPipeline,
    solid_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// GPU side of the refractive solid.
pub struct DispersionRenderer {
    mesh: GpuMesh,
    params_buffer: wgpu::Buffer,
    input_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    back: FaceBinding,
    front: FaceBinding,
}

impl DispersionRenderer {
    /// Build both pipelines and their uniform bindings.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError::Shader`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        scene_layout: &wgpu::BindGroupLayout,
        initial: &FrameUniforms,
    ) -> Result<Self, RenderContextError> {
        let device = &context.device;
        let shader =
            composer.compose(device, "Dispersion Shader", DISPERSION_SHADER)?;

        let solid_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Solid Bind Group Layout"),
                entries: &[
                    pipeline_helpers::uniform_buffer(0),
                    pipeline_helpers::uniform_buffer(1),
                ],
            });
        let input_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Pass Input Bind Group Layout"),
                entries: &[
                    pipeline_helpers::texture_2d(0),
                    pipeline_helpers::filtering_sampler(1),
                ],
            });

        let params_buffer = pipeline_helpers::create_uniform_buffer(
            device,
            "Dispersion Params",
            &initial.dispersion,
        );

        let layouts = [scene_layout, &solid_layout, &input_layout];
        let build_face = |face: SolidFace| {
            let (label, cull_mode) = match face {
                SolidFace::Back => ("Solid Back Faces", wgpu::Face::Front),
                SolidFace::Front => ("Solid Front Faces", wgpu::Face::Back),
            };
            let pipeline = pipeline_helpers::create_mesh_pipeline(
                device,
                &MeshPipelineDesc {
                    label,
                    shader: &shader,
                    format: context.format(),
                    buffers: &[Vertex::layout()],
                    cull_mode: Some(cull_mode),
                    bind_group_layouts: &layouts,
                },
            );
            let solid_buffer = pipeline_helpers::create_uniform_buffer(
                device,
                label,
                &initial.solid_uniform(face),
            );
            let bind_group =
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(label),
                    layout: &solid_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: solid_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: params_buffer.as_entire_binding(),
                        },
                    ],
                });
            FaceBinding {
                pipeline,
                solid_buffer,
                bind_group,
            }
        };
        let back = build_face(SolidFace::Back);
        let front = build_face(SolidFace::Front);

        Ok(Self {
            mesh: GpuMesh::upload(device, "Solid", &scene::solid_mesh()),
            params_buffer,
            input_layout,
            sampler: pipeline_helpers::linear_sampler(
                device,
                "Pass Input Sampler",
            ),
            back,
            front,
        })
    }

    /// Layout for the bind group that samples the previous pass.
    pub fn input_layout(&self) -> &wgpu::BindGroupLayout {
        &self.input_layout
    }

    /// Sampler used to read offscreen targets.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Upload this frame's solid transforms and shading parameters.
    pub fn prepare(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        for (face, binding) in
            [(SolidFace::Back, &self.back), (SolidFace::Front, &self.front)]
        {
            let solid: SolidUniform = uniforms.solid_uniform(face);
            queue.write_buffer(
                &binding.solid_buffer,
                0,
                bytemuck::bytes_of(&solid),
            );
        }
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&uniforms.dispersion),
        );
    }

    /// Draw one face set, sampling `input`. Group 0 must already be bound.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        face: SolidFace,
        input: &wgpu::BindGroup,
    ) {
        let binding = match face {
            SolidFace::Back => &self.back,
            SolidFace::Front => &self.front,
        };
        render_pass.set_pipeline(&binding.pipeline);
        render_pass.set_bind_group(1, &binding.bind_group, &[]);
        render_pass.set_bind_group(2, input, &[]);
        self.mesh.draw(render_pass, 1);
    }
}
