//! Instanced backdrop polyhedra.

use super::GpuMesh;
use crate::{
    gpu::{
        pipeline_helpers::{self, MeshPipelineDesc},
        render_context::{RenderContext, RenderContextError},
        shader_composer::{ShaderComposer, BACKDROP_SHADER},
    },
    scene::{self, BackdropInstance, Vertex},
};

/// GPU side of the backdrop grid.
pub struct BackdropRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: GpuMesh,
    instance_buffer: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instance_count: u32,
}

impl BackdropRenderer {
    /// Build the instanced pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError::Shader`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        scene_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, RenderContextError> {
        let device = &context.device;
        let shader =
            composer.compose(device, "Backdrop Shader", BACKDROP_SHADER)?;
        let pipeline = pipeline_helpers::create_mesh_pipeline(
            device,
            &MeshPipelineDesc {
                label: "Backdrop",
                shader: &shader,
                format: context.format(),
                buffers: &[Vertex::layout(), BackdropInstance::layout()],
                cull_mode: Some(wgpu::Face::Back),
                bind_group_layouts: &[scene_layout],
            },
        );
        Ok(Self {
            pipeline,
            mesh: GpuMesh::upload(device, "Backdrop", &scene::backdrop_mesh()),
            instance_buffer: None,
            instance_capacity: 0,
            instance_count: 0,
        })
    }

    /// Upload this frame's instances, growing the buffer when needed.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[BackdropInstance],
    ) {
        self.instance_count = instances.len() as u32;
        if instances.is_empty() {
            return;
        }
        if instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            self.instance_buffer =
                Some(device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Backdrop Instances"),
                    size: (capacity * size_of::<BackdropInstance>())
                        as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::VERTEX
                        | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
            self.instance_capacity = capacity;
        }
        if let Some(buffer) = &self.instance_buffer {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    /// Draw every instance. Group 0 must already be bound.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(instances) = &self.instance_buffer else {
            return;
        };
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(1, instances.slice(..));
        self.mesh.draw(render_pass, self.instance_count);
    }
}
