//! wgpu implementation of the pass pipeline.
//!
//! [`GpuBackend`] owns the surface, both offscreen targets and every
//! pipeline. Each stage is one render pass: the backdrop is drawn into
//! every target, and the solid is drawn on top while sampling the target
//! the previous stage wrote.

mod backdrop;
mod dispersion;
mod targets;

use backdrop::BackdropRenderer;
use dispersion::DispersionRenderer;
use targets::PassTargets;
use wgpu::util::DeviceExt;

use crate::{
    frame::{
        compute_uniforms, FrameInputs, FrameUniforms, PassBackend,
        PassDescriptor, SkipReason, Viewport,
    },
    gpu::{
        pipeline_helpers,
        render_context::{AcquireError, RenderContext, RenderContextError},
        shader_composer::ShaderComposer,
    },
    options::Options,
    scene::Mesh,
};

/// Vertex and index buffers for a static mesh.
pub(crate) struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub(crate) fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub(crate) fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: u32) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass
            .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..instances);
    }
}

/// Encoder and swapchain texture for the frame being recorded.
struct FrameInFlight {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

/// GPU pass backend.
pub struct GpuBackend {
    context: RenderContext,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    dispersion: DispersionRenderer,
    backdrop: BackdropRenderer,
    targets: Option<PassTargets>,
    frame: Option<FrameInFlight>,
}

impl GpuBackend {
    /// Build every pipeline for the given context.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError::Shader`] if a shader fails to compose.
    pub fn new(
        context: RenderContext,
        options: &Options,
    ) -> Result<Self, RenderContextError> {
        let mut composer = ShaderComposer::new()?;
        let (width, height) = context.size();
        let viewport = Viewport::new(width, height)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        let initial = compute_uniforms(
            &FrameInputs::new(glam::Vec2::ZERO, 0.0),
            options,
            viewport,
        );

        let device = &context.device;
        let scene_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(0)],
            });
        let scene_buffer = pipeline_helpers::create_uniform_buffer(
            device,
            "Scene Uniform",
            &initial.scene_uniform(),
        );
        let scene_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Scene Bind Group"),
                layout: &scene_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                }],
            });

        let dispersion = DispersionRenderer::new(
            &context,
            &mut composer,
            &scene_layout,
            &initial,
        )?;
        let backdrop =
            BackdropRenderer::new(&context, &mut composer, &scene_layout)?;

        Ok(Self {
            context,
            scene_buffer,
            scene_bind_group,
            dispersion,
            backdrop,
            targets: None,
            frame: None,
        })
    }
}

impl From<AcquireError> for SkipReason {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Reconfigured => Self::SurfaceReconfigured,
            AcquireError::Unavailable => Self::SurfaceUnavailable,
        }
    }
}

impl PassBackend for GpuBackend {
    fn resize_targets(&mut self, viewport: Viewport) {
        self.context.resize(viewport.width, viewport.height);
        self.targets = Some(PassTargets::new(
            &self.context.device,
            viewport,
            self.context.format(),
            self.dispersion.input_layout(),
            self.dispersion.sampler(),
        ));
    }

    fn release_targets(&mut self) {
        self.targets = None;
        self.frame = None;
    }

    fn begin_frame(
        &mut self,
        uniforms: &FrameUniforms,
    ) -> Result<(), SkipReason> {
        let Some(targets) = &self.targets else {
            return Err(SkipReason::ZeroArea);
        };
        if targets.viewport() != uniforms.viewport {
            return Err(SkipReason::ZeroArea);
        }
        let surface_texture =
            self.context.acquire().map_err(SkipReason::from)?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let queue = &self.context.queue;
        queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&uniforms.scene_uniform()),
        );
        self.dispersion.prepare(queue, uniforms);
        self.backdrop
            .prepare(&self.context.device, queue, &uniforms.backdrop);

        self.frame = Some(FrameInFlight {
            encoder: self.context.create_encoder(),
            surface_texture,
            surface_view,
        });
        Ok(())
    }

    fn execute(&mut self, pass: &PassDescriptor, uniforms: &FrameUniforms) {
        let (Some(frame), Some(targets)) = (&mut self.frame, &self.targets)
        else {
            log::warn!("{:?} executed outside a frame", pass.stage);
            return;
        };
        let color_view = targets
            .view(pass.target)
            .unwrap_or(&frame.surface_view);
        let input = pass.input.and_then(|source| targets.input(source));

        let [r, g, b] = uniforms.background.to_array();
        let mut render_pass =
            frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(&format!("{:?}", pass.stage)),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: targets.depth_view(),
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        self.backdrop.draw(&mut render_pass);
        if let (Some(face), Some(input)) = (pass.solid, input) {
            self.dispersion.draw(&mut render_pass, face, input);
        }
    }

    fn end_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        self.context.submit(frame.encoder);
        frame.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_failures_keep_their_reason() {
        assert_eq!(
            SkipReason::from(AcquireError::Reconfigured),
            SkipReason::SurfaceReconfigured
        );
        assert_eq!(
            SkipReason::from(AcquireError::Unavailable),
            SkipReason::SurfaceUnavailable
        );
    }
}
