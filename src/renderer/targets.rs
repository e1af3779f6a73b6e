//! Offscreen back/front targets plus the shared depth buffer.

use crate::{
    frame::{PassTarget, Viewport},
    gpu::texture::RenderTarget,
};

/// Targets owned by the GPU backend for one viewport size.
pub struct PassTargets {
    viewport: Viewport,
    back: RenderTarget,
    front: RenderTarget,
    depth: RenderTarget,
    /// Samples `back`; bound while drawing the back-face solid.
    pub back_input: wgpu::BindGroup,
    /// Samples `front`; bound while drawing the front-face solid.
    pub front_input: wgpu::BindGroup,
}

impl PassTargets {
    /// Allocate both color targets, the depth buffer and the bind groups
    /// that read them.
    pub fn new(
        device: &wgpu::Device,
        viewport: Viewport,
        format: wgpu::TextureFormat,
        input_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let back = RenderTarget::color(device, "Prisma Back Target", viewport, format);
        let front =
            RenderTarget::color(device, "Prisma Front Target", viewport, format);
        let depth = RenderTarget::depth(device, viewport);
        let back_input = input_bind_group(
            device,
            "Prisma Back Input",
            input_layout,
            &back.view,
            sampler,
        );
        let front_input = input_bind_group(
            device,
            "Prisma Front Input",
            input_layout,
            &front.view,
            sampler,
        );
        log::debug!(
            "allocated pass targets {}x{}",
            viewport.width,
            viewport.height
        );
        Self {
            viewport,
            back,
            front,
            depth,
            back_input,
            front_input,
        }
    }

    /// Size the targets were allocated for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Color view for an offscreen target. `Screen` has no offscreen view.
    pub fn view(&self, target: PassTarget) -> Option<&wgpu::TextureView> {
        match target {
            PassTarget::Back => Some(&self.back.view),
            PassTarget::Front => Some(&self.front.view),
            PassTarget::Screen => None,
        }
    }

    /// Bind group sampling an offscreen target.
    pub fn input(&self, target: PassTarget) -> Option<&wgpu::BindGroup> {
        match target {
            PassTarget::Back => Some(&self.back_input),
            PassTarget::Front => Some(&self.front_input),
            PassTarget::Screen => None,
        }
    }

    /// Depth view shared by every pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }
}

fn input_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
