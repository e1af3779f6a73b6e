//! Offscreen color and depth targets for the pass ping-pong.

use crate::frame::Viewport;

/// Depth format shared by every pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A render-target texture and its default view.
///
/// Created with `RENDER_ATTACHMENT | TEXTURE_BINDING` so one pass can draw
/// into it and a later pass can sample it.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create a color target matching the viewport.
    #[must_use]
    pub fn color(
        device: &wgpu::Device,
        label: &str,
        viewport: Viewport,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self::new(
            device,
            label,
            viewport,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    /// Create a depth target matching the viewport.
    #[must_use]
    pub fn depth(device: &wgpu::Device, viewport: Viewport) -> Self {
        Self::new(
            device,
            "Prisma Depth",
            viewport,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    }

    fn new(
        device: &wgpu::Device,
        label: &str,
        viewport: Viewport,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: viewport.width,
                height: viewport.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
