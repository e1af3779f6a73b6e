//! Linear RGBA float color buffers with bilinear sampling.

use glam::{Vec2, Vec3, Vec4};

use crate::{frame::Viewport, shading::SceneSampler};

/// A CPU color target.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
    written: bool,
}

impl ColorBuffer {
    /// Allocate a transparent-black buffer for the viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![[0.0; 4]; pixel_index(viewport.width, 0, viewport.height)],
            written: false,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixels, row-major from the top-left.
    #[must_use]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Whether any pass has drawn into this buffer since the last clear.
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Whether every pixel is still transparent black.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == [0.0; 4])
    }

    /// Reset to transparent black and mark unwritten.
    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
        self.written = false;
    }

    /// Mark the buffer as drawn into this frame.
    pub fn mark_written(&mut self) {
        self.written = true;
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Overwrite pixel at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        self.pixels[pixel_index(self.width, x, y)] = rgba;
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        Vec4::from(self.get(x, y))
    }
}

/// Row-major offset, computed in `usize` so large targets cannot overflow.
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

impl SceneSampler for ColorBuffer {
    /// Bilinear, clamp-to-edge, matching a linear wgpu sampler.
    fn sample(&self, uv: Vec2) -> Vec3 {
        let px = uv.x * self.width as f32 - 0.5;
        let py = uv.y * self.height as f32 - 0.5;
        let x0 = px.floor();
        let y0 = py.floor();
        let fx = px - x0;
        let fy = py - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom =
            self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ColorBuffer {
        let mut buffer = ColorBuffer::new(Viewport::new(2, 2).unwrap());
        buffer.set(0, 0, [1.0, 0.0, 0.0, 1.0]);
        buffer.set(1, 0, [0.0, 1.0, 0.0, 1.0]);
        buffer.set(0, 1, [0.0, 0.0, 1.0, 1.0]);
        buffer.set(1, 1, [1.0, 1.0, 1.0, 1.0]);
        buffer
    }

    #[test]
    fn pixel_index_does_not_wrap_for_large_targets() {
        assert_eq!(pixel_index(70_000, 0, 70_000) as u64, 4_900_000_000);
        assert_eq!(pixel_index(3, 2, 1), 5);
    }

    #[test]
    fn texel_centers_sample_exactly() {
        let buffer = checker();
        assert_eq!(buffer.sample(Vec2::new(0.25, 0.25)), Vec3::X);
        assert_eq!(buffer.sample(Vec2::new(0.75, 0.75)), Vec3::ONE);
    }

    #[test]
    fn midpoint_blends_all_four() {
        let sample = checker().sample(Vec2::splat(0.5));
        assert!((sample - Vec3::new(0.5, 0.5, 0.5)).length() < 1e-6);
    }

    #[test]
    fn out_of_range_clamps_to_edge() {
        let buffer = checker();
        assert_eq!(buffer.sample(Vec2::new(-3.0, -3.0)), Vec3::X);
        assert_eq!(buffer.sample(Vec2::new(4.0, 4.0)), Vec3::ONE);
    }

    #[test]
    fn clear_resets_written_flag() {
        let mut buffer = checker();
        buffer.mark_written();
        assert!(buffer.is_written());
        buffer.clear();
        assert!(!buffer.is_written());
        assert!(buffer.is_blank());
    }
}
