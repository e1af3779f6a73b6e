//! Decorative grid of small polyhedra behind the solid.
//!
//! Purely time-driven: every cell spins at the same rate with a per-cell
//! phase so the grid never rotates in lockstep.

use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};

use crate::options::SceneOptions;

/// Per-instance data for the backdrop pipeline.
/// NOTE: Must match the instance attributes in `raster/backdrop.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackdropInstance {
    /// Model matrix columns.
    pub model: [[f32; 4]; 4],
    /// Linear RGBA tint.
    pub tint: [f32; 4],
}

impl BackdropInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];

    /// Vertex buffer layout (per-instance step).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Model matrix as a glam type.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

const COOL: Vec3 = Vec3::new(0.18, 0.32, 0.85);
const WARM: Vec3 = Vec3::new(0.85, 0.28, 0.55);
/// Radians of phase between neighbouring cells.
const CELL_PHASE: f32 = 0.37;
/// Grid dimensions from options are clamped to this per axis.
pub const MAX_CELLS_PER_AXIS: usize = 64;

/// Lay out and orient every backdrop cell for the given rotation angle.
#[must_use]
pub fn backdrop_instances(
    options: &SceneOptions,
    angle: f32,
) -> Vec<BackdropInstance> {
    if !options.backdrop {
        return Vec::new();
    }
    let cols = (options.backdrop_columns as usize).min(MAX_CELLS_PER_AXIS);
    let rows = (options.backdrop_rows as usize).min(MAX_CELLS_PER_AXIS);
    let half_w = (cols.saturating_sub(1)) as f32 * 0.5;
    let half_h = (rows.saturating_sub(1)) as f32 * 0.5;

    let mut instances = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let index = row * cols + col;
            let phase = index as f32 * CELL_PHASE;
            let center = Vec3::new(
                (col as f32 - half_w) * options.backdrop_spacing,
                (row as f32 - half_h) * options.backdrop_spacing,
                options.backdrop_depth,
            );
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                angle + phase,
                angle * 0.7 + phase * 0.5,
                0.0,
            );
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(options.backdrop_size),
                rotation,
                center,
            );
            let blend = if cols > 1 {
                col as f32 / (cols - 1) as f32
            } else {
                0.5
            };
            let tint = Vec4::from((COOL.lerp(WARM, blend), 1.0));
            instances.push(BackdropInstance {
                model: model.to_cols_array_2d(),
                tint: tint.to_array(),
            });
        }
    }
    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_centered_behind_the_solid() {
        let options = SceneOptions::default();
        let instances = backdrop_instances(&options, 0.0);
        assert_eq!(
            instances.len(),
            (options.backdrop_columns * options.backdrop_rows) as usize
        );
        let centroid = instances
            .iter()
            .map(|i| i.model_matrix().w_axis.truncate())
            .sum::<Vec3>()
            / instances.len() as f32;
        assert!(centroid.x.abs() < 1e-4);
        assert!(centroid.y.abs() < 1e-4);
        assert!((centroid.z - options.backdrop_depth).abs() < 1e-4);
    }

    #[test]
    fn cells_spin_with_the_angle() {
        let options = SceneOptions::default();
        let a = backdrop_instances(&options, 0.0);
        let b = backdrop_instances(&options, 0.5);
        assert_ne!(a[0].model, b[0].model);
        // Translation is unaffected by spin
        assert_eq!(a[3].model[3], b[3].model[3]);
    }

    #[test]
    fn disabled_backdrop_is_empty() {
        let options = SceneOptions {
            backdrop: false,
            ..SceneOptions::default()
        };
        assert!(backdrop_instances(&options, 1.0).is_empty());
    }

    #[test]
    fn oversized_grid_is_clamped() {
        let options = SceneOptions {
            backdrop_columns: u32::MAX,
            backdrop_rows: 70_000,
            ..SceneOptions::default()
        };
        let instances = backdrop_instances(&options, 0.0);
        assert_eq!(instances.len(), MAX_CELLS_PER_AXIS * MAX_CELLS_PER_AXIS);
    }
}
