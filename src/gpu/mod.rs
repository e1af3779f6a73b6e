//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, offscreen targets, pipeline
//! boilerplate and shader composition.

/// Shared wgpu boilerplate for the mesh pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Offscreen color and depth targets.
pub mod texture;
