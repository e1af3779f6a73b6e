// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Refractive, chromatically dispersive hero visual built on wgpu.
//!
//! Prisma draws a faceted glass solid over a slowly spinning grid of small
//! polyhedra. Every frame renders the scene twice into offscreen targets
//! and shades the solid by sampling them along six per-wavelength
//! refraction vectors, with Fresnel and specular terms that follow the
//! pointer.
//!
//! # Key entry points
//!
//! - [`HeroVisual`] - the mounted visual: feed it [`InputEvent`]s and call
//!   [`HeroVisual::tick`] once per host frame
//! - [`frame::FrameDriver`] - the `RenderBack -> RenderFront -> Present`
//!   pass sequence over any [`frame::PassBackend`]
//! - [`renderer::GpuBackend`] / [`software::SoftwareBackend`] - the wgpu
//!   and deterministic CPU backends
//! - [`options::Options`] - dispersion, motion, scene and camera settings
//!   with TOML presets
//!
//! # Hosts
//!
//! The `viewer` feature provides a winit window ([`Viewer`]); the `web`
//! feature exposes `start(canvas_id, video_selector, options_toml)` to
//! JavaScript.

pub mod animation;
pub mod camera;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod hero;
pub mod input;
pub mod media;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod shading;
pub mod software;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use error::PrismaError;
pub use hero::HeroVisual;
pub use input::InputEvent;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
