use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
/// Solid and backdrop layout.
pub struct SceneOptions {
    /// Circumradius of the refractive solid.
    #[schemars(title = "Solid Size", range(min = 0.5, max = 3.0), extend("step" = 0.05))]
    pub solid_radius: f32,
    /// Show the grid of decorative polyhedra behind the solid.
    #[schemars(title = "Backdrop")]
    pub backdrop: bool,
    /// Backdrop grid columns.
    #[schemars(skip)]
    pub backdrop_columns: u32,
    /// Backdrop grid rows.
    #[schemars(skip)]
    pub backdrop_rows: u32,
    /// Center-to-center spacing of backdrop cells in world units.
    #[schemars(skip)]
    pub backdrop_spacing: f32,
    /// Circumradius of each backdrop polyhedron.
    #[schemars(skip)]
    pub backdrop_size: f32,
    /// Z offset of the backdrop plane (negative = behind the solid).
    #[schemars(skip)]
    pub backdrop_depth: f32,
    /// Backdrop auto-rotation rate, radians per second.
    #[schemars(title = "Backdrop Spin", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub backdrop_spin: f32,
    /// Linear clear color behind everything.
    #[schemars(skip)]
    pub background: [f32; 3],
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            solid_radius: 1.4,
            backdrop: true,
            backdrop_columns: 9,
            backdrop_rows: 6,
            backdrop_spacing: 1.1,
            backdrop_size: 0.28,
            backdrop_depth: -3.0,
            backdrop_spin: 0.4,
            background: [0.02, 0.02, 0.03],
        }
    }
}
