//! Scene content: the refractive solid, the backdrop grid, and the
//! geometry both are built from.

/// Decorative polyhedron grid.
pub mod backdrop;
/// Faceted meshes and convex ray casting.
pub mod mesh;

pub use backdrop::{backdrop_instances, BackdropInstance};
pub use mesh::{
    icosahedron, octahedron, ConvexHull, HullHit, Mesh, PlacedHull, Vertex,
};

/// Which of the solid's two mesh representations is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolidFace {
    /// Front faces only (back faces culled). Normals point out.
    Front,
    /// Back faces only (front faces culled). Normals flipped inward.
    Back,
}

impl SolidFace {
    /// Sign applied to the outward facet normal when shading.
    #[must_use]
    pub fn normal_sign(self) -> f32 {
        match self {
            Self::Front => 1.0,
            Self::Back => -1.0,
        }
    }
}

/// Mesh used for the refractive solid.
#[must_use]
pub fn solid_mesh() -> Mesh {
    icosahedron()
}

/// Mesh used for each backdrop cell.
#[must_use]
pub fn backdrop_mesh() -> Mesh {
    octahedron()
}
