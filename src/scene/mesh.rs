//! Faceted polyhedron meshes and their convex half-space form.
//!
//! Meshes are flat shaded: each triangle owns its three vertices so the
//! facet normal is exact at every fragment. The same faces double as the
//! plane set used for CPU ray casting.

use glam::{Mat4, Vec3};

use crate::camera::Ray;

/// Vertex layout shared by the solid and backdrop pipelines.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Outward facet normal.
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout (per-vertex step).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangle mesh with outward (counter-clockwise) winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Flat-shaded vertices, three per triangle.
    pub vertices: Vec<Vertex>,
    /// Triangle indices.
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Build a flat-shaded mesh from shared corner positions and triangle
    /// index triples. Winding is fixed up so every facet faces away from
    /// the origin.
    #[must_use]
    pub fn faceted(corners: &[Vec3], faces: &[[usize; 3]]) -> Self {
        let mut vertices = Vec::with_capacity(faces.len() * 3);
        for face in faces {
            let [mut a, b, mut c] = face.map(|i| corners[i]);
            let mut normal = (b - a).cross(c - a).normalize();
            if normal.dot(a + b + c) < 0.0 {
                std::mem::swap(&mut a, &mut c);
                normal = -normal;
            }
            for p in [a, b, c] {
                vertices.push(Vertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                });
            }
        }
        let indices = (0..vertices.len() as u16).collect();
        Self { vertices, indices }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Regular icosahedron with unit circumradius.
#[must_use]
pub fn icosahedron() -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|c| Vec3::from(*c).normalize())
    .collect();
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    Mesh::faceted(&corners, &faces)
}

/// Regular octahedron with unit circumradius.
#[must_use]
pub fn octahedron() -> Mesh {
    let corners = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let mut faces = Vec::with_capacity(8);
    for x in [0, 1] {
        for y in [2, 3] {
            for z in [4, 5] {
                faces.push([x, y, z]);
            }
        }
    }
    Mesh::faceted(&corners, &faces)
}

/// A plane `normal · p = offset` with an outward unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Outward unit normal.
    pub normal: Vec3,
    /// Distance from the origin along the normal.
    pub offset: f32,
}

/// Entry and exit of a ray through a convex solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullHit {
    /// Ray parameter where the front surface is crossed.
    pub t_enter: f32,
    /// World-space outward normal of the entered facet.
    pub enter_normal: Vec3,
    /// Ray parameter where the rear surface is crossed.
    pub t_exit: f32,
    /// World-space outward normal of the exited facet.
    pub exit_normal: Vec3,
}

/// Convex solid as an intersection of half-spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    planes: Vec<Plane>,
}

impl ConvexHull {
    /// One plane per mesh facet.
    #[must_use]
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let planes = mesh
            .vertices
            .chunks_exact(3)
            .map(|tri| {
                let normal = Vec3::from(tri[0].normal);
                Plane {
                    normal,
                    offset: normal.dot(Vec3::from(tri[0].position)),
                }
            })
            .collect();
        Self { planes }
    }

    /// Place this hull in the world. `model` must be a rotation with
    /// uniform scale and translation.
    #[must_use]
    pub fn place(&self, model: Mat4) -> PlacedHull<'_> {
        PlacedHull {
            hull: self,
            model,
            inverse: model.inverse(),
        }
    }

    /// Intersect a world-space ray with this hull placed by `model`.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, model: &Mat4) -> Option<HullHit> {
        self.place(*model).intersect(ray)
    }
}

/// A hull with its world transform and cached inverse.
#[derive(Debug, Clone, Copy)]
pub struct PlacedHull<'a> {
    hull: &'a ConvexHull,
    model: Mat4,
    inverse: Mat4,
}

impl PlacedHull<'_> {
    /// Entry and exit of a world-space ray, if it touches the hull in front
    /// of its origin.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<HullHit> {
        let origin = self.inverse.transform_point3(ray.origin);
        let direction = self.inverse.transform_vector3(ray.direction);

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter = Vec3::ZERO;
        let mut exit = Vec3::ZERO;
        for plane in &self.hull.planes {
            let denom = plane.normal.dot(direction);
            let dist = plane.offset - plane.normal.dot(origin);
            if denom.abs() < 1e-8 {
                if dist < 0.0 {
                    return None;
                }
                continue;
            }
            let t = dist / denom;
            if denom < 0.0 {
                if t > t_enter {
                    t_enter = t;
                    enter = plane.normal;
                }
            } else if t < t_exit {
                t_exit = t;
                exit = plane.normal;
            }
            if t_enter > t_exit {
                return None;
            }
        }
        if t_exit < 0.0 || !t_enter.is_finite() {
            return None;
        }
        Some(HullHit {
            t_enter,
            enter_normal: self.model.transform_vector3(enter).normalize(),
            t_exit,
            exit_normal: self.model.transform_vector3(exit).normalize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.vertices.chunks_exact(3) {
            let centroid = tri
                .iter()
                .map(|v| Vec3::from(v.position))
                .sum::<Vec3>()
                / 3.0;
            assert!(Vec3::from(tri[0].normal).dot(centroid) > 0.0);
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(Vec3::from(tri[0].normal)) > 0.0);
        }
    }

    #[test]
    fn icosahedron_is_closed_and_outward() {
        let mesh = icosahedron();
        assert_eq!(mesh.triangle_count(), 20);
        assert_outward(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
        // Facet normals of a closed solid cancel out
        let sum: Vec3 = mesh
            .vertices
            .chunks_exact(3)
            .map(|tri| Vec3::from(tri[0].normal))
            .sum();
        assert!(sum.length() < 1e-4);
    }

    #[test]
    fn octahedron_is_outward() {
        let mesh = octahedron();
        assert_eq!(mesh.triangle_count(), 8);
        assert_outward(&mesh);
    }

    #[test]
    fn ray_through_center_enters_and_exits() {
        let hull = ConvexHull::from_mesh(&octahedron());
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let hit = hull.intersect(&ray, &Mat4::IDENTITY).unwrap();
        assert!((hit.t_enter - 4.0).abs() < 1e-5);
        assert!((hit.t_exit - 6.0).abs() < 1e-5);
        assert!(hit.enter_normal.z > 0.0);
        assert!(hit.exit_normal.z < 0.0);
    }

    #[test]
    fn scaled_hull_moves_the_surface() {
        let hull = ConvexHull::from_mesh(&octahedron());
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let model = Mat4::from_scale(Vec3::splat(2.0));
        let hit = hull.intersect(&ray, &model).unwrap();
        assert!((hit.t_enter - 3.0).abs() < 1e-5);
        assert!((hit.enter_normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_that_misses_returns_none() {
        let hull = ConvexHull::from_mesh(&icosahedron());
        let ray = Ray {
            origin: Vec3::new(3.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert!(hull.intersect(&ray, &Mat4::IDENTITY).is_none());
    }
}
