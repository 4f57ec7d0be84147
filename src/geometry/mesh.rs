// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Mesh representation and utilities

use super::{BoundingBox, Transform};
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    pub fn flipped(self) -> Self {
        Self::new([self.indices[0], self.indices[2], self.indices[1]])
    }
}

/// Triangular mesh.
///
/// Meshes are treated as immutable values by the rest of the crate: every
/// operation that changes geometry returns a new mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a vertex with a placeholder normal; call `recompute_normals` afterwards
    pub fn add_point(&mut self, position: Point3<f64>) -> usize {
        self.add_vertex(Vertex::new(position, Vector3::zeros()))
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Return a copy of this mesh moved by `transform`.
    ///
    /// Mirroring transforms reverse the triangle winding so faces keep
    /// pointing outward.
    pub fn transformed(&self, transform: &Transform) -> Mesh {
        let matrix = transform.matrix();
        let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or(linear);

        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let normal = normal_matrix * v.normal;
                let normal = if normal.norm() > 0.0 {
                    normal.normalize()
                } else {
                    normal
                };
                Vertex::new(matrix.transform_point(&v.position), normal)
            })
            .collect();

        let triangles = if transform.is_mirroring() {
            self.triangles.iter().map(|t| t.flipped()).collect()
        } else {
            self.triangles.clone()
        };

        Mesh {
            vertices,
            triangles,
        }
    }

    /// Append another mesh without any boolean processing
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);

        for triangle in &other.triangles {
            self.triangles.push(Triangle::new([
                triangle.indices[0] + offset,
                triangle.indices[1] + offset,
                triangle.indices[2] + offset,
            ]));
        }
    }

    /// Recompute area-weighted vertex normals from the triangles
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];

        for triangle in &self.triangles {
            let v0 = self.vertices[triangle.indices[0]].position;
            let v1 = self.vertices[triangle.indices[1]].position;
            let v2 = self.vertices[triangle.indices[2]].position;

            // Cross product length is twice the area, which gives the weighting for free
            let face_normal = (v1 - v0).cross(&(v2 - v0));
            if face_normal.norm() > 1e-12 {
                for &idx in &triangle.indices {
                    normal_sums[idx] += face_normal;
                }
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(normal_sums) {
            vertex.normal = if sum.norm() > 1e-12 {
                sum.normalize()
            } else {
                Vector3::zeros()
            };
        }
    }

    /// True when every vertex coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| {
            v.position.x.is_finite() && v.position.y.is_finite() && v.position.z.is_finite()
        })
    }

    /// SHA-256 over vertex positions and triangle indices.
    ///
    /// Two renders with identical inputs produce identical fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for vertex in &self.vertices {
            for coord in vertex.position.coords.iter() {
                hasher.update(coord.to_le_bytes());
            }
        }
        for triangle in &self.triangles {
            for index in triangle.indices {
                hasher.update((index as u64).to_le_bytes());
            }
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;

    fn unit_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_point(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(Triangle::new([a, b, c]));
        mesh.recompute_normals();
        mesh
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut mesh = unit_triangle();
        mesh.merge(&unit_triangle());
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangles[1].indices, [3, 4, 5]);
    }

    #[test]
    fn test_mirror_flips_winding() {
        let mesh = unit_triangle();
        let mirrored = mesh.transformed(&Transform::mirror(Axis::X));
        assert_eq!(mirrored.triangles[0].indices, [0, 2, 1]);
        assert!(mirrored.vertices[0].normal.z > 0.99);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = unit_triangle();
        let b = unit_triangle();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let moved = a.transformed(&Transform::translation(Vector3::new(1.0, 0.0, 0.0)));
        assert_ne!(a.fingerprint(), moved.fingerprint());
    }
}
