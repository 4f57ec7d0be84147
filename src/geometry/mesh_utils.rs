// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Mesh connectivity checks
//!
//! These work on vertex indices, so they are only meaningful for meshes whose
//! coincident vertices share an index (primitives and boolean results).

use super::{BoundingBox, Mesh};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// Undirected edge, smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    fn new(v0: usize, v1: usize) -> Self {
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

fn build_edge_counts(mesh: &Mesh) -> HashMap<Edge, u32> {
    let mut edge_counts: HashMap<Edge, u32> = HashMap::new();

    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.indices;
        for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }

    edge_counts
}

/// Check if mesh is manifold (each edge shared by at most 2 triangles)
pub fn is_manifold(mesh: &Mesh) -> bool {
    build_edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Check if mesh is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(mesh: &Mesh) -> bool {
    !mesh.triangles.is_empty() && build_edge_counts(mesh).values().all(|&count| count == 2)
}

/// True when any triangle's bounding box overlaps `region`.
///
/// Conservative: a `true` only means the surface may pass through `region`.
pub fn surface_touches(mesh: &Mesh, region: &BoundingBox, tolerance: f64) -> bool {
    mesh.triangles.iter().any(|tri| {
        let mut bounds = BoundingBox::empty();
        for &index in &tri.indices {
            bounds.expand_to_include(&mesh.vertices[index].position);
        }
        bounds.intersects(region, tolerance)
    })
}

/// Check if a point is inside a closed mesh using ray casting
pub fn contains_point(mesh: &Mesh, point: &Point3<f64>) -> bool {
    // Skewed so the ray does not run along axis-aligned edges and faces
    let direction = Vector3::new(1.0, 0.000_123_7, 0.000_317_9).normalize();

    let crossings = mesh
        .triangles
        .iter()
        .filter(|tri| {
            ray_intersects_triangle(
                point,
                &direction,
                &mesh.vertices[tri.indices[0]].position,
                &mesh.vertices[tri.indices[1]].position,
                &mesh.vertices[tri.indices[2]].position,
            )
        })
        .count();

    crossings % 2 == 1
}

/// Möller-Trumbore, counting forward hits only
fn ray_intersects_triangle(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> bool {
    const EPSILON: f64 = 1e-12;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < EPSILON {
        return false;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    f * edge2.dot(&q) > EPSILON
}
