// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Geometric primitives generator
//!
//! Placement follows the JSCAD conventions the part catalog was designed
//! against: cuboids and cylinders are centred on their `center` point, and
//! extrusions rise from `z = 0`.

use super::{Mesh, Triangle};
use crate::error::{GeometryError, GeometryResult};
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::PI;

pub const DEFAULT_SEGMENTS: u32 = 32;

/// Geometric primitives
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cuboid {
        size: Vector3<f64>,
        center: Point3<f64>,
    },
    Cylinder {
        radius: f64,
        height: f64,
        center: Point3<f64>,
        segments: u32,
    },
    Extrusion {
        points: Vec<Point2<f64>>,
        height: f64,
    },
}

impl Primitive {
    pub fn cuboid(size: Vector3<f64>, center: Point3<f64>) -> Self {
        Self::Cuboid { size, center }
    }

    pub fn cylinder(radius: f64, height: f64, center: Point3<f64>, segments: u32) -> Self {
        let segments = if segments > 0 {
            segments
        } else {
            DEFAULT_SEGMENTS
        };
        Self::Cylinder {
            radius,
            height,
            center,
            segments,
        }
    }

    pub fn extrusion(points: Vec<Point2<f64>>, height: f64) -> Self {
        Self::Extrusion { points, height }
    }

    pub fn to_mesh(&self) -> GeometryResult<Mesh> {
        match self {
            Self::Cuboid { size, center } => {
                for (label, value) in [("width", size.x), ("depth", size.y), ("height", size.z)] {
                    positive(label, value)?;
                }
                finite_point(center)?;
                Ok(generate_cuboid_mesh(*size, *center))
            }
            Self::Cylinder {
                radius,
                height,
                center,
                segments,
            } => {
                positive("radius", *radius)?;
                positive("height", *height)?;
                finite_point(center)?;
                if *segments < 3 {
                    return Err(GeometryError::InvalidPrimitive(format!(
                        "cylinder needs at least 3 segments, got {}",
                        segments
                    )));
                }
                Ok(generate_cylinder_mesh(*radius, *height, *center, *segments))
            }
            Self::Extrusion { points, height } => {
                positive("height", *height)?;
                generate_extrusion_mesh(points, *height)
            }
        }
    }
}

fn positive(label: &str, value: f64) -> GeometryResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidPrimitive(format!(
            "{} must be positive and finite, got {}",
            label, value
        )))
    }
}

fn finite_point(point: &Point3<f64>) -> GeometryResult<()> {
    if point.coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::InvalidPrimitive(format!(
            "placement {:?} is not finite",
            point
        )))
    }
}

fn generate_cuboid_mesh(size: Vector3<f64>, center: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);

    let half = size / 2.0;
    let (x0, x1) = (center.x - half.x, center.x + half.x);
    let (y0, y1) = (center.y - half.y, center.y + half.y);
    let (z0, z1) = (center.z - half.z, center.z + half.z);

    let positions = [
        Point3::new(x0, y0, z0),
        Point3::new(x1, y0, z0),
        Point3::new(x1, y1, z0),
        Point3::new(x0, y1, z0),
        Point3::new(x0, y0, z1),
        Point3::new(x1, y0, z1),
        Point3::new(x1, y1, z1),
        Point3::new(x0, y1, z1),
    ];
    for position in positions {
        mesh.add_point(position);
    }

    // Counter-clockwise seen from outside
    let faces = [
        [4, 5, 6],
        [4, 6, 7], // z+
        [0, 3, 2],
        [0, 2, 1], // z-
        [1, 2, 6],
        [1, 6, 5], // x+
        [0, 4, 7],
        [0, 7, 3], // x-
        [3, 7, 6],
        [3, 6, 2], // y+
        [0, 1, 5],
        [0, 5, 4], // y-
    ];
    for indices in faces {
        mesh.add_triangle(Triangle::new(indices));
    }

    mesh.recompute_normals();
    mesh
}

fn generate_cylinder_mesh(radius: f64, height: f64, center: Point3<f64>, segments: u32) -> Mesh {
    let segments = segments as usize;
    let mut mesh = Mesh::with_capacity(2 + segments * 2, segments * 4);

    let z0 = center.z - height / 2.0;
    let z1 = center.z + height / 2.0;

    let bottom_center = mesh.add_point(Point3::new(center.x, center.y, z0));
    let top_center = mesh.add_point(Point3::new(center.x, center.y, z1));

    let mut bottom = Vec::with_capacity(segments);
    let mut top = Vec::with_capacity(segments);
    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let x = center.x + radius * angle.cos();
        let y = center.y + radius * angle.sin();
        bottom.push(mesh.add_point(Point3::new(x, y, z0)));
        top.push(mesh.add_point(Point3::new(x, y, z1)));
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        let (bi, bn, ti, tn) = (bottom[i], bottom[next], top[i], top[next]);

        mesh.add_triangle(Triangle::new([bottom_center, bn, bi]));
        mesh.add_triangle(Triangle::new([top_center, ti, tn]));
        mesh.add_triangle(Triangle::new([bi, bn, ti]));
        mesh.add_triangle(Triangle::new([bn, tn, ti]));
    }

    mesh.recompute_normals();
    mesh
}

fn generate_extrusion_mesh(points: &[Point2<f64>], height: f64) -> GeometryResult<Mesh> {
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::InvalidPrimitive(
            "extrusion profile has non-finite points".into(),
        ));
    }

    let mut outline = simplify_outline(points);
    if outline.len() < 3 {
        return Err(GeometryError::InvalidPrimitive(format!(
            "extrusion profile needs at least 3 distinct corners, got {}",
            outline.len()
        )));
    }
    if signed_area(&outline) < 0.0 {
        outline.reverse();
    }

    let caps = triangulate(&outline).ok_or_else(|| {
        GeometryError::InvalidPrimitive("extrusion profile is self-intersecting".into())
    })?;

    let n = outline.len();
    let mut mesh = Mesh::with_capacity(n * 2, caps.len() * 2 + n * 2);
    for p in &outline {
        mesh.add_point(Point3::new(p.x, p.y, 0.0));
    }
    for p in &outline {
        mesh.add_point(Point3::new(p.x, p.y, height));
    }

    for [a, b, c] in &caps {
        mesh.add_triangle(Triangle::new([*a, *c, *b]));
        mesh.add_triangle(Triangle::new([a + n, b + n, c + n]));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        mesh.add_triangle(Triangle::new([i, j, j + n]));
        mesh.add_triangle(Triangle::new([i, j + n, i + n]));
    }

    mesh.recompute_normals();
    Ok(mesh)
}

const OUTLINE_EPSILON: f64 = 1e-9;

fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        / 2.0
}

/// Drop repeated and collinear corners; they would stall ear clipping
fn simplify_outline(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut outline: Vec<Point2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if outline
            .last()
            .map_or(true, |last| (p - last).norm() > OUTLINE_EPSILON)
        {
            outline.push(*p);
        }
    }
    while outline.len() > 1 && (outline[0] - outline[outline.len() - 1]).norm() <= OUTLINE_EPSILON {
        outline.pop();
    }

    let mut changed = true;
    while changed && outline.len() >= 3 {
        changed = false;
        let n = outline.len();
        for i in 0..n {
            let prev = outline[(i + n - 1) % n];
            let next = outline[(i + 1) % n];
            if cross(&prev, &outline[i], &next).abs() <= OUTLINE_EPSILON {
                outline.remove(i);
                changed = true;
                break;
            }
        }
    }
    outline
}

fn point_in_triangle(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear clipping for a counter-clockwise simple polygon
fn triangulate(outline: &[Point2<f64>]) -> Option<Vec<[usize; 3]>> {
    let mut remaining: Vec<usize> = (0..outline.len()).collect();
    let mut triangles = Vec::with_capacity(outline.len().saturating_sub(2));

    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let prev = remaining[(i + m - 1) % m];
            let cur = remaining[i];
            let next = remaining[(i + 1) % m];
            let (a, b, c) = (&outline[prev], &outline[cur], &outline[next]);

            cross(a, b, c) > OUTLINE_EPSILON
                && remaining
                    .iter()
                    .filter(|&&k| k != prev && k != cur && k != next)
                    .all(|&k| !point_in_triangle(&outline[k], a, b, c))
        })?;

        triangles.push([
            remaining[(ear + m - 1) % m],
            remaining[ear],
            remaining[(ear + 1) % m],
        ]);
        remaining.remove(ear);
    }

    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }
    Some(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytics::analyze;
    use crate::geometry::mesh_utils::{is_closed, is_manifold};
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_is_closed_and_centred() {
        let mesh = Primitive::cuboid(Vector3::new(8.0, 8.0, 8.0), Point3::origin())
            .to_mesh()
            .unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(is_manifold(&mesh));
        assert!(is_closed(&mesh));

        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Point3::new(-4.0, -4.0, -4.0));
        assert_eq!(bbox.max, Point3::new(4.0, 4.0, 4.0));
        assert_relative_eq!(analyze(&mesh).volume, 512.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cylinder_is_manifold() {
        let mesh = Primitive::cylinder(5.0, 10.0, Point3::new(0.0, 0.0, 5.0), 32)
            .to_mesh()
            .unwrap();
        assert!(is_manifold(&mesh), "Cylinder mesh should be manifold");
        assert!(is_closed(&mesh), "Cylinder mesh should be closed");
        assert_eq!(mesh.vertex_count(), 2 + 32 * 2);

        let bbox = mesh.bounding_box();
        assert_relative_eq!(bbox.min.z, 0.0);
        assert_relative_eq!(bbox.max.z, 10.0);
        assert_relative_eq!(bbox.max.x, 5.0);

        // Positive volume means the faces point outward
        let stats = analyze(&mesh);
        let polygon_area = 0.5 * 32.0 * 25.0 * (2.0 * PI / 32.0).sin();
        assert_relative_eq!(stats.signed_volume, polygon_area * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extrusion_of_concave_outline() {
        // L-shape, clockwise on purpose
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 0.0),
        ];
        let mesh = Primitive::extrusion(points, 3.0).to_mesh().unwrap();
        assert!(is_closed(&mesh));
        assert_relative_eq!(analyze(&mesh).signed_volume, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extrusion_drops_collinear_corners() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let mesh = Primitive::extrusion(points, 1.0).to_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_relative_eq!(analyze(&mesh).signed_volume, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_dimensions_are_rejected() {
        let err = Primitive::cuboid(Vector3::new(0.0, 1.0, 1.0), Point3::origin())
            .to_mesh()
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidPrimitive(_)));

        let degenerate = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        assert!(Primitive::extrusion(degenerate, 1.0).to_mesh().is_err());
        assert!(Primitive::cylinder(f64::NAN, 1.0, Point3::origin(), 16)
            .to_mesh()
            .is_err());
    }
}
