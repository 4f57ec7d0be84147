// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Geometry backend abstraction
//!
//! Part generators never touch meshes directly. They receive a
//! [`GeometryBackend`] and build everything through it, so the same layout
//! code can drive a different solid representation.

use super::csg::{csg_difference, csg_intersection, csg_union, DEFAULT_EPSILON};
use super::mesh_utils::{contains_point, surface_touches};
use super::{Axis, BoundingBox, Mesh, Primitive, Transform, DEFAULT_SEGMENTS};
use crate::config::KernelConfig;
use crate::error::{GeometryError, GeometryResult};
use nalgebra::{Point2, Point3, Vector3};

/// Primitive, transform and boolean capabilities consumed by the generators
pub trait GeometryBackend: Send + Sync {
    /// Immutable solid value produced by this backend
    type Solid: Clone + Send + Sync + std::fmt::Debug;

    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Axis-aligned box centred on `center`
    fn cuboid(&self, size: Vector3<f64>, center: Point3<f64>) -> GeometryResult<Self::Solid>;

    /// Z-aligned cylinder centred on `center`
    fn cylinder(
        &self,
        radius: f64,
        height: f64,
        center: Point3<f64>,
    ) -> GeometryResult<Self::Solid>;

    /// Extrude a simple XY polygon from `z = 0` to `z = height`
    fn extrude_polygon(&self, points: &[Point2<f64>], height: f64)
        -> GeometryResult<Self::Solid>;

    fn transform(&self, solid: &Self::Solid, transform: &Transform) -> Self::Solid;

    fn union(&self, a: &Self::Solid, b: &Self::Solid) -> GeometryResult<Self::Solid>;

    fn subtract(&self, a: &Self::Solid, b: &Self::Solid) -> GeometryResult<Self::Solid>;

    /// Volume common to both solids; disjoint operands are degenerate
    fn intersect(&self, a: &Self::Solid, b: &Self::Solid) -> GeometryResult<Self::Solid>;

    fn bounding_box(&self, solid: &Self::Solid) -> BoundingBox;

    fn is_empty(&self, solid: &Self::Solid) -> bool;

    fn translate(&self, solid: &Self::Solid, offset: Vector3<f64>) -> Self::Solid {
        self.transform(solid, &Transform::translation(offset))
    }

    fn rotate(&self, solid: &Self::Solid, axis: Axis, angle: f64) -> Self::Solid {
        self.transform(solid, &Transform::rotation(axis, angle))
    }

    fn mirror(&self, solid: &Self::Solid, axis: Axis) -> Self::Solid {
        self.transform(solid, &Transform::mirror(axis))
    }
}

/// Triangle-mesh backend with BSP booleans
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBackend {
    segments: u32,
    epsilon: f64,
}

impl MeshBackend {
    pub fn new(segments: u32, epsilon: f64) -> Self {
        Self { segments, epsilon }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.segments, config.epsilon)
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn separated(&self, a: &Mesh, b: &Mesh) -> bool {
        !a.bounding_box().intersects(&b.bounding_box(), self.epsilon)
    }

    /// Where `b` sits relative to `a` when no surface of `a` crosses `b`'s box
    fn placement(&self, a: &Mesh, b: &Mesh) -> Placement {
        let region = b.bounding_box();
        if surface_touches(a, &region, self.epsilon) {
            Placement::Overlapping
        } else if contains_point(a, &region.center()) {
            Placement::Inside
        } else {
            Placement::Outside
        }
    }

    fn checked(&self, operation: &'static str, mesh: Mesh) -> GeometryResult<Mesh> {
        if mesh.is_empty() {
            return Err(GeometryError::degenerate(operation, "result is empty"));
        }
        if !mesh.is_finite() {
            return Err(GeometryError::degenerate(
                operation,
                "result has non-finite coordinates",
            ));
        }
        Ok(mesh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Inside,
    Outside,
    Overlapping,
}

fn concatenate(a: &Mesh, b: &Mesh) -> Mesh {
    let mut combined = a.clone();
    combined.merge(b);
    combined
}

impl Default for MeshBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENTS, DEFAULT_EPSILON)
    }
}

impl GeometryBackend for MeshBackend {
    type Solid = Mesh;

    fn name(&self) -> &str {
        "mesh-bsp"
    }

    fn cuboid(&self, size: Vector3<f64>, center: Point3<f64>) -> GeometryResult<Mesh> {
        Primitive::cuboid(size, center).to_mesh()
    }

    fn cylinder(&self, radius: f64, height: f64, center: Point3<f64>) -> GeometryResult<Mesh> {
        Primitive::cylinder(radius, height, center, self.segments).to_mesh()
    }

    fn extrude_polygon(&self, points: &[Point2<f64>], height: f64) -> GeometryResult<Mesh> {
        Primitive::extrusion(points.to_vec(), height).to_mesh()
    }

    fn transform(&self, solid: &Mesh, transform: &Transform) -> Mesh {
        solid.transformed(transform)
    }

    fn union(&self, a: &Mesh, b: &Mesh) -> GeometryResult<Mesh> {
        if a.is_empty() {
            return self.checked("union", b.clone());
        }
        if b.is_empty() {
            return self.checked("union", a.clone());
        }

        if self.separated(a, b) {
            return self.checked("union", concatenate(a, b));
        }

        match self.placement(a, b) {
            Placement::Inside => self.checked("union", a.clone()),
            Placement::Outside => self.checked("union", concatenate(a, b)),
            Placement::Overlapping => self.checked("union", csg_union(a, b, self.epsilon)),
        }
    }

    fn subtract(&self, a: &Mesh, b: &Mesh) -> GeometryResult<Mesh> {
        if a.is_empty() {
            return Err(GeometryError::degenerate("subtract", "left operand is empty"));
        }
        if b.is_empty()
            || self.separated(a, b)
            || self.placement(a, b) == Placement::Outside
        {
            return self.checked("subtract", a.clone());
        }

        let result = csg_difference(a, b, self.epsilon);
        if result.is_empty() {
            tracing::warn!(
                triangles = a.triangle_count(),
                "subtraction consumed the whole solid"
            );
        }
        self.checked("subtract", result)
    }

    fn intersect(&self, a: &Mesh, b: &Mesh) -> GeometryResult<Mesh> {
        if a.is_empty() || b.is_empty() || self.separated(a, b) {
            return Err(GeometryError::degenerate(
                "intersect",
                "operands do not overlap",
            ));
        }
        self.checked("intersect", csg_intersection(a, b, self.epsilon))
    }

    fn bounding_box(&self, solid: &Mesh) -> BoundingBox {
        solid.bounding_box()
    }

    fn is_empty(&self, solid: &Mesh) -> bool {
        solid.is_empty()
    }
}
