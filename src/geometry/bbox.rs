// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Bounding box utilities

use super::Vertex;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut bbox = Self::empty();
        for vertex in vertices {
            bbox.expand_to_include(&vertex.position);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut result = *self;
        if !other.is_empty() {
            result.expand_to_include(&other.min);
            result.expand_to_include(&other.max);
        }
        result
    }

    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) / 2.0)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn volume(&self) -> f64 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// True when the boxes overlap or come within `tolerance` of each other
    pub fn intersects(&self, other: &BoundingBox, tolerance: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
            && self.min.z <= other.max.z + tolerance
            && other.min.z <= self.max.z + tolerance
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.min - other.min).amax() <= tolerance && (self.max - other.max).amax() <= tolerance
    }
}
