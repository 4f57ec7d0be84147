// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Rigid placement transforms
//!
//! A [`Transform`] is a homogeneous matrix. Composition is sequential:
//! `a.then(b)` applies `a` first, which is not the same as `b.then(a)` once
//! rotations are involved.

use nalgebra::{Matrix4, Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// Principal axis for rotations and mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn translation(offset: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Right-handed rotation of `angle` radians about `axis` through the origin
    pub fn rotation(axis: Axis, angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(&axis.unit(), angle),
        }
    }

    /// Reflection across the plane orthogonal to `axis` through the origin
    pub fn mirror(axis: Axis) -> Self {
        let mut scale = Vector3::new(1.0, 1.0, 1.0);
        match axis {
            Axis::X => scale.x = -1.0,
            Axis::Y => scale.y = -1.0,
            Axis::Z => scale.z = -1.0,
        }
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Apply `self`, then `next`
    pub fn then(self, next: Transform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// True when the transform reverses orientation
    pub fn is_mirroring(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_order_matters() {
        let p = Point3::new(1.0, 0.0, 0.0);
        let rotate = Transform::rotation(Axis::Z, FRAC_PI_2);
        let shift = Transform::translation(Vector3::new(10.0, 0.0, 0.0));

        let rotate_then_shift = rotate.then(shift).apply_point(&p);
        let shift_then_rotate = shift.then(rotate).apply_point(&p);

        assert_relative_eq!(rotate_then_shift, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(shift_then_rotate, Point3::new(0.0, 11.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_x_is_right_handed() {
        let p = Transform::rotation(Axis::X, FRAC_PI_2).apply_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_mirror_detection() {
        assert!(Transform::mirror(Axis::Y).is_mirroring());
        assert!(!Transform::rotation(Axis::Y, 1.0).is_mirroring());
        assert!(!Transform::mirror(Axis::Y)
            .then(Transform::mirror(Axis::X))
            .is_mirroring());
    }
}
