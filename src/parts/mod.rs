// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Part generators
//!
//! Each part declares its parameters and lays out solids and holes through
//! an injected [`GeometryBackend`]. Nothing here holds state between calls.

mod axle_block;
mod camera_adapter;
mod motor_bracket;
mod sensor_mount;
mod shaft_adapter;
mod stud_board;
mod swivel_base;

pub use axle_block::AxleBlock;
pub use camera_adapter::CameraAdapter;
pub use motor_bracket::{MotorBracket, Side};
pub use sensor_mount::SensorMount;
pub use shaft_adapter::ShaftToAxle;
pub use stud_board::{HoleType, StudBoard};
pub use swivel_base::CameraSwivelBase;

use crate::error::PartResult;
use crate::geometry::{Axis, GeometryBackend};
use crate::params::{ParameterDefinition, ParameterMap, Parameters};
use nalgebra::Point3;
use std::f64::consts::FRAC_PI_2;
use tracing::info;

/// Geometry returned by a generator
#[derive(Debug, Clone, PartialEq)]
pub enum PartOutput<S> {
    Single(S),
    /// Disjoint bodies, already spread out so they do not overlap
    Pieces(Vec<S>),
}

impl<S> PartOutput<S> {
    pub fn into_pieces(self) -> Vec<S> {
        match self {
            PartOutput::Single(solid) => vec![solid],
            PartOutput::Pieces(pieces) => pieces,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PartOutput::Single(_) => 1,
            PartOutput::Pieces(pieces) => pieces.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait PartGenerator<B: GeometryBackend>: Send + Sync {
    /// Catalog name
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Static declaration of the tunable inputs
    fn parameter_definitions(&self) -> Vec<ParameterDefinition>;

    /// Build the geometry from an already resolved parameter set
    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>>;

    /// Resolve `overrides` against the declarations, then generate
    fn render(&self, backend: &B, overrides: &ParameterMap) -> PartResult<PartOutput<B::Solid>> {
        let params = Parameters::resolve(&self.parameter_definitions(), overrides)?;
        info!(part = self.name(), backend = backend.name(), "generating part");
        self.generate(backend, &params)
    }
}

/// Every part, in listing order
pub fn catalog<B: GeometryBackend>() -> Vec<Box<dyn PartGenerator<B>>> {
    vec![
        Box::new(CameraSwivelBase),
        Box::new(ShaftToAxle),
        Box::new(SensorMount),
        Box::new(StudBoard),
        Box::new(AxleBlock),
        Box::new(MotorBracket),
        Box::new(CameraAdapter),
    ]
}

pub fn find<B: GeometryBackend>(name: &str) -> Option<Box<dyn PartGenerator<B>>> {
    catalog::<B>().into_iter().find(|part| part.name() == name)
}

/// Cylinder of `length` whose axis runs along `axis`, centred on `center`
pub(crate) fn bore_along<B: GeometryBackend>(
    backend: &B,
    axis: Axis,
    radius: f64,
    length: f64,
    center: Point3<f64>,
) -> PartResult<B::Solid> {
    let upright = backend.cylinder(radius, length, Point3::origin())?;
    let oriented = match axis {
        Axis::X => backend.rotate(&upright, Axis::Y, FRAC_PI_2),
        Axis::Y => backend.rotate(&upright, Axis::X, FRAC_PI_2),
        Axis::Z => upright,
    };
    Ok(backend.translate(&oriented, center.coords))
}

/// Largest board edge, in studs, that still fits a 256 mm print bed
pub(crate) const MAX_STUDS: f64 = 32.0;

pub(crate) fn m3_parameter(name: &str, caption: &str, initial: f64) -> ParameterDefinition {
    ParameterDefinition::float(name, caption, initial)
        .with_step(0.1)
        .with_min(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshBackend;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let parts = catalog::<MeshBackend>();
        let names: HashSet<_> = parts.iter().map(|p| p.name()).collect();
        assert_eq!(names.len(), parts.len());
        assert!(find::<MeshBackend>("stud_board").is_some());
        assert!(find::<MeshBackend>("teapot").is_none());
    }

    #[test]
    fn test_every_part_declares_valid_defaults() {
        for part in catalog::<MeshBackend>() {
            let definitions = part.parameter_definitions();
            assert!(
                Parameters::defaults(&definitions).is_ok(),
                "{} has invalid defaults",
                part.name()
            );
        }
    }

    #[test]
    fn test_bore_along_axes() {
        let backend = MeshBackend::default();
        let along_y = bore_along(&backend, Axis::Y, 1.0, 6.0, Point3::new(0.0, 2.0, 0.0)).unwrap();
        let bbox = backend.bounding_box(&along_y);
        assert_relative_eq!(bbox.min.y, -1.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.y, 5.0, epsilon = 1e-9);

        let along_x = bore_along(&backend, Axis::X, 1.0, 6.0, Point3::origin()).unwrap();
        assert_relative_eq!(backend.bounding_box(&along_x).size().x, 6.0, epsilon = 1e-9);
    }
}
