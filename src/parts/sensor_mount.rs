// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Two-screw sensor board mount (HW-127 footprint) on a studded base

use super::{m3_parameter, PartGenerator, PartOutput};
use crate::compose::Assembly;
use crate::connectors::{stud_parameters, AxleProfile, ConnectorLibrary, StudBore, STUD_PITCH};
use crate::error::PartResult;
use crate::geometry::GeometryBackend;
use crate::params::{ParameterDefinition, Parameters};
use crate::variant::{Footprint, StudGrid};
use nalgebra::{Point3, Vector3};

/// Distance between the board's mounting holes
const MOUNTING_LENGTH: f64 = 8.5;
const POST_SIZE: [f64; 3] = [6.0, 8.0, 3.0];
const BASE_HEIGHT: f64 = 8.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SensorMount;

impl SensorMount {
    /// Base block; `bigger` widens it by one stud
    pub fn footprint(bigger: bool) -> Footprint {
        let width = if bigger { 24.0 } else { 16.0 };
        Footprint::new(
            Vector3::new(width, 16.0, BASE_HEIGHT),
            Point3::new(0.0, 12.0, -BASE_HEIGHT / 2.0),
        )
    }

    /// Stud lattice recomputed from the footprint
    pub fn stud_grid(bigger: bool) -> StudGrid {
        let footprint = Self::footprint(bigger);
        StudGrid::fitted(&footprint, STUD_PITCH / 2.0, footprint.center.z)
    }
}

impl<B: GeometryBackend> PartGenerator<B> for SensorMount {
    fn name(&self) -> &'static str {
        "sensor_mount"
    }

    fn description(&self) -> &'static str {
        "Mount for a two-hole sensor board on a studded base"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        let mut definitions = vec![
            m3_parameter("m3", "Diameter of M3 holes", 2.8).with_max(POST_SIZE[0]),
            ParameterDefinition::checkbox("bigger", "Bigger base", false),
        ];
        definitions.extend(stud_parameters());
        definitions
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let m3 = params.float("m3")?;
        let bigger = params.flag("bigger")?;
        let library = ConnectorLibrary::new(
            backend,
            StudBore::from_params(params)?,
            AxleProfile::default(),
        );

        let mut assembly = Assembly::new();
        for x in [MOUNTING_LENGTH / 2.0, -MOUNTING_LENGTH / 2.0] {
            assembly.add_solid(backend.cuboid(
                Vector3::from(POST_SIZE),
                Point3::new(x, 0.0, POST_SIZE[2] / 2.0),
            )?);
        }
        assembly.add_solid(backend.cuboid(
            Vector3::new(MOUNTING_LENGTH + POST_SIZE[0], POST_SIZE[1], BASE_HEIGHT),
            Point3::new(0.0, 0.0, -BASE_HEIGHT / 2.0),
        )?);

        if m3 > 0.0 {
            for x in [MOUNTING_LENGTH / 2.0, -MOUNTING_LENGTH / 2.0] {
                assembly.add_hole(backend.cylinder(m3 / 2.0, 11.0, Point3::new(x, -1.0, -2.5))?);
            }
        }

        let footprint = Self::footprint(bigger);
        assembly.add_solid(backend.cuboid(footprint.size, footprint.center)?);
        for anchor in Self::stud_grid(bigger).positions(&[]) {
            assembly.add_hole(library.stud_bore(anchor)?);
        }

        Ok(PartOutput::Single(assembly.merge(backend)?))
    }
}
