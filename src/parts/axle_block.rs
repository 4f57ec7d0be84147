// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Test cube for checking axle socket fit

use super::{PartGenerator, PartOutput};
use crate::compose::Assembly;
use crate::connectors::{axle_parameters, AxleProfile, ConnectorLibrary, StudBore, PANEL_THICKNESS};
use crate::error::PartResult;
use crate::geometry::GeometryBackend;
use crate::params::{ParameterDefinition, Parameters};
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, Default)]
pub struct AxleBlock;

impl<B: GeometryBackend> PartGenerator<B> for AxleBlock {
    fn name(&self) -> &'static str {
        "axle_block"
    }

    fn description(&self) -> &'static str {
        "8 mm cube with an axle socket through it"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        axle_parameters()
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let library = ConnectorLibrary::new(
            backend,
            StudBore::default(),
            AxleProfile::from_params(params)?,
        );

        let mut assembly = Assembly::new();
        assembly
            .add_solid(backend.cuboid(
                Vector3::new(PANEL_THICKNESS, PANEL_THICKNESS, PANEL_THICKNESS),
                Point3::origin(),
            )?)
            .add_hole(library.axle_socket(Point3::origin(), PANEL_THICKNESS)?);

        Ok(PartOutput::Single(assembly.merge(backend)?))
    }
}
