// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Coupling from a flatted motor shaft to a cross axle

use super::{bore_along, m3_parameter, PartGenerator, PartOutput};
use crate::compose::Assembly;
use crate::connectors::{axle_parameters, AxleProfile, ConnectorLibrary, DShaft, StudBore};
use crate::error::{ConfigError, PartResult};
use crate::geometry::{Axis, GeometryBackend};
use crate::params::{ParameterDefinition, Parameters};
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, Default)]
pub struct ShaftToAxle;

impl<B: GeometryBackend> PartGenerator<B> for ShaftToAxle {
    fn name(&self) -> &'static str {
        "shaft_to_axle"
    }

    fn description(&self) -> &'static str {
        "Round coupling with a D-shaft bore at the bottom and an axle socket on top"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        let mut definitions = vec![
            ParameterDefinition::float("diameter", "Outer diameter", 9.0)
                .with_step(0.1)
                .with_min(1.0),
            ParameterDefinition::float("shaft_diameter", "Shaft diameter", 5.0)
                .with_step(0.1)
                .with_min(0.1),
            ParameterDefinition::float(
                "d_depth",
                "Depth of flat surface on shaft (set to 0 if shaft does not have a flat)",
                0.5,
            )
            .with_step(0.1)
            .with_min(0.0),
            ParameterDefinition::float("shaft_depth", "Depth of shaft hole", 16.0)
                .with_step(0.5)
                .with_min(0.5),
            ParameterDefinition::float("lego_depth", "Depth of lego shaft", 16.0)
                .with_step(0.5)
                .with_min(0.5),
            m3_parameter("m3", "Hole for M3 screw (set to 0 if not needed)", 2.8),
        ];
        definitions.extend(axle_parameters());
        definitions
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let diameter = params.float("diameter")?;
        let shaft_depth = params.float("shaft_depth")?;
        let lego_depth = params.float("lego_depth")?;
        let m3 = params.float("m3")?;

        let shaft = DShaft::new(
            params.float("shaft_diameter")?,
            params.float("d_depth")?,
            shaft_depth,
        )?;
        let axle = AxleProfile::from_params(params)?;
        if shaft.diameter >= diameter || axle.length >= diameter {
            return Err(ConfigError::InvalidDimensions(format!(
                "outer diameter {} must exceed the shaft ({}) and axle ({}) sizes",
                diameter, shaft.diameter, axle.length
            ))
            .into());
        }

        let library = ConnectorLibrary::new(backend, StudBore::default(), axle);
        let height = shaft_depth + lego_depth;

        let mut assembly = Assembly::new();
        assembly.add_solid(backend.cylinder(
            diameter / 2.0,
            height,
            Point3::new(0.0, 0.0, height / 2.0),
        )?);

        assembly.add_hole(backend.translate(
            &library.d_shaft(&shaft)?,
            Vector3::new(0.0, 0.0, shaft_depth / 2.0),
        ));

        // Radial set screw from the shaft axis out through the flat side
        if m3 > 0.0 {
            assembly.add_hole(bore_along(
                backend,
                Axis::Y,
                m3 / 2.0,
                diameter / 2.0,
                Point3::new(0.0, diameter / 4.0, shaft_depth / 2.0),
            )?);
        }

        assembly.add_hole(library.axle_socket(
            Point3::new(0.0, 0.0, shaft_depth + lego_depth / 2.0),
            lego_depth,
        )?);

        Ok(PartOutput::Single(assembly.merge(backend)?))
    }
}
