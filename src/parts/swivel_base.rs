// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Studded base with a swivel tower for a camera adapter

use super::{bore_along, m3_parameter, PartGenerator, PartOutput};
use crate::compose::Assembly;
use crate::connectors::{stud_parameters, AxleProfile, ConnectorLibrary, StudBore};
use crate::error::PartResult;
use crate::geometry::{Axis, GeometryBackend};
use crate::params::{ParameterDefinition, Parameters};
use crate::variant::{BaseType, Choice};
use nalgebra::{Point3, Vector3};
use tracing::debug;

const SWIVEL_THICKNESS: f64 = 4.0;
const SWIVEL_LENGTH: f64 = 11.0;
const TILT_ANGLE: f64 = 30.0;
const TILT_SHIFT: f64 = 3.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct CameraSwivelBase;

impl CameraSwivelBase {
    /// Tower with a rounded top and a pivot bore through it, standing on z = 0
    fn swivel<B: GeometryBackend>(&self, backend: &B, params: &Parameters) -> PartResult<B::Solid> {
        let height = params.float("swivelHeight")?;
        let m3_hole = params.float("m3_hole")?;

        let mut tower = Assembly::new();
        tower
            .add_solid(backend.cuboid(
                Vector3::new(SWIVEL_THICKNESS, SWIVEL_LENGTH, height),
                Point3::new(0.0, 0.0, height / 2.0),
            )?)
            .add_solid(bore_along(
                backend,
                Axis::X,
                SWIVEL_LENGTH / 2.0,
                SWIVEL_THICKNESS,
                Point3::new(0.0, 0.0, height),
            )?);
        if m3_hole > 0.0 {
            tower.add_hole(bore_along(
                backend,
                Axis::X,
                m3_hole / 2.0,
                SWIVEL_THICKNESS,
                Point3::new(0.0, 0.0, height),
            )?);
        }
        let mut swivel = tower.merge(backend)?;

        if params.flag("tilt")? {
            swivel = backend.rotate(&swivel, Axis::X, TILT_ANGLE.to_radians());
            // Keep what stands above the floor
            let bounds = backend.bounding_box(&swivel);
            let center = bounds.center();
            let top = bounds.max.z + 1.0;
            let above_floor = backend.cuboid(
                Vector3::new(bounds.size().x + 2.0, bounds.size().y + 2.0, top),
                Point3::new(center.x, center.y, top / 2.0),
            )?;
            swivel = backend.intersect(&swivel, &above_floor)?;
            swivel = backend.translate(&swivel, Vector3::new(0.0, TILT_SHIFT, 0.0));
        }

        Ok(swivel)
    }
}

impl<B: GeometryBackend> PartGenerator<B> for CameraSwivelBase {
    fn name(&self) -> &'static str {
        "camera_swivel_base"
    }

    fn description(&self) -> &'static str {
        "Studded base with a swivel tower for a camera adapter"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        let mut definitions = vec![
            BaseType::definition("type", "Base type", BaseType::A2),
            ParameterDefinition::checkbox("tilt", "Tilt Swivel Mount", false),
            ParameterDefinition::float("swivelHeight", "Swivel Mount Height", 26.0)
                .with_step(0.1)
                .with_min(SWIVEL_LENGTH / 2.0),
            m3_parameter(
                "m3_hole",
                "Pass through hole for M3 screw (not secured)",
                3.4,
            )
            .with_max(SWIVEL_LENGTH - 1.0),
        ];
        definitions.extend(stud_parameters());
        definitions
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let base_type: BaseType = params.choice_as("type")?;
        let layout = base_type.layout();
        let library = ConnectorLibrary::new(
            backend,
            StudBore::from_params(params)?,
            AxleProfile::default(),
        );

        let mut assembly = Assembly::new();
        assembly.add_solid(backend.cuboid(layout.footprint.size, layout.footprint.center)?);

        let swivel = self.swivel(backend, params)?;
        assembly.add_solid(backend.translate(
            &swivel,
            Vector3::new(0.0, layout.swivel_offset, 0.0),
        ));

        for anchor in layout.stud_positions() {
            assembly.add_hole(library.stud_bore(anchor)?);
        }
        debug!(
            base = base_type.label(),
            studs = assembly.hole_count(),
            "laid out swivel base"
        );

        Ok(PartOutput::Single(assembly.merge(backend)?))
    }
}
