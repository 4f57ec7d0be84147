// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Side bracket for a JGY370 worm gear motor
//!
//! The motor face bolts to an upright flange standing on a studded base; a
//! triangular gusset braces the flange. `side` picks which edge of the base
//! the flange sits on.

use super::{bore_along, m3_parameter, PartGenerator, PartOutput, MAX_STUDS};
use crate::compose::Assembly;
use crate::connectors::{
    stud_parameters, AxleProfile, ConnectorLibrary, StudBore, PANEL_THICKNESS, STUD_PITCH,
};
use crate::error::PartResult;
use crate::geometry::{Axis, GeometryBackend};
use crate::params::{ParameterDefinition, Parameters};
use crate::variant::{Choice, StudGrid};
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

const MOTOR_HOLES_X: f64 = 33.0;
const MOTOR_HOLES_Z: f64 = 18.0;
const MOTOR_HOLES_X_OFFSET: f64 = 6.5;
const MOTOR_HOLES_Z_OFFSET: f64 = 7.0;
const MOTOR_SHAFT_X: f64 = 15.0;
const MOTOR_SHAFT_Z: f64 = 16.0;
const MOTOR_CENTER_HOLE_DIAMETER: f64 = 7.0;
const THICKNESS: f64 = 3.0;
const INNER_WIDTH: f64 = 46.0;
const INNER_HEIGHT: f64 = 32.0;
const CLEARANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn polarity(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

impl Choice for Side {
    const ALL: &'static [Self] = &[Side::Left, Side::Right];

    fn label(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MotorBracket;

impl<B: GeometryBackend> PartGenerator<B> for MotorBracket {
    fn name(&self) -> &'static str {
        "motor_bracket"
    }

    fn description(&self) -> &'static str {
        "Flange bracket for a JGY370 gear motor on a studded base"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        let mut definitions = vec![
            Side::definition("side", "Side", Side::Left),
            ParameterDefinition::int("width", "Base Width in Lego units (8mm)", 5)
                .with_step(1.0)
                .with_min(3.0)
                .with_max(MAX_STUDS),
            ParameterDefinition::int("length", "Base Length in Lego units (8mm)", 3)
                .with_step(1.0)
                .with_min(3.0)
                .with_max(MAX_STUDS),
            m3_parameter(
                "m3_hole",
                "Pass through hole for M3 screw (not secured)",
                3.4,
            )
            .with_max(MOTOR_CENTER_HOLE_DIAMETER),
        ];
        definitions.extend(stud_parameters());
        definitions
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let side: Side = params.choice_as("side")?;
        let width = params.int("width")?;
        let length = params.int("length")?;
        let m3 = params.float("m3_hole")?;
        let library = ConnectorLibrary::new(
            backend,
            StudBore::from_params(params)?,
            AxleProfile::default(),
        );

        let frame_width = INNER_WIDTH + THICKNESS + CLEARANCE;
        let base_width = width as f64 * STUD_PITCH + THICKNESS;
        let base_length = length as f64 * STUD_PITCH;
        // Align the base's outer edge with the flange's
        let base_offset = base_width / 2.0 - frame_width / 2.0;

        let mut assembly = Assembly::new();
        assembly.add_solid(backend.cuboid(
            Vector3::new(base_width, base_length, PANEL_THICKNESS),
            Point3::new(base_offset, 0.0, 0.0),
        )?);

        // Motor flange
        let reference_x = -frame_width / 2.0 + THICKNESS + CLEARANCE;
        let reference_y = side.polarity() * (THICKNESS / 2.0 + base_length / 2.0);
        let reference_z = PANEL_THICKNESS / 2.0 + CLEARANCE;
        let flange_height = PANEL_THICKNESS + INNER_HEIGHT + CLEARANCE;
        assembly.add_solid(backend.cuboid(
            Vector3::new(frame_width, THICKNESS, flange_height),
            Point3::new(
                0.0,
                reference_y,
                flange_height / 2.0 - PANEL_THICKNESS / 2.0,
            ),
        )?);

        assembly.add_hole(bore_along(
            backend,
            Axis::Y,
            MOTOR_CENTER_HOLE_DIAMETER / 2.0,
            THICKNESS,
            Point3::new(
                reference_x + CLEARANCE + MOTOR_SHAFT_X,
                reference_y,
                reference_z + MOTOR_SHAFT_Z,
            ),
        )?);

        if m3 > 0.0 {
            for (dx, dz) in [
                (0.0, 0.0),
                (0.0, MOTOR_HOLES_Z),
                (MOTOR_HOLES_X, 0.0),
                (MOTOR_HOLES_X, MOTOR_HOLES_Z),
            ] {
                assembly.add_hole(bore_along(
                    backend,
                    Axis::Y,
                    m3 / 2.0,
                    THICKNESS,
                    Point3::new(
                        reference_x + MOTOR_HOLES_X_OFFSET + dx,
                        reference_y,
                        reference_z + MOTOR_HOLES_Z_OFFSET + dz,
                    ),
                )?);
            }
        }

        // Gusset: right triangle in the YZ plane along the base's outer edge
        let profile = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, -base_length),
            Point2::new(INNER_HEIGHT + CLEARANCE, 0.0),
        ];
        let gusset = backend.extrude_polygon(&profile, THICKNESS)?;
        let gusset = backend.rotate(&gusset, Axis::Y, -FRAC_PI_2);
        let mut gusset = backend.translate(
            &gusset,
            Vector3::new(
                reference_x - CLEARANCE,
                base_length / 2.0,
                PANEL_THICKNESS / 2.0,
            ),
        );
        if side == Side::Right {
            gusset = backend.mirror(&gusset, Axis::Y);
        }
        assembly.add_solid(gusset);

        let grid = StudGrid::new(
            width as usize,
            length as usize,
            Point2::new(
                base_offset - base_width / 2.0 + THICKNESS + STUD_PITCH / 2.0,
                -base_length / 2.0 + STUD_PITCH / 2.0,
            ),
            0.0,
        );
        for anchor in grid.positions(&[]) {
            assembly.add_hole(library.stud_bore(anchor)?);
        }

        Ok(PartOutput::Single(assembly.merge(backend)?))
    }
}
