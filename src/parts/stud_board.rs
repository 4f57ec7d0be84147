// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Flat perforated board

use super::{m3_parameter, PartGenerator, PartOutput, MAX_STUDS};
use crate::compose::Assembly;
use crate::connectors::{
    stud_parameters, AxleProfile, ConnectorLibrary, StudBore, PANEL_THICKNESS, STUD_PITCH,
};
use crate::error::{ConfigError, PartResult};
use crate::geometry::GeometryBackend;
use crate::params::{ParameterDefinition, Parameters};
use crate::variant::Choice;
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleType {
    Lego,
    M3,
}

impl Choice for HoleType {
    const ALL: &'static [Self] = &[HoleType::Lego, HoleType::M3];

    fn label(self) -> &'static str {
        match self {
            HoleType::Lego => "Lego",
            HoleType::M3 => "M3",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StudBoard;

impl StudBoard {
    /// Hole centres for a board of `width` x `length` studs, every `steps` cells
    pub fn hole_positions(width: i64, length: i64, steps: i64) -> Vec<Point3<f64>> {
        let step = steps.max(1) as usize;
        let mut positions = Vec::new();
        for x in (0..width.max(0)).step_by(step) {
            for y in (0..length.max(0)).step_by(step) {
                positions.push(Point3::new(
                    x as f64 * STUD_PITCH + STUD_PITCH / 2.0,
                    y as f64 * STUD_PITCH + STUD_PITCH / 2.0,
                    0.0,
                ));
            }
        }
        positions
    }
}

impl<B: GeometryBackend> PartGenerator<B> for StudBoard {
    fn name(&self) -> &'static str {
        "stud_board"
    }

    fn description(&self) -> &'static str {
        "Flat board with stud or M3 holes on a regular pitch"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        let mut definitions = vec![
            HoleType::definition("type", "Hole Type", HoleType::Lego),
            ParameterDefinition::int("width", "Width in Lego units (8mm)", 17)
                .with_min(1.0)
                .with_max(MAX_STUDS),
            ParameterDefinition::int("length", "Length in Lego units (8mm)", 25)
                .with_min(1.0)
                .with_max(MAX_STUDS),
            ParameterDefinition::int("steps", "Steps between holes", 2)
                .with_min(1.0)
                .with_max(MAX_STUDS),
            m3_parameter("m3", "Diameter of M3 holes", 2.8).with_max(STUD_PITCH),
        ];
        definitions.extend(stud_parameters());
        definitions
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let hole_type: HoleType = params.choice_as("type")?;
        let width = params.int("width")?;
        let length = params.int("length")?;
        let steps = params.int("steps")?;
        let m3 = params.float("m3")?;
        if hole_type == HoleType::M3 && m3 <= 0.0 {
            return Err(ConfigError::InvalidDimensions(
                "M3 holes need a positive diameter".into(),
            )
            .into());
        }

        let library = ConnectorLibrary::new(
            backend,
            StudBore::from_params(params)?,
            AxleProfile::default(),
        );
        let (board_x, board_y) = (width as f64 * STUD_PITCH, length as f64 * STUD_PITCH);

        let mut assembly = Assembly::new();
        assembly.add_solid(backend.cuboid(
            Vector3::new(board_x, board_y, PANEL_THICKNESS),
            Point3::new(board_x / 2.0, board_y / 2.0, 0.0),
        )?);

        for anchor in Self::hole_positions(width, length, steps) {
            let hole = match hole_type {
                HoleType::Lego => library.stud_bore(anchor)?,
                HoleType::M3 => backend.cylinder(m3 / 2.0, PANEL_THICKNESS, anchor)?,
            };
            assembly.add_hole(hole);
        }

        Ok(PartOutput::Single(assembly.merge(backend)?))
    }
}
