// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Two-plate clamp for an ESP32-S3 camera board
//!
//! The front plate carries the lens window and flash clearance, the back
//! plate carries the swivel tower that pairs with `camera_swivel_base`.
//! Both are screwed together through ears at either end of the board.

use super::{bore_along, m3_parameter, PartGenerator, PartOutput};
use crate::compose::Assembly;
use crate::error::{ConfigError, PartResult};
use crate::geometry::{Axis, GeometryBackend};
use crate::params::{ParameterDefinition, Parameters};
use nalgebra::{Point2, Point3, Vector3};

const BOARD_LENGTH: f64 = 57.5;
const FRONT_THICKNESS: f64 = 2.0;
const BACK_THICKNESS: f64 = 2.0;
const SCREW_OFFSET: f64 = 3.5;
const SCREW_BASE_WIDTH: f64 = 7.0;
const SCREW_BASE_THICKNESS: f64 = 7.0;
const SWIVEL_THICKNESS: f64 = 4.0;
const SWIVEL_LENGTH: f64 = 11.0;
const LED_HOLE_OFFSET: [f64; 2] = [-10.0, -16.0];
/// Plate margin around the camera window, and gap between laid-out pieces
const MARGIN: f64 = 4.0;
const PIECE_GAP: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct CameraAdapter;

impl CameraAdapter {
    /// Adds the screw ears at both ends of a plate of `width`
    ///
    /// The top ear is centred on the plate; the bottom one sits flush with
    /// the plate's +x edge, leaving room for the board's connector.
    fn add_screw_ears<B: GeometryBackend>(
        backend: &B,
        assembly: &mut Assembly<B::Solid>,
        width: f64,
        thickness: f64,
        hole_diameter: f64,
    ) -> PartResult<()> {
        let x_outer = width / 2.0;
        let y_base = BOARD_LENGTH / 2.0;
        let y_screw = y_base + SCREW_OFFSET;
        let z = thickness / 2.0;

        let top_inner = SCREW_BASE_WIDTH / 2.0;
        let top = [
            Point2::new(x_outer, y_base),
            Point2::new(top_inner, y_screw),
            Point2::new(-top_inner, y_screw),
            Point2::new(-x_outer, y_base),
        ];

        let bottom_inner = width / 2.0 - SCREW_BASE_WIDTH + 1.0;
        let bottom = [
            Point2::new(x_outer, -y_base),
            Point2::new(bottom_inner, -y_base),
            Point2::new(bottom_inner, -y_screw),
            Point2::new(x_outer + 1.0, -y_screw),
        ];

        let screws = [
            Point3::new(0.0, y_screw, z),
            Point3::new(width / 2.0 - SCREW_BASE_WIDTH / 2.0 + 1.0, -y_screw, z),
        ];

        for (outline, screw) in [(&top[..], screws[0]), (&bottom[..], screws[1])] {
            assembly
                .add_solid(backend.extrude_polygon(outline, thickness)?)
                .add_solid(backend.cylinder(SCREW_BASE_WIDTH / 2.0, thickness, screw)?);
            if hole_diameter > 0.0 {
                assembly.add_hole(backend.cylinder(hole_diameter / 2.0, thickness, screw)?);
            }
        }
        Ok(())
    }

    fn front<B: GeometryBackend>(backend: &B, params: &Parameters) -> PartResult<B::Solid> {
        let cam_width = params.float("camWidth")?;
        let cam_height = params.float("camHeight")?;
        let cam_y_offset = params.float("camYOffset")?;
        let led_radius = params.float("ledHoleRadius")?;
        let width = cam_width + MARGIN;

        let mut assembly = Assembly::new();
        assembly
            .add_solid(backend.cuboid(
                Vector3::new(width, BOARD_LENGTH, FRONT_THICKNESS),
                Point3::new(0.0, 0.0, FRONT_THICKNESS / 2.0),
            )?)
            .add_hole(backend.cuboid(
                Vector3::new(cam_width, cam_height, FRONT_THICKNESS),
                Point3::new(0.0, cam_y_offset, FRONT_THICKNESS / 2.0),
            )?);

        Self::add_screw_ears(
            backend,
            &mut assembly,
            width,
            SCREW_BASE_THICKNESS,
            params.float("m3")?,
        )?;

        // Flash LED clearance
        if led_radius > 0.0 {
            assembly.add_hole(backend.cylinder(
                led_radius,
                SCREW_BASE_THICKNESS,
                Point3::new(
                    LED_HOLE_OFFSET[0],
                    LED_HOLE_OFFSET[1],
                    SCREW_BASE_THICKNESS / 2.0,
                ),
            )?);
        }

        Ok(assembly.merge(backend)?)
    }

    fn back<B: GeometryBackend>(backend: &B, params: &Parameters) -> PartResult<B::Solid> {
        let width = params.float("camWidth")? + MARGIN;
        let swivel_x = params.float("swivelXOffset")?;
        let swivel_y = -params.float("swivelYOffset")?;
        let swivel_height = params.float("swivelHeight")?;
        let m3_hole = params.float("m3_hole")?;
        let pivot = Point3::new(swivel_x, swivel_y, swivel_height + BACK_THICKNESS);

        let mut assembly = Assembly::new();
        assembly
            .add_solid(backend.cuboid(
                Vector3::new(width, BOARD_LENGTH, BACK_THICKNESS),
                Point3::new(0.0, 0.0, BACK_THICKNESS / 2.0),
            )?)
            .add_solid(backend.cuboid(
                Vector3::new(SWIVEL_THICKNESS, SWIVEL_LENGTH, swivel_height),
                Point3::new(swivel_x, swivel_y, swivel_height / 2.0 + BACK_THICKNESS),
            )?)
            .add_solid(bore_along(
                backend,
                Axis::X,
                SWIVEL_LENGTH / 2.0,
                SWIVEL_THICKNESS,
                pivot,
            )?);
        if m3_hole > 0.0 {
            assembly.add_hole(bore_along(
                backend,
                Axis::X,
                m3_hole / 2.0,
                SWIVEL_THICKNESS,
                pivot,
            )?);
        }

        Self::add_screw_ears(backend, &mut assembly, width, BACK_THICKNESS, m3_hole)?;

        Ok(assembly.merge(backend)?)
    }
}

impl<B: GeometryBackend> PartGenerator<B> for CameraAdapter {
    fn name(&self) -> &'static str {
        "camera_adapter"
    }

    fn description(&self) -> &'static str {
        "Front and back plates clamping an ESP32-S3 camera board"
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::float("camWidth", "Camera Width", 9.0)
                .with_step(0.1)
                .with_min(1.0),
            ParameterDefinition::float("camHeight", "Camera Height", 9.0)
                .with_step(0.1)
                .with_min(1.0),
            ParameterDefinition::float("camYOffset", "Camera Y Offset", 10.0).with_step(0.1),
            ParameterDefinition::float("swivelXOffset", "Swivel Mount X Offset", 4.0)
                .with_step(0.1),
            ParameterDefinition::float("swivelYOffset", "Swivel Mount Y Offset", 12.0)
                .with_step(0.1),
            ParameterDefinition::float("swivelHeight", "Swivel Mount Height", 8.0)
                .with_step(0.1)
                .with_min(SWIVEL_LENGTH / 2.0),
            ParameterDefinition::float("ledHoleRadius", "Radius of LED Hole", 7.0)
                .with_step(0.5)
                .with_min(0.0),
            m3_parameter("m3", "Diameter of M3 holes", 2.8).with_max(SCREW_BASE_WIDTH),
            m3_parameter(
                "m3_hole",
                "Pass through hole for M3 screw (not secured)",
                3.4,
            )
            .with_max(SCREW_BASE_WIDTH),
        ]
    }

    fn generate(&self, backend: &B, params: &Parameters) -> PartResult<PartOutput<B::Solid>> {
        let cam_height = params.float("camHeight")?;
        let cam_y_offset = params.float("camYOffset")?;
        if (cam_y_offset.abs() + cam_height / 2.0) >= BOARD_LENGTH / 2.0 {
            return Err(ConfigError::InvalidDimensions(format!(
                "camera window at y {} with height {} leaves the {} mm plate",
                cam_y_offset, cam_height, BOARD_LENGTH
            ))
            .into());
        }

        let front = Self::front(backend, params)?;
        let back = Self::back(backend, params)?;

        // Lay the plates out side by side around x = 0
        let front_max_x = backend.bounding_box(&front).max.x;
        let front = backend.translate(&front, Vector3::new(-front_max_x - PIECE_GAP, 0.0, 0.0));
        let back_min_x = backend.bounding_box(&back).min.x;
        let back = backend.translate(&back, Vector3::new(-back_min_x + PIECE_GAP, 0.0, 0.0));

        Ok(PartOutput::Pieces(vec![front, back]))
    }
}
