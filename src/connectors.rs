// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Connector features shared by every part
//!
//! - stud bore: friction fit for a stud, with a relief washer at each face of
//!   an 8 mm panel
//! - axle socket: cross-shaped drive socket with corner reliefs
//! - D-shaft bore: round bore with one flat
//!
//! All three are returned as solids; callers decide whether they are added
//! as holes or as bosses.

use crate::compose::merge;
use crate::error::{ConfigError, ConfigResult, GeometryResult};
use crate::geometry::{Axis, GeometryBackend};
use crate::params::{ParameterDefinition, Parameters};
use nalgebra::{Point3, Vector3};
use std::f64::consts::FRAC_PI_4;

/// Nominal thickness of a studded panel
pub const PANEL_THICKNESS: f64 = 8.0;

/// Distance between neighbouring studs
pub const STUD_PITCH: f64 = 8.0;

/// Stud bore dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudBore {
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    /// Height of each relief washer
    pub relief_height: f64,
}

impl Default for StudBore {
    fn default() -> Self {
        Self {
            inner_diameter: 4.8,
            outer_diameter: 6.2,
            relief_height: 0.8,
        }
    }
}

impl StudBore {
    pub fn new(inner_diameter: f64, outer_diameter: f64, relief_height: f64) -> ConfigResult<Self> {
        let bore = Self {
            inner_diameter,
            outer_diameter,
            relief_height,
        };
        bore.validate()?;
        Ok(bore)
    }

    pub fn from_params(params: &Parameters) -> ConfigResult<Self> {
        Self::new(
            params.float("legoInnerDia")?,
            params.float("legoOuterDia")?,
            params.float("legoHeight")?,
        )
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.inner_diameter > 0.0 && self.outer_diameter > self.inner_diameter) {
            return Err(ConfigError::InvalidDimensions(format!(
                "stud bore needs outer diameter > inner diameter > 0, got {} and {}",
                self.outer_diameter, self.inner_diameter
            )));
        }
        if !(self.relief_height > 0.0 && self.relief_height < PANEL_THICKNESS / 2.0) {
            return Err(ConfigError::InvalidDimensions(format!(
                "stud relief height must lie in (0, {}), got {}",
                PANEL_THICKNESS / 2.0,
                self.relief_height
            )));
        }
        Ok(())
    }
}

/// Cross-axle socket dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxleProfile {
    pub length: f64,
    pub width: f64,
    /// Side of the square corner reliefs; zero leaves the corners sharp
    pub chamfer: f64,
}

impl Default for AxleProfile {
    fn default() -> Self {
        Self {
            length: 4.8,
            width: 1.8,
            chamfer: 0.8,
        }
    }
}

impl AxleProfile {
    pub fn new(length: f64, width: f64, chamfer: f64) -> ConfigResult<Self> {
        let profile = Self {
            length,
            width,
            chamfer,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_params(params: &Parameters) -> ConfigResult<Self> {
        Self::new(
            params.float("legoAxleLength")?,
            params.float("legoAxleWidth")?,
            params.float("legoAxleChamfer")?,
        )
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.width > 0.0 && self.length > self.width) {
            return Err(ConfigError::InvalidDimensions(format!(
                "axle needs length > width > 0, got {} and {}",
                self.length, self.width
            )));
        }
        if !(self.chamfer >= 0.0) {
            return Err(ConfigError::InvalidDimensions(format!(
                "axle chamfer must not be negative, got {}",
                self.chamfer
            )));
        }
        Ok(())
    }
}

/// Flatted motor shaft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DShaft {
    pub diameter: f64,
    /// Depth of the flat chord; zero means a round shaft
    pub flat_depth: f64,
    /// Length of the bore along Z
    pub depth: f64,
}

impl DShaft {
    pub fn new(diameter: f64, flat_depth: f64, depth: f64) -> ConfigResult<Self> {
        if !(diameter > 0.0 && depth > 0.0) {
            return Err(ConfigError::InvalidDimensions(format!(
                "shaft diameter and depth must be positive, got {} and {}",
                diameter, depth
            )));
        }
        if !(flat_depth >= 0.0 && flat_depth < diameter) {
            return Err(ConfigError::InvalidDimensions(format!(
                "shaft flat depth must lie in [0, {}), got {}",
                diameter, flat_depth
            )));
        }
        Ok(Self {
            diameter,
            flat_depth,
            depth,
        })
    }
}

/// Parameter declarations for [`StudBore::from_params`]
pub fn stud_parameters() -> Vec<ParameterDefinition> {
    let defaults = StudBore::default();
    vec![
        ParameterDefinition::float(
            "legoInnerDia",
            "Lego: Inner diameter of hole",
            defaults.inner_diameter,
        )
        .with_step(0.1)
        .with_min(0.1),
        ParameterDefinition::float(
            "legoOuterDia",
            "Lego: Outer diameter of hole",
            defaults.outer_diameter,
        )
        .with_step(0.1)
        .with_min(0.1),
        ParameterDefinition::float(
            "legoHeight",
            "Lego: Height of outer diameter",
            defaults.relief_height,
        )
        .with_step(0.1)
        .with_min(0.1),
    ]
}

/// Parameter declarations for [`AxleProfile::from_params`]
pub fn axle_parameters() -> Vec<ParameterDefinition> {
    let defaults = AxleProfile::default();
    vec![
        ParameterDefinition::float("legoAxleLength", "Lego: Axle Length", defaults.length)
            .with_step(0.1)
            .with_min(0.1),
        ParameterDefinition::float("legoAxleWidth", "Lego: Axle Width", defaults.width)
            .with_step(0.1)
            .with_min(0.1),
        ParameterDefinition::float(
            "legoAxleChamfer",
            "Lego: Inner Chamfer Size",
            defaults.chamfer,
        )
        .with_step(0.1)
        .with_min(0.0),
    ]
}

/// Connector generators bound to one backend and one set of dimensions
pub struct ConnectorLibrary<'a, B: GeometryBackend> {
    backend: &'a B,
    stud: StudBore,
    axle: AxleProfile,
}

impl<'a, B: GeometryBackend> ConnectorLibrary<'a, B> {
    pub fn new(backend: &'a B, stud: StudBore, axle: AxleProfile) -> Self {
        Self {
            backend,
            stud,
            axle,
        }
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    pub fn stud(&self) -> &StudBore {
        &self.stud
    }

    pub fn axle(&self) -> &AxleProfile {
        &self.axle
    }

    /// Stud bore through a panel centred on `anchor`.
    ///
    /// The inner bore spans the full panel; the relief washers sit flush with
    /// its top and bottom faces.
    pub fn stud_bore(&self, anchor: Point3<f64>) -> GeometryResult<B::Solid> {
        let backend = self.backend;
        let StudBore {
            inner_diameter,
            outer_diameter,
            relief_height,
        } = self.stud;
        let offset = PANEL_THICKNESS / 2.0 - relief_height / 2.0;

        let bore = backend.cylinder(inner_diameter / 2.0, PANEL_THICKNESS, anchor)?;
        let top = backend.cylinder(
            outer_diameter / 2.0,
            relief_height,
            anchor + Vector3::new(0.0, 0.0, offset),
        )?;
        let bottom = backend.cylinder(
            outer_diameter / 2.0,
            relief_height,
            anchor - Vector3::new(0.0, 0.0, offset),
        )?;

        merge(backend, &[bore, top, bottom], &[])
    }

    /// Cross-axle socket of `depth` along Z, centred on `anchor`
    pub fn axle_socket(&self, anchor: Point3<f64>, depth: f64) -> GeometryResult<B::Solid> {
        let backend = self.backend;
        let AxleProfile {
            length,
            width,
            chamfer,
        } = self.axle;

        let mut solids = vec![
            backend.cuboid(Vector3::new(length, width, depth), Point3::origin())?,
            backend.cuboid(Vector3::new(width, length, depth), Point3::origin())?,
        ];

        if chamfer > 0.0 {
            let relief = backend.rotate(
                &backend.cuboid(Vector3::new(chamfer, chamfer, depth), Point3::origin())?,
                Axis::Z,
                FRAC_PI_4,
            );
            for (sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
                solids.push(backend.translate(
                    &relief,
                    Vector3::new(sx * width / 2.0, sy * width / 2.0, 0.0),
                ));
            }
        }

        let socket = merge(backend, &solids, &[])?;
        Ok(backend.translate(&socket, anchor.coords))
    }

    /// D-shaped bore centred on the origin; the flat faces +Y
    pub fn d_shaft(&self, shaft: &DShaft) -> GeometryResult<B::Solid> {
        let backend = self.backend;
        let DShaft {
            diameter,
            flat_depth,
            depth,
        } = *shaft;

        let bore = backend.cylinder(diameter / 2.0, depth, Point3::origin())?;
        let mut holes = Vec::new();
        if flat_depth > 0.0 {
            holes.push(backend.cuboid(
                Vector3::new(diameter, flat_depth, depth),
                Point3::new(0.0, diameter / 2.0 - flat_depth / 2.0, 0.0),
            )?);
        }

        merge(backend, &[bore], &holes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshBackend;
    use approx::assert_relative_eq;

    #[test]
    fn test_stud_bore_validation() {
        assert!(StudBore::new(4.8, 6.2, 0.8).is_ok());
        assert!(StudBore::new(6.2, 4.8, 0.8).is_err());
        assert!(StudBore::new(0.0, 4.8, 0.8).is_err());
        assert!(StudBore::new(4.8, 6.2, 4.0).is_err());
        assert!(StudBore::new(4.8, 6.2, f64::NAN).is_err());
    }

    #[test]
    fn test_axle_validation() {
        assert!(AxleProfile::new(4.8, 1.8, 0.0).is_ok());
        assert!(AxleProfile::new(1.8, 4.8, 0.8).is_err());
        assert!(AxleProfile::new(4.8, 1.8, -0.1).is_err());
    }

    #[test]
    fn test_d_shaft_validation() {
        assert!(DShaft::new(5.0, 0.0, 16.0).is_ok());
        assert!(DShaft::new(5.0, 5.0, 16.0).is_err());
        assert!(DShaft::new(5.0, 0.5, 0.0).is_err());
    }

    #[test]
    fn test_from_params_uses_declared_defaults() {
        let mut definitions = stud_parameters();
        definitions.extend(axle_parameters());
        let params = Parameters::defaults(&definitions).unwrap();

        assert_eq!(StudBore::from_params(&params).unwrap(), StudBore::default());
        assert_eq!(AxleProfile::from_params(&params).unwrap(), AxleProfile::default());
    }

    #[test]
    fn test_axle_socket_footprint() {
        let backend = MeshBackend::default();
        let library = ConnectorLibrary::new(&backend, StudBore::default(), AxleProfile::default());
        let socket = library
            .axle_socket(Point3::new(1.0, 2.0, 3.0), 8.0)
            .unwrap();

        let bbox = backend.bounding_box(&socket);
        assert_relative_eq!(bbox.size().x, 4.8, epsilon = 1e-9);
        assert_relative_eq!(bbox.size().y, 4.8, epsilon = 1e-9);
        assert_relative_eq!(bbox.size().z, 8.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.center(), Point3::new(1.0, 2.0, 3.0), epsilon = 1e-9);
    }
}
