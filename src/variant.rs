// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Variant selection
//!
//! A variant is a closed enum parameter that picks one footprint and the set
//! of stud-grid cells to leave solid. Each variant maps to a row of a lookup
//! table rather than a branch of layout code.

use crate::connectors::STUD_PITCH;
use crate::error::{ConfigError, ConfigResult};
use crate::params::ParameterDefinition;
use nalgebra::{Point2, Point3, Vector3};
use std::fmt;

/// A closed set of named alternatives backing a `choice` parameter
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }

    /// Look up a label, rejecting anything outside the declared set
    fn parse(parameter: &str, text: &str) -> ConfigResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == text)
            .ok_or_else(|| ConfigError::UnknownChoice {
                name: parameter.to_string(),
                value: text.to_string(),
                allowed: Self::labels().into_iter().map(String::from).collect(),
            })
    }

    fn definition(name: &str, caption: &str, initial: Self) -> ParameterDefinition {
        let labels = Self::labels();
        ParameterDefinition::choice(name, caption, labels.as_slice(), initial.label())
            .with_captions(labels.as_slice())
    }
}

/// Column/row index into a [`StudGrid`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub column: usize,
    pub row: usize,
}

impl GridCell {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}

/// Axis-aligned base block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub size: Vector3<f64>,
    pub center: Point3<f64>,
}

impl Footprint {
    pub fn new(size: Vector3<f64>, center: Point3<f64>) -> Self {
        Self { size, center }
    }

    /// True when `point` lies at least `margin` inside the footprint in XY
    pub fn contains_xy(&self, point: &Point3<f64>, margin: f64) -> bool {
        (point.x - self.center.x).abs() <= self.size.x / 2.0 - margin
            && (point.y - self.center.y).abs() <= self.size.y / 2.0 - margin
    }
}

/// Regular lattice of stud positions.
///
/// Cells are visited column by column, so hole declaration order is stable
/// for a given grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudGrid {
    pub columns: usize,
    pub rows: usize,
    pub origin: Point2<f64>,
    pub pitch: f64,
    pub z: f64,
}

impl StudGrid {
    pub fn new(columns: usize, rows: usize, origin: Point2<f64>, z: f64) -> Self {
        Self {
            columns,
            rows,
            origin,
            pitch: STUD_PITCH,
            z,
        }
    }

    /// The largest centred grid whose studs sit `inset` or more inside `footprint`.
    ///
    /// Use this whenever a parameter resizes the footprint; reusing a fixed
    /// lattice leaves holes hanging off the edge or missing.
    pub fn fitted(footprint: &Footprint, inset: f64, z: f64) -> Self {
        let count = |extent: f64| {
            let usable = extent - 2.0 * inset;
            if usable < -1e-9 {
                0
            } else {
                (usable / STUD_PITCH + 1e-9).floor() as usize + 1
            }
        };
        let columns = count(footprint.size.x);
        let rows = count(footprint.size.y);
        let start = |center: f64, n: usize| center - n.saturating_sub(1) as f64 * STUD_PITCH / 2.0;

        Self::new(
            columns,
            rows,
            Point2::new(
                start(footprint.center.x, columns),
                start(footprint.center.y, rows),
            ),
            z,
        )
    }

    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let rows = self.rows;
        (0..self.columns).flat_map(move |column| (0..rows).map(move |row| GridCell::new(column, row)))
    }

    pub fn position(&self, cell: GridCell) -> Point3<f64> {
        Point3::new(
            self.origin.x + cell.column as f64 * self.pitch,
            self.origin.y + cell.row as f64 * self.pitch,
            self.z,
        )
    }

    /// Positions of every cell not listed in `exclusions`
    pub fn positions(&self, exclusions: &[GridCell]) -> Vec<Point3<f64>> {
        self.cells()
            .filter(|cell| !exclusions.contains(cell))
            .map(|cell| self.position(cell))
            .collect()
    }
}

/// Footprint variants of the camera swivel base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    A1,
    A2,
    A3,
    B1,
    B2,
    B3,
}

impl Choice for BaseType {
    const ALL: &'static [Self] = &[
        BaseType::A1,
        BaseType::A2,
        BaseType::A3,
        BaseType::B1,
        BaseType::B2,
        BaseType::B3,
    ];

    fn label(self) -> &'static str {
        match self {
            BaseType::A1 => "A1",
            BaseType::A2 => "A2",
            BaseType::A3 => "A3",
            BaseType::B1 => "B1",
            BaseType::B2 => "B2",
            BaseType::B3 => "B3",
        }
    }
}

/// Everything a [`BaseType`] selects
#[derive(Debug, Clone, PartialEq)]
pub struct SwivelBaseLayout {
    pub footprint: Footprint,
    pub grid: StudGrid,
    /// Cells left solid under the swivel tower
    pub exclusions: &'static [GridCell],
    /// Y position of the swivel tower
    pub swivel_offset: f64,
}

impl SwivelBaseLayout {
    pub fn stud_positions(&self) -> Vec<Point3<f64>> {
        self.grid.positions(self.exclusions)
    }
}

const BASE_HEIGHT: f64 = 8.0;

const A1_EXCLUSIONS: &[GridCell] = &[GridCell::new(1, 0)];
const A2_EXCLUSIONS: &[GridCell] = &[GridCell::new(1, 0), GridCell::new(1, 1)];
const A3_EXCLUSIONS: &[GridCell] = &[GridCell::new(1, 1), GridCell::new(1, 2)];
const B1_EXCLUSIONS: &[GridCell] = &[GridCell::new(1, 0), GridCell::new(2, 0)];
const B2_EXCLUSIONS: &[GridCell] = &[
    GridCell::new(1, 0),
    GridCell::new(2, 0),
    GridCell::new(1, 1),
    GridCell::new(2, 1),
];
const B3_EXCLUSIONS: &[GridCell] = &[
    GridCell::new(1, 1),
    GridCell::new(2, 1),
    GridCell::new(1, 2),
    GridCell::new(2, 2),
];

impl BaseType {
    pub fn layout(self) -> SwivelBaseLayout {
        use BaseType::*;

        let (width, depth, exclusions, swivel_offset) = match self {
            A1 => (24.0, 16.0, A1_EXCLUSIONS, 3.0),
            A2 => (24.0, 24.0, A2_EXCLUSIONS, 11.0),
            A3 => (24.0, 32.0, A3_EXCLUSIONS, 16.0),
            B1 => (32.0, 16.0, B1_EXCLUSIONS, 3.5),
            B2 => (32.0, 24.0, B2_EXCLUSIONS, 11.5),
            B3 => (32.0, 32.0, B3_EXCLUSIONS, 16.0),
        };

        // Both families share a four-row lattice; A is three studs wide, B four
        let grid = match self {
            A1 | A2 | A3 => StudGrid::new(3, 4, Point2::new(-8.0, 4.0), BASE_HEIGHT / 2.0),
            B1 | B2 | B3 => StudGrid::new(4, 4, Point2::new(-12.0, 4.0), BASE_HEIGHT / 2.0),
        };

        SwivelBaseLayout {
            footprint: Footprint::new(
                Vector3::new(width, depth, BASE_HEIGHT),
                Point3::new(0.0, depth / 2.0, BASE_HEIGHT / 2.0),
            ),
            grid,
            exclusions,
            swivel_offset,
        }
    }
}
