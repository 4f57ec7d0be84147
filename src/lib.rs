// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Studmount
//!
//! Parametric generators for 3D-printable adapters that plug into
//! stud-and-axle construction systems. Every part declares typed parameters,
//! lays out solids and holes from a shared connector library, and combines
//! them with a deterministic union-then-subtract merge on a pluggable
//! geometry backend.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod connectors;
pub mod error;
pub mod geometry;
pub mod params;
pub mod parts;
pub mod variant;

pub use catalog::{render, render_batch, RenderRequest, RenderedPart};
pub use compose::{merge, union_all, Assembly};
pub use config::KernelConfig;
pub use connectors::{AxleProfile, ConnectorLibrary, DShaft, StudBore};
pub use error::{ConfigError, GeometryError, PartError};
pub use geometry::{GeometryBackend, Mesh, MeshBackend};
pub use params::{ParameterDefinition, ParameterMap, ParameterValue, Parameters};
pub use parts::{PartGenerator, PartOutput};
pub use variant::{BaseType, Choice};
