// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Geometry module - mesh representation and operations

mod backend;
mod bbox;
mod mesh;
mod primitives;
mod transform;

pub mod analytics;
pub mod csg;
pub mod mesh_utils;

pub use backend::{GeometryBackend, MeshBackend};
pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::{Primitive, DEFAULT_SEGMENTS};
pub use transform::{Axis, Transform};
