// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Parameter model
//!
//! Parts declare their inputs as [`ParameterDefinition`]s. A request supplies
//! a [`ParameterMap`] of overrides, which [`Parameters::resolve`] validates
//! against the declarations before any geometry is built.

mod definition;
mod set;
mod value;

pub use definition::{ParameterDefinition, ParameterKind};
pub use set::{parse_assignments, ParameterMap, Parameters};
pub use value::ParameterValue;
