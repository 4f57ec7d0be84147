// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Error types shared by the parameter model, the geometry backend and the
//! part generators.

use thiserror::Error;

/// A parameter map that does not satisfy its declarations.
///
/// Raised before any geometry is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("parameter `{0}` has no value")]
    MissingParameter(String),

    #[error("parameter `{name}` expects a {expected} value, got {found}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("parameter `{name}` must be finite, got {value}")]
    NonFinite { name: String, value: f64 },

    #[error("parameter `{name}` = {value} is below the minimum {min}")]
    BelowMinimum { name: String, value: f64, min: f64 },

    #[error("parameter `{name}` = {value} is above the maximum {max}")]
    AboveMaximum { name: String, value: f64, max: f64 },

    #[error("parameter `{name}` does not accept `{value}` (expected one of: {})", allowed.join(", "))]
    UnknownChoice {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("cannot parse `{text}` as a value for `{name}`: {reason}")]
    InvalidLiteral {
        name: String,
        text: String,
        reason: String,
    },

    #[error("invalid connector dimensions: {0}")]
    InvalidDimensions(String),

    #[error("unknown part `{0}`")]
    UnknownPart(String),
}

/// Failures reported by the geometry backend or the composition engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("merge requires at least one solid")]
    EmptySolidSet,

    #[error("invalid primitive: {0}")]
    InvalidPrimitive(String),

    #[error("degenerate geometry after {operation}: {reason}")]
    Degenerate {
        operation: &'static str,
        reason: String,
    },
}

impl GeometryError {
    pub fn degenerate(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Degenerate {
            operation,
            reason: reason.into(),
        }
    }
}

/// Anything that can go wrong while generating a part.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type PartResult<T> = Result<T, PartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_choice_lists_allowed_values() {
        let err = ConfigError::UnknownChoice {
            name: "type".into(),
            value: "C9".into(),
            allowed: vec!["A1".into(), "B1".into()],
        };
        assert_eq!(
            err.to_string(),
            "parameter `type` does not accept `C9` (expected one of: A1, B1)"
        );
    }

    #[test]
    fn test_part_error_wraps_sources() {
        let err: PartError = GeometryError::EmptySolidSet.into();
        assert!(matches!(err, PartError::Geometry(GeometryError::EmptySolidSet)));
        assert_eq!(err.to_string(), "merge requires at least one solid");
    }
}
