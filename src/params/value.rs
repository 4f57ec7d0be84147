// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Concrete parameter values

use super::ParameterKind;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value supplied for one parameter.
///
/// Untagged, so JSON and TOML parameter files can use plain literals:
/// `3` is an `Int`, `3.5` a `Float`, `true` a `Bool`, `"A2"` a `Choice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(String),
}

impl ParameterValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "checkbox",
            ParameterValue::Int(_) => "int",
            ParameterValue::Float(_) => "float",
            ParameterValue::Choice(_) => "choice",
        }
    }

    /// Parse a command-line literal according to the declared kind of `name`
    pub fn parse_for(kind: &ParameterKind, name: &str, text: &str) -> ConfigResult<Self> {
        let trimmed = text.trim();
        let invalid = |reason: String| ConfigError::InvalidLiteral {
            name: name.to_string(),
            text: text.to_string(),
            reason,
        };

        match kind {
            ParameterKind::Float { .. } => trimmed
                .parse::<f64>()
                .map(ParameterValue::Float)
                .map_err(|e| invalid(e.to_string())),
            ParameterKind::Int { .. } => trimmed
                .parse::<i64>()
                .map(ParameterValue::Int)
                .map_err(|e| invalid(e.to_string())),
            ParameterKind::Checkbox { .. } => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(ParameterValue::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(ParameterValue::Bool(false)),
                _ => Err(invalid("expected true or false".into())),
            },
            ParameterKind::Choice { .. } => Ok(ParameterValue::Choice(trimmed.to_string())),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(value) => write!(f, "{}", value),
            ParameterValue::Int(value) => write!(f, "{}", value),
            ParameterValue::Float(value) => write!(f, "{}", value),
            ParameterValue::Choice(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Choice(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterDefinition;

    #[test]
    fn test_untagged_json_literals() {
        let values: Vec<ParameterValue> = serde_json::from_str(r#"[3, 3.5, true, "A2"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ParameterValue::Int(3),
                ParameterValue::Float(3.5),
                ParameterValue::Bool(true),
                ParameterValue::Choice("A2".into()),
            ]
        );
    }

    #[test]
    fn test_parse_for_kind() {
        let float = ParameterDefinition::float("m3", "M3:", 2.8);
        let flag = ParameterDefinition::checkbox("tilt", "Tilt:", false);

        assert_eq!(
            ParameterValue::parse_for(&float.kind, "m3", " 3.1 ").unwrap(),
            ParameterValue::Float(3.1)
        );
        assert_eq!(
            ParameterValue::parse_for(&flag.kind, "tilt", "yes").unwrap(),
            ParameterValue::Bool(true)
        );

        let err = ParameterValue::parse_for(&float.kind, "m3", "wide").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLiteral { .. }));
    }
}
