// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Resolved parameter snapshots

use super::{ParameterDefinition, ParameterKind, ParameterValue};
use crate::error::{ConfigError, ConfigResult};
use crate::variant::Choice;
use std::collections::{BTreeMap, HashSet};

/// Caller-supplied values keyed by parameter name
pub type ParameterMap = BTreeMap<String, ParameterValue>;

/// A complete, validated set of values for one generation request.
///
/// Every declared parameter has a value and every value satisfies its
/// declaration; generators read from it without further checks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters {
    values: BTreeMap<String, ParameterValue>,
}

impl Parameters {
    /// Apply `overrides` on top of the declared defaults and validate the result
    pub fn resolve(
        definitions: &[ParameterDefinition],
        overrides: &ParameterMap,
    ) -> ConfigResult<Self> {
        let mut declared = HashSet::with_capacity(definitions.len());
        for definition in definitions {
            if !declared.insert(definition.name.as_str()) {
                return Err(ConfigError::DuplicateParameter(definition.name.clone()));
            }
        }

        if let Some(unknown) = overrides.keys().find(|name| !declared.contains(name.as_str())) {
            return Err(ConfigError::UnknownParameter(unknown.clone()));
        }

        let mut values = BTreeMap::new();
        for definition in definitions {
            let value = overrides
                .get(&definition.name)
                .cloned()
                .unwrap_or_else(|| definition.default_value());
            values.insert(definition.name.clone(), check(definition, value)?);
        }

        Ok(Self { values })
    }

    pub fn defaults(definitions: &[ParameterDefinition]) -> ConfigResult<Self> {
        Self::resolve(definitions, &ParameterMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> ConfigResult<&ParameterValue> {
        self.values
            .get(name)
            .ok_or_else(|| ConfigError::MissingParameter(name.to_string()))
    }

    pub fn float(&self, name: &str) -> ConfigResult<f64> {
        match self.require(name)? {
            ParameterValue::Float(value) => Ok(*value),
            other => Err(mismatch(name, "float", other)),
        }
    }

    pub fn int(&self, name: &str) -> ConfigResult<i64> {
        match self.require(name)? {
            ParameterValue::Int(value) => Ok(*value),
            other => Err(mismatch(name, "int", other)),
        }
    }

    pub fn flag(&self, name: &str) -> ConfigResult<bool> {
        match self.require(name)? {
            ParameterValue::Bool(value) => Ok(*value),
            other => Err(mismatch(name, "checkbox", other)),
        }
    }

    pub fn choice(&self, name: &str) -> ConfigResult<&str> {
        match self.require(name)? {
            ParameterValue::Choice(value) => Ok(value.as_str()),
            other => Err(mismatch(name, "choice", other)),
        }
    }

    pub fn choice_as<T: Choice>(&self, name: &str) -> ConfigResult<T> {
        T::parse(name, self.choice(name)?)
    }
}

/// Parse `name=value` assignments against the declared kinds
pub fn parse_assignments<S: AsRef<str>>(
    definitions: &[ParameterDefinition],
    assignments: &[S],
) -> ConfigResult<ParameterMap> {
    let mut map = ParameterMap::new();

    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (name, text) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidLiteral {
                name: assignment.to_string(),
                text: assignment.to_string(),
                reason: "expected name=value".into(),
            })?;
        let name = name.trim();
        let definition = definitions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))?;

        map.insert(
            name.to_string(),
            ParameterValue::parse_for(&definition.kind, name, text)?,
        );
    }

    Ok(map)
}

fn mismatch(name: &str, expected: &'static str, found: &ParameterValue) -> ConfigError {
    ConfigError::KindMismatch {
        name: name.to_string(),
        expected,
        found: found.kind_name(),
    }
}

fn check_range(name: &str, value: f64, min: Option<f64>, max: Option<f64>) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite {
            name: name.to_string(),
            value,
        });
    }
    if let Some(min) = min.filter(|min| value < *min) {
        return Err(ConfigError::BelowMinimum {
            name: name.to_string(),
            value,
            min,
        });
    }
    if let Some(max) = max.filter(|max| value > *max) {
        return Err(ConfigError::AboveMaximum {
            name: name.to_string(),
            value,
            max,
        });
    }
    Ok(())
}

fn check(definition: &ParameterDefinition, value: ParameterValue) -> ConfigResult<ParameterValue> {
    let name = definition.name.as_str();

    match (&definition.kind, value) {
        (ParameterKind::Float { min, max, .. }, ParameterValue::Float(v)) => {
            check_range(name, v, *min, *max)?;
            Ok(ParameterValue::Float(v))
        }
        (ParameterKind::Float { min, max, .. }, ParameterValue::Int(i)) => {
            let v = i as f64;
            check_range(name, v, *min, *max)?;
            Ok(ParameterValue::Float(v))
        }
        (ParameterKind::Int { min, max, .. }, ParameterValue::Int(i)) => {
            check_range(
                name,
                i as f64,
                min.map(|m| m as f64),
                max.map(|m| m as f64),
            )?;
            Ok(ParameterValue::Int(i))
        }
        (ParameterKind::Checkbox { .. }, ParameterValue::Bool(b)) => Ok(ParameterValue::Bool(b)),
        (ParameterKind::Choice { values, .. }, ParameterValue::Choice(choice)) => {
            if values.iter().any(|v| *v == choice) {
                Ok(ParameterValue::Choice(choice))
            } else {
                Err(ConfigError::UnknownChoice {
                    name: name.to_string(),
                    value: choice,
                    allowed: values.clone(),
                })
            }
        }
        (kind, other) => Err(ConfigError::KindMismatch {
            name: name.to_string(),
            expected: kind.label(),
            found: other.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::float("m3_hole", "M3 hole:", 3.4).with_min(0.0),
            ParameterDefinition::int("width", "Width:", 5).with_min(3.0),
            ParameterDefinition::checkbox("tilt", "Tilt:", false),
            ParameterDefinition::choice("side", "Side:", &["Left", "Right"], "Left"),
        ]
    }

    #[test]
    fn test_defaults_fill_every_parameter() {
        let params = Parameters::defaults(&definitions()).unwrap();
        assert_eq!(params.len(), 4);
        assert_eq!(params.float("m3_hole").unwrap(), 3.4);
        assert_eq!(params.int("width").unwrap(), 5);
        assert!(!params.flag("tilt").unwrap());
        assert_eq!(params.choice("side").unwrap(), "Left");
    }

    #[test]
    fn test_int_widens_to_float() {
        let mut overrides = ParameterMap::new();
        overrides.insert("m3_hole".into(), ParameterValue::Int(3));
        let params = Parameters::resolve(&definitions(), &overrides).unwrap();
        assert_eq!(params.get("m3_hole"), Some(&ParameterValue::Float(3.0)));
    }

    #[test]
    fn test_float_never_narrows_to_int() {
        let mut overrides = ParameterMap::new();
        overrides.insert("width".into(), ParameterValue::Float(4.0));
        let err = Parameters::resolve(&definitions(), &overrides).unwrap_err();
        assert_eq!(
            err,
            ConfigError::KindMismatch {
                name: "width".into(),
                expected: "int",
                found: "float",
            }
        );
    }

    #[test]
    fn test_rejections() {
        let mut duplicated = definitions();
        duplicated.push(ParameterDefinition::float("tilt", "Again:", 1.0));
        assert_eq!(
            Parameters::defaults(&duplicated).unwrap_err(),
            ConfigError::DuplicateParameter("tilt".into())
        );

        let mut overrides = ParameterMap::new();
        overrides.insert("colour".into(), ParameterValue::Choice("red".into()));
        assert_eq!(
            Parameters::resolve(&definitions(), &overrides).unwrap_err(),
            ConfigError::UnknownParameter("colour".into())
        );

        let mut overrides = ParameterMap::new();
        overrides.insert("m3_hole".into(), ParameterValue::Float(-1.0));
        assert!(matches!(
            Parameters::resolve(&definitions(), &overrides).unwrap_err(),
            ConfigError::BelowMinimum { .. }
        ));

        let mut overrides = ParameterMap::new();
        overrides.insert("m3_hole".into(), ParameterValue::Float(f64::INFINITY));
        assert!(matches!(
            Parameters::resolve(&definitions(), &overrides).unwrap_err(),
            ConfigError::NonFinite { .. }
        ));

        let mut overrides = ParameterMap::new();
        overrides.insert("side".into(), ParameterValue::Choice("Up".into()));
        assert!(matches!(
            Parameters::resolve(&definitions(), &overrides).unwrap_err(),
            ConfigError::UnknownChoice { .. }
        ));
    }

    #[test]
    fn test_parse_assignments() {
        let map = parse_assignments(&definitions(), &["width=7", "tilt=true", "side=Right"]).unwrap();
        assert_eq!(map["width"], ParameterValue::Int(7));
        assert_eq!(map["tilt"], ParameterValue::Bool(true));
        assert_eq!(map["side"], ParameterValue::Choice("Right".into()));

        assert!(parse_assignments(&definitions(), &["width"]).is_err());
        assert_eq!(
            parse_assignments(&definitions(), &["depth=3"]).unwrap_err(),
            ConfigError::UnknownParameter("depth".into())
        );
    }

    #[test]
    fn test_accessor_kind_mismatch() {
        let params = Parameters::defaults(&definitions()).unwrap();
        assert!(matches!(
            params.int("m3_hole").unwrap_err(),
            ConfigError::KindMismatch { .. }
        ));
        assert_eq!(
            params.float("nope").unwrap_err(),
            ConfigError::MissingParameter("nope".into())
        );
    }
}
