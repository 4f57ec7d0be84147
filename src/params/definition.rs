// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Static parameter declarations
//!
//! Serialises to the shape parameter-editing front ends expect:
//! `{ "name": "m3_hole", "caption": "M3 hole:", "type": "float", "initial": 3.4, "step": 0.1 }`.

use super::ParameterValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterKind {
    Float {
        initial: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Int {
        initial: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Checkbox {
        #[serde(rename = "checked")]
        initial: bool,
    },
    Choice {
        values: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        captions: Vec<String>,
        initial: String,
    },
}

impl ParameterKind {
    pub fn label(&self) -> &'static str {
        match self {
            ParameterKind::Float { .. } => "float",
            ParameterKind::Int { .. } => "int",
            ParameterKind::Checkbox { .. } => "checkbox",
            ParameterKind::Choice { .. } => "choice",
        }
    }
}

/// One tunable input of a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub caption: String,
    #[serde(flatten)]
    pub kind: ParameterKind,
}

impl ParameterDefinition {
    pub fn float(name: &str, caption: &str, initial: f64) -> Self {
        Self::new(
            name,
            caption,
            ParameterKind::Float {
                initial,
                step: None,
                min: None,
                max: None,
            },
        )
    }

    pub fn int(name: &str, caption: &str, initial: i64) -> Self {
        Self::new(
            name,
            caption,
            ParameterKind::Int {
                initial,
                step: None,
                min: None,
                max: None,
            },
        )
    }

    pub fn checkbox(name: &str, caption: &str, initial: bool) -> Self {
        Self::new(name, caption, ParameterKind::Checkbox { initial })
    }

    pub fn choice<S: AsRef<str>>(name: &str, caption: &str, values: &[S], initial: &str) -> Self {
        Self::new(
            name,
            caption,
            ParameterKind::Choice {
                values: values.iter().map(|v| v.as_ref().to_string()).collect(),
                captions: Vec::new(),
                initial: initial.to_string(),
            },
        )
    }

    fn new(name: &str, caption: &str, kind: ParameterKind) -> Self {
        Self {
            name: name.to_string(),
            caption: caption.to_string(),
            kind,
        }
    }

    /// Set the UI step. Integer parameters round it to the nearest whole step.
    pub fn with_step(mut self, value: f64) -> Self {
        match &mut self.kind {
            ParameterKind::Float { step, .. } => *step = Some(value),
            ParameterKind::Int { step, .. } => *step = Some(value.round() as i64),
            _ => {}
        }
        self
    }

    /// Set the inclusive lower bound
    pub fn with_min(mut self, value: f64) -> Self {
        match &mut self.kind {
            ParameterKind::Float { min, .. } => *min = Some(value),
            ParameterKind::Int { min, .. } => *min = Some(value.ceil() as i64),
            _ => {}
        }
        self
    }

    /// Set the inclusive upper bound
    pub fn with_max(mut self, value: f64) -> Self {
        match &mut self.kind {
            ParameterKind::Float { max, .. } => *max = Some(value),
            ParameterKind::Int { max, .. } => *max = Some(value.floor() as i64),
            _ => {}
        }
        self
    }

    /// Display captions for a choice, in value order
    pub fn with_captions<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        if let ParameterKind::Choice { captions, .. } = &mut self.kind {
            *captions = labels.iter().map(|c| c.as_ref().to_string()).collect();
        }
        self
    }

    pub fn default_value(&self) -> ParameterValue {
        match &self.kind {
            ParameterKind::Float { initial, .. } => ParameterValue::Float(*initial),
            ParameterKind::Int { initial, .. } => ParameterValue::Int(*initial),
            ParameterKind::Checkbox { initial } => ParameterValue::Bool(*initial),
            ParameterKind::Choice { initial, .. } => ParameterValue::Choice(initial.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_serialises_flat() {
        let definition = ParameterDefinition::float("m3_hole", "M3 hole:", 3.4).with_step(0.1);
        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "m3_hole",
                "caption": "M3 hole:",
                "type": "float",
                "initial": 3.4,
                "step": 0.1
            })
        );
    }

    #[test]
    fn test_choice_round_trips_through_json() {
        let definition =
            ParameterDefinition::choice("side", "Side:", &["Left", "Right"], "Left");
        let text = serde_json::to_string(&definition).unwrap();
        let back: ParameterDefinition = serde_json::from_str(&text).unwrap();
        assert_eq!(back, definition);
    }

    #[test]
    fn test_int_bounds_are_whole_numbers() {
        let definition = ParameterDefinition::int("width", "Width:", 5)
            .with_min(2.5)
            .with_max(9.5);
        match definition.kind {
            ParameterKind::Int { min, max, .. } => {
                assert_eq!(min, Some(3));
                assert_eq!(max, Some(9));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
