// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-waypoint option values and the externally supplied schema that
//! types them.
//!
//! The schema is owned by the host (usually loaded from a project-level
//! YAML or JSON file); this module only checks and formats option maps
//! against it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named option values attached to a manual waypoint
pub type WaypointOptions = BTreeMap<String, OptionValue>;

/// A single option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<OptionValue>),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Integer(i) => write!(f, "{i}"),
            OptionValue::Float(x) => write!(f, "{x}"),
            OptionValue::Text(s) => write!(f, "{s}"),
            OptionValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Declared type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Float,
    Integer,
    String,
    Boolean,
    List,
}

/// One entry of the options schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Element type for `list` options
    #[serde(default)]
    pub item_type: Option<OptionType>,
    #[serde(default)]
    pub default: Option<OptionValue>,
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
}

/// The full options schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsSchema {
    pub options: Vec<OptionDef>,
}

/// A problem found while validating an option map
#[derive(Debug, Clone, PartialEq)]
pub enum OptionIssue {
    /// Key not declared in the schema
    UnknownKey(String),
    /// Value does not match the declared type
    TypeMismatch { name: String, expected: OptionType },
    /// Value (or list element) is not one of the allowed enum values
    NotInEnum { name: String, value: String },
}

impl OptionType {
    fn accepts(self, value: &OptionValue, item_type: Option<OptionType>) -> bool {
        match (self, value) {
            (OptionType::Boolean, OptionValue::Bool(_)) => true,
            (OptionType::Integer, OptionValue::Integer(_)) => true,
            // Integral literals are valid floats
            (OptionType::Float, OptionValue::Float(_) | OptionValue::Integer(_)) => true,
            (OptionType::String, OptionValue::Text(_)) => true,
            (OptionType::List, OptionValue::List(items)) => match item_type {
                Some(inner) if inner != OptionType::List => {
                    items.iter().all(|item| inner.accepts(item, None))
                }
                _ => true,
            },
            _ => false,
        }
    }
}

impl OptionDef {
    fn check(&self, value: &OptionValue) -> Option<OptionIssue> {
        if !self.option_type.accepts(value, self.item_type) {
            return Some(OptionIssue::TypeMismatch {
                name: self.name.clone(),
                expected: self.option_type,
            });
        }

        let allowed = self.enum_values.as_ref()?;
        let offending = match value {
            OptionValue::List(items) => items
                .iter()
                .map(ToString::to_string)
                .find(|s| !allowed.contains(s)),
            other => Some(other.to_string()).filter(|s| !allowed.contains(s)),
        };
        offending.map(|value| OptionIssue::NotInEnum {
            name: self.name.clone(),
            value,
        })
    }
}

impl OptionsSchema {
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        self.options.iter().find(|def| def.name == name)
    }

    /// Check every entry of `options` against the schema.
    ///
    /// Returns an empty list when the map is valid.
    pub fn validate(&self, options: &WaypointOptions) -> Vec<OptionIssue> {
        options
            .iter()
            .filter_map(|(name, value)| match self.get(name) {
                Some(def) => def.check(value),
                None => Some(OptionIssue::UnknownKey(name.clone())),
            })
            .collect()
    }

    /// Fill in schema defaults for keys missing from `options`.
    ///
    /// Keys the schema does not declare are kept as-is.
    pub fn resolve(&self, options: &WaypointOptions) -> WaypointOptions {
        let mut resolved = options.clone();
        for def in &self.options {
            if let Some(default) = &def.default {
                resolved
                    .entry(def.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        resolved
    }

    /// Format one option as a `Label: value` line, falling back to the
    /// schema default. Returns `None` when there is nothing to show.
    pub fn format_value(&self, options: &WaypointOptions, name: &str) -> Option<String> {
        let def = self.get(name);
        let value = options
            .get(name)
            .or_else(|| def.and_then(|d| d.default.as_ref()))?;
        if matches!(value, OptionValue::Text(s) if s.is_empty()) {
            return None;
        }
        let label = def.map(|d| d.label.as_str()).unwrap_or(name);
        Some(format!("{label}: {value}"))
    }
}
