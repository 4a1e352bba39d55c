// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Generator plugin manifests.
//!
//! A manifest declares the canvas inputs a generator collects (points,
//! rectangles, ...) and its typed properties. Discovery and execution
//! happen outside this crate.

use crate::model::OptionDef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `needs` entry that makes the current selection a required input
pub const NEEDS_SELECTED_POINTS: &str = "selected_points";

/// Kind of a declared input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Point,
    Rectangle,
    Polygon,
    Path,
    NodeSelect,
    /// Plain value inputs (`float`, `string`, ...) edited in a form
    #[serde(other)]
    Other,
}

impl InputKind {
    /// True for inputs the canvas can collect with a pointer gesture
    pub fn is_canvas_input(self) -> bool {
        matches!(self, InputKind::Point | InputKind::Rectangle)
    }
}

/// One declared input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInputDef {
    pub id: String,
    /// Property key; falls back to `id` when empty
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

impl PluginInputDef {
    /// Key used for this input in scratch data and the context payload
    pub fn slot(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Contents of a plugin's `manifest.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Runtime, e.g. `python`
    #[serde(rename = "type")]
    pub runtime: String,
    pub executable: String,
    #[serde(default)]
    pub inputs: Vec<PluginInputDef>,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub properties: Vec<OptionDef>,
}

impl PluginManifest {
    pub fn input(&self, slot: &str) -> Option<&PluginInputDef> {
        self.inputs.iter().find(|input| input.slot() == slot)
    }

    pub fn needs_selection(&self) -> bool {
        self.needs.iter().any(|n| n == NEEDS_SELECTED_POINTS)
    }

    /// Property payload seeded from declared defaults.
    ///
    /// Every input and property key is present; missing defaults become
    /// an empty string.
    pub fn default_properties(&self) -> Value {
        let mut map = Map::new();
        for input in &self.inputs {
            let value = input.default.clone().unwrap_or_else(|| Value::from(""));
            map.insert(input.slot().to_string(), value);
        }
        for prop in &self.properties {
            let value = prop
                .default
                .as_ref()
                .and_then(|d| serde_json::to_value(d).ok())
                .unwrap_or_else(|| Value::from(""));
            map.insert(prop.name.clone(), value);
        }
        Value::Object(map)
    }
}

/// An installed plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInstance {
    /// Stable id, stored on generator nodes
    pub id: String,
    pub manifest: PluginManifest,
    #[serde(default)]
    pub folder_path: String,
    #[serde(default)]
    pub is_builtin: bool,
    #[serde(default)]
    pub sdk_version: Option<String>,
}
