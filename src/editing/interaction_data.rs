// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Scratch values collected on the canvas for a generator's inputs.
//!
//! Keyed by input slot. Nothing here is persisted with the node tree.

use super::oriented_rect::OrientedRect;
use crate::model::Transform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single slot value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    // Listed first: untagged decoding tries variants in order and a
    // rectangle has no top-level `x`/`y`.
    Rectangle(OrientedRect),
    Point(Transform),
}

impl InputValue {
    pub fn as_point(&self) -> Option<&Transform> {
        match self {
            InputValue::Point(t) => Some(t),
            InputValue::Rectangle(_) => None,
        }
    }

    pub fn as_rect(&self) -> Option<&OrientedRect> {
        match self {
            InputValue::Rectangle(r) => Some(r),
            InputValue::Point(_) => None,
        }
    }
}

/// Slot name → value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionData {
    values: BTreeMap<String, InputValue>,
}

impl InteractionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, slot: &str) -> Option<&InputValue> {
        self.values.get(slot)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.values.contains_key(slot)
    }

    /// Insert or replace the value for `slot`
    pub fn set(&mut self, slot: impl Into<String>, value: InputValue) {
        self.values.insert(slot.into(), value);
    }

    pub fn remove(&mut self, slot: &str) {
        self.values.remove(slot);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every rectangle slot, in key order
    pub fn rects(&self) -> impl Iterator<Item = (&str, &OrientedRect)> {
        self.iter()
            .filter_map(|(slot, value)| value.as_rect().map(|r| (slot, r)))
    }

    pub fn point_mut(&mut self, slot: &str) -> Option<&mut Transform> {
        match self.values.get_mut(slot) {
            Some(InputValue::Point(t)) => Some(t),
            _ => None,
        }
    }

    pub fn rect_mut(&mut self, slot: &str) -> Option<&mut OrientedRect> {
        match self.values.get_mut(slot) {
            Some(InputValue::Rectangle(r)) => Some(r),
            _ => None,
        }
    }

    /// JSON object of the values whose slot passes `keep`
    pub fn to_json_filtered(&self, mut keep: impl FnMut(&str) -> bool) -> serde_json::Value {
        let map = self
            .values
            .iter()
            .filter(|(slot, _)| keep(slot))
            .filter_map(|(slot, value)| {
                serde_json::to_value(value)
                    .ok()
                    .map(|json| (slot.clone(), json))
            })
            .collect();
        serde_json::Value::Object(map)
    }
}
