// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! The seam to whatever actually executes generator plugins, and the
//! decoding of what they return.

use crate::model::{Node, Quaternion, Transform, WaypointOptions, quaternion_from_yaw};
use anyhow::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Runs a generator plugin with a context payload.
///
/// Implemented by the host (process spawner, test double, ...). Errors
/// are reported to the user as-is.
pub trait GeneratorBackend {
    fn run_generator(&mut self, plugin_id: &str, context: &Value) -> Result<Vec<GeneratedWaypoint>>;
}

/// One waypoint produced by a generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedWaypoint {
    pub transform: Transform,
    pub options: WaypointOptions,
}

impl GeneratedWaypoint {
    /// A fresh manual node for this waypoint
    pub fn into_node(self) -> Node {
        Node::manual_with_options(self.transform, self.options)
    }
}

/// Plugins either nest a full `transform` or return flat fields. Flat
/// quaternion components default to identity; a `yaw` is used when `qw`
/// is missing.
impl<'de> Deserialize<'de> for GeneratedWaypoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            transform: Option<Transform>,
            x: Option<f64>,
            y: Option<f64>,
            yaw: Option<f64>,
            qx: Option<f64>,
            qy: Option<f64>,
            qz: Option<f64>,
            qw: Option<f64>,
            #[serde(default)]
            options: WaypointOptions,
        }

        let raw = Raw::deserialize(deserializer)?;
        let transform = match raw.transform {
            Some(transform) => transform,
            None => {
                let mut transform = Transform::at(raw.x.unwrap_or(0.0), raw.y.unwrap_or(0.0));
                let rotation = match (raw.yaw, raw.qw) {
                    (Some(yaw), None) => quaternion_from_yaw(yaw),
                    _ => Quaternion {
                        x: raw.qx.unwrap_or(0.0),
                        y: raw.qy.unwrap_or(0.0),
                        z: raw.qz.unwrap_or(0.0),
                        w: raw.qw.unwrap_or(1.0),
                    },
                };
                transform.set_rotation(rotation);
                transform
            }
        };
        Ok(Self {
            transform,
            options: raw.options,
        })
    }
}
