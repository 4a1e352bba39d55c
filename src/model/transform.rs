// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! World-space waypoint pose.

use super::orientation::{Quaternion, quaternion_from_yaw, yaw_from_quaternion};
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// Position (meters) plus yaw-only orientation quaternion.
///
/// Serialized flat as `{x, y, z?, qx, qy, qz, qw}`, the layout generator
/// plugins read and write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub qw: f64,
}

impl Transform {
    /// A transform at `(x, y)` with identity orientation.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            qx: 0.0,
            qy: 0.0,
            qz: 0.0,
            qw: 1.0,
        }
    }

    /// A transform at `(x, y)` facing `yaw` radians.
    pub fn with_yaw(x: f64, y: f64, yaw: f64) -> Self {
        let mut transform = Self::at(x, y);
        transform.set_yaw(yaw);
        transform
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Move to a new position, keeping orientation and `z`.
    pub fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn rotation(&self) -> Quaternion {
        Quaternion {
            x: self.qx,
            y: self.qy,
            z: self.qz,
            w: self.qw,
        }
    }

    pub fn set_rotation(&mut self, q: Quaternion) {
        self.qx = q.x;
        self.qy = q.y;
        self.qz = q.z;
        self.qw = q.w;
    }

    /// Yaw in radians; always finite.
    pub fn yaw(&self) -> f64 {
        yaw_from_quaternion(self.qx, self.qy, self.qz, self.qw)
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        self.set_rotation(quaternion_from_yaw(yaw));
    }

    /// True when the position and quaternion are all finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.rotation().is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

/// Older project files store a bare `yaw` instead of quaternion
/// components. When all four quaternion fields are present they win;
/// otherwise `yaw` is converted; with neither, orientation is identity.
impl<'de> Deserialize<'de> for Transform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            x: f64,
            y: f64,
            z: Option<f64>,
            yaw: Option<f64>,
            qx: Option<f64>,
            qy: Option<f64>,
            qz: Option<f64>,
            qw: Option<f64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let rotation = match (raw.qx, raw.qy, raw.qz, raw.qw, raw.yaw) {
            (Some(x), Some(y), Some(z), Some(w), _) => Quaternion { x, y, z, w },
            (_, _, _, _, Some(yaw)) => quaternion_from_yaw(yaw),
            _ => Quaternion::IDENTITY,
        };

        let mut transform = Transform::at(raw.x, raw.y);
        transform.z = raw.z;
        transform.set_rotation(rotation);
        Ok(transform)
    }
}
