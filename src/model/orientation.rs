// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Yaw ⇄ quaternion conversion.
//!
//! Orientation is stored as a unit quaternion restricted to rotation
//! about the vertical axis (`x = y = 0`), but edited as a scalar yaw.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// A rotation quaternion `(x, y, z, w)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    /// The identity rotation (yaw 0)
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Build the quaternion for a rotation of `yaw` radians about Z.
    pub fn from_yaw(yaw: f64) -> Self {
        quaternion_from_yaw(yaw)
    }

    /// Extract the yaw angle, in `[-π, π]`.
    pub fn yaw(&self) -> f64 {
        yaw_from_quaternion(self.x, self.y, self.z, self.w)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Yaw (rotation about Z) of the quaternion `(qx, qy, qz, qw)`.
///
/// Degenerate input that would produce a non-finite angle yields 0.
pub fn yaw_from_quaternion(qx: f64, qy: f64, qz: f64, qw: f64) -> f64 {
    let siny_cosp = 2.0 * (qw * qz + qx * qy);
    let cosy_cosp = 1.0 - 2.0 * (qy * qy + qz * qz);
    let yaw = siny_cosp.atan2(cosy_cosp);
    if yaw.is_finite() {
        yaw
    } else {
        tracing::warn!("Non-finite yaw from quaternion ({qx}, {qy}, {qz}, {qw}), using 0");
        0.0
    }
}

/// Quaternion for a pure yaw rotation. Non-finite yaw gives identity.
pub fn quaternion_from_yaw(yaw: f64) -> Quaternion {
    if !yaw.is_finite() {
        tracing::warn!("Non-finite yaw {yaw}, using identity orientation");
        return Quaternion::IDENTITY;
    }
    let half = yaw / 2.0;
    Quaternion {
        x: 0.0,
        y: 0.0,
        z: half.sin(),
        w: half.cos(),
    }
}

/// Wrap an angle into `(-π, π]`. Non-finite input maps to 0.
pub fn normalize_yaw(yaw: f64) -> f64 {
    if !yaw.is_finite() {
        return 0.0;
    }
    let mut wrapped = yaw.rem_euclid(TAU);
    if wrapped > PI {
        wrapped -= TAU;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_has_zero_yaw() {
        assert_eq!(Quaternion::IDENTITY.yaw(), 0.0);
        assert_eq!(Quaternion::from_yaw(0.0), Quaternion::IDENTITY);
    }

    #[test]
    fn quarter_turn() {
        let q = quaternion_from_yaw(FRAC_PI_2);
        assert_eq!(q.x, 0.0);
        assert_eq!(q.y, 0.0);
        assert!((q.z - 0.5f64.sqrt()).abs() < 1e-12);
        assert!((q.w - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn round_trip_random_yaws() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..1000 {
            // (-π, π]: sample [-π, π) and mirror the open end
            let mut yaw: f64 = rng.gen_range(-PI..PI);
            if yaw == -PI {
                yaw = PI;
            }
            let q = quaternion_from_yaw(yaw);
            let back = yaw_from_quaternion(q.x, q.y, q.z, q.w);
            assert!((back - yaw).abs() < 1e-6, "yaw {yaw} came back as {back}");
        }
    }

    #[test]
    fn round_trip_at_pi() {
        let q = quaternion_from_yaw(PI);
        assert!((q.yaw() - PI).abs() < 1e-6);
    }

    #[test]
    fn degenerate_input_is_finite() {
        assert_eq!(yaw_from_quaternion(f64::NAN, 0.0, 0.0, 1.0), 0.0);
        assert_eq!(yaw_from_quaternion(0.0, 0.0, f64::NAN, f64::NAN), 0.0);
        assert_eq!(quaternion_from_yaw(f64::NAN), Quaternion::IDENTITY);
        // A zero quaternion is malformed but still has a defined yaw
        assert!(yaw_from_quaternion(0.0, 0.0, 0.0, 0.0).is_finite());
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_yaw(2.5 * PI) - FRAC_PI_2).abs() < 1e-12);
        assert!((normalize_yaw(-PI) - PI).abs() < 1e-12);
        assert!((normalize_yaw(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-12);
        assert_eq!(normalize_yaw(f64::INFINITY), 0.0);
    }
}
