// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Oriented rectangle used as an area input for generators.
//!
//! The rectangle is stored as `center`, `width`, `height`, and `yaw` in
//! world space. Local space has its origin at the center with axes
//! rotated by `yaw`.

use super::hit_test::find_closest;
use crate::model::normalize_yaw;
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

// ============================================================================
// HANDLES
// ============================================================================

/// The four corners, named by their local-space position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// `(-w/2, -h/2)`
    Min,
    /// `(w/2, h/2)`
    Max,
    /// `(w/2, -h/2)`
    TopRight,
    /// `(-w/2, h/2)`
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Min, Corner::Max, Corner::TopRight, Corner::BottomLeft];

    /// The diagonally opposite corner
    pub fn opposite(self) -> Corner {
        match self {
            Corner::Min => Corner::Max,
            Corner::Max => Corner::Min,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    fn signs(self) -> (f64, f64) {
        match self {
            Corner::Min => (-1.0, -1.0),
            Corner::Max => (1.0, 1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, 1.0),
        }
    }
}

/// A grabbable part of the rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectHandle {
    Corner(Corner),
    Rotation,
}

// ============================================================================
// ORIENTED RECT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Radians, rotation of the local axes relative to world axes
    pub yaw: f64,
}

impl OrientedRect {
    pub fn new(center: Point, width: f64, height: f64, yaw: f64) -> Self {
        Self {
            center,
            width,
            height,
            yaw,
        }
    }

    /// A zero-size rectangle at `origin`, the start of a draw gesture
    pub fn at(origin: Point) -> Self {
        Self::new(origin, 0.0, 0.0, 0.0)
    }

    /// Axis-aligned rectangle spanning two opposite corners
    pub fn from_drag(origin: Point, current: Point) -> Self {
        Self::new(
            origin.midpoint(current),
            (current.x - origin.x).abs(),
            (current.y - origin.y).abs(),
            0.0,
        )
    }

    /// Local → world: rotate by `yaw`, then translate by `center`
    pub fn local_to_world(&self, local: Point) -> Point {
        self.affine() * local
    }

    /// World → local: translate by `-center`, then rotate by `-yaw`
    pub fn world_to_local(&self, world: Point) -> Point {
        Affine::rotate(-self.yaw) * (world - self.center).to_point()
    }

    /// The local → world transform
    pub fn affine(&self) -> Affine {
        Affine::translate(self.center.to_vec2()) * Affine::rotate(self.yaw)
    }

    pub fn corner_local(&self, corner: Corner) -> Point {
        let (sx, sy) = corner.signs();
        Point::new(sx * self.width / 2.0, sy * self.height / 2.0)
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.local_to_world(self.corner_local(corner))
    }

    /// World corners in `Corner::ALL` order
    pub fn corners(&self) -> [Point; 4] {
        Corner::ALL.map(|c| self.corner(c))
    }

    /// World position of the rotation handle, `offset` meters beyond the
    /// edge at local `y = -h/2`
    pub fn rotation_handle(&self, offset: f64) -> Point {
        self.local_to_world(Point::new(0.0, -self.height / 2.0 - offset))
    }

    /// Continue a draw gesture started at `origin`. The result is always
    /// axis-aligned.
    pub fn draw_to(&mut self, origin: Point, current: Point) {
        *self = Self::from_drag(origin, current);
    }

    /// Resize so the corner opposite the grabbed one stays at `anchor`
    /// (world) while the grabbed corner follows `pointer` (world).
    ///
    /// Width and height are the absolute local offsets, so dragging past
    /// the anchor mirrors the rectangle instead of inverting it.
    pub fn resize_from_anchor(&mut self, anchor: Point, pointer: Point) {
        let d = Affine::rotate(-self.yaw) * (pointer - anchor).to_point();
        self.width = d.x.abs();
        self.height = d.y.abs();
        self.center = anchor.midpoint(pointer);
    }

    /// Resize by dragging `corner` to `pointer`, anchoring its opposite.
    pub fn resize_corner(&mut self, corner: Corner, pointer: Point) {
        let anchor = self.corner(corner.opposite());
        self.resize_from_anchor(anchor, pointer);
    }

    /// Point the rotation handle at `pointer`.
    ///
    /// Returns false (leaving `yaw` unchanged) when the pointer is closer
    /// than `min_distance` to the center.
    pub fn rotate_to(&mut self, pointer: Point, min_distance: f64) -> bool {
        let d = pointer - self.center;
        let distance = d.hypot();
        if !distance.is_finite() || distance <= min_distance {
            return false;
        }
        self.yaw = normalize_yaw(d.atan2() + FRAC_PI_2);
        true
    }

    /// The handle under `pos`, with its distance.
    ///
    /// `radius` and `rotation_offset` are world lengths, already divided
    /// by the view scale. Corners win over the rotation handle.
    pub fn hit_test_handles(
        &self,
        pos: Point,
        radius: f64,
        rotation_offset: f64,
    ) -> Option<(RectHandle, f64)> {
        let corners = Corner::ALL.map(|c| (RectHandle::Corner(c), self.corner(c)));
        if let Some(hit) = find_closest(pos, corners, radius) {
            return Some((hit.target, hit.distance));
        }
        let handle = self.rotation_handle(rotation_offset);
        find_closest(pos, [(RectHandle::Rotation, handle)], radius)
            .map(|hit| (hit.target, hit.distance))
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.yaw.is_finite()
    }
}
