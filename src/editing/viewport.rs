// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Screen ⇄ world coordinate conversion.
//!
//! World space is metric with Y up; screen space is pixels with Y down:
//!
//! ```text
//! screen.x =  world.x * scale + pan.x
//! screen.y = -world.y * scale + pan.y
//! ```

use crate::settings::{self, CanvasSettings};
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Pan offset and zoom for the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPort {
    /// Screen position of the world origin, in pixels
    pub pan: Vec2,
    /// Pixels per meter
    pub scale: f64,
    min_scale: f64,
    max_scale: f64,
}

impl ViewPort {
    pub fn new(settings: &CanvasSettings) -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: settings.clamp_scale(settings.initial_scale),
            min_scale: settings.min_scale,
            max_scale: settings.max_scale,
        }
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan.x,
            -world.y * self.scale + self.pan.y,
        )
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.scale,
            (self.pan.y - screen.y) / self.scale,
        )
    }

    /// Convert a screen-space length to meters
    pub fn screen_len_to_world(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// The world→screen transform, for painting world-space geometry
    pub fn affine(&self) -> Affine {
        Affine::new([self.scale, 0.0, 0.0, -self.scale, self.pan.x, self.pan.y])
    }

    /// Translate the view by a screen-space delta
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.pan += delta;
        }
    }

    /// Set the scale directly, clamped to the configured range
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = self.clamp_scale(scale);
    }

    /// Multiply the scale by `1 + factor`, keeping the world point under
    /// `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !anchor.is_finite() || !factor.is_finite() {
            return;
        }
        let world = self.screen_to_world(anchor);
        self.scale = self.clamp_scale(self.scale * (1.0 + factor));
        self.pan = Vec2::new(
            anchor.x - world.x * self.scale,
            anchor.y + world.y * self.scale,
        );
    }

    /// Frame `boxes` so their padded union is centered and fits in
    /// `viewport`.
    ///
    /// Does nothing when there are no boxes or the result would be
    /// degenerate.
    pub fn fit_to_content(&mut self, boxes: &[Rect], viewport: Size, settings: &CanvasSettings) {
        let Some(union) = boxes
            .iter()
            .copied()
            .filter(|r| r.is_finite())
            .reduce(|a, b| a.union(b))
        else {
            return;
        };

        let pad_x = (union.width() * settings.fit_padding_ratio).max(settings.fit_min_padding);
        let pad_y = (union.height() * settings.fit_padding_ratio).max(settings.fit_min_padding);
        let padded = union.inflate(pad_x, pad_y);
        if padded.width() <= 0.0 || padded.height() <= 0.0 {
            return;
        }
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }

        let fill = settings.fit_viewport_fill;
        let scale = (viewport.width * fill / padded.width())
            .min(viewport.height * fill / padded.height());
        if !scale.is_finite() || scale <= 0.0 {
            return;
        }

        let scale = self.clamp_scale(scale);
        let center = padded.center();
        self.scale = scale;
        self.pan = Vec2::new(
            viewport.width / 2.0 - center.x * scale,
            viewport.height / 2.0 + center.y * scale,
        );
        tracing::debug!("Fit to content: scale {:.3}, pan {:?}", self.scale, self.pan);
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        settings::clamp_scale(scale, self.min_scale, self.max_scale)
    }
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new(&CanvasSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn y_axis_is_flipped() {
        let mut vp = ViewPort::default();
        vp.scale = 10.0;
        vp.pan = Vec2::new(100.0, 100.0);
        assert_eq!(vp.world_to_screen(Point::new(1.0, 1.0)), Point::new(110.0, 90.0));
        assert_eq!(vp.affine() * Point::new(1.0, 1.0), Point::new(110.0, 90.0));
    }

    #[test]
    fn screen_world_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut vp = ViewPort::default();
        for _ in 0..1000 {
            vp.pan = Vec2::new(rng.gen_range(-5000.0..5000.0), rng.gen_range(-5000.0..5000.0));
            vp.scale = rng.gen_range(0.01..=500.0);
            let p = Point::new(rng.gen_range(-2000.0..2000.0), rng.gen_range(-2000.0..2000.0));
            let back = vp.world_to_screen(vp.screen_to_world(p));
            assert!((back - p).hypot() < 1e-6, "{p:?} came back as {back:?}");
        }
    }

    #[test]
    fn zoom_is_anchored_at_pointer() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut vp = ViewPort::default();
        for _ in 0..1000 {
            vp.pan = Vec2::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
            vp.scale = rng.gen_range(0.01..=500.0);
            let anchor = Point::new(rng.gen_range(0.0..1920.0), rng.gen_range(0.0..1080.0));
            let factor = rng.gen_range(-0.5..0.5);

            let before = vp.screen_to_world(anchor);
            vp.zoom_at(anchor, factor);
            let after = vp.screen_to_world(anchor);
            let tolerance = 1e-9 * (1.0 + before.to_vec2().hypot());
            assert!((after - before).hypot() < tolerance.max(1e-6));
        }
    }

    #[test]
    fn zoom_clamps_scale() {
        let mut vp = ViewPort::default();
        vp.scale = 400.0;
        vp.zoom_at(Point::new(10.0, 10.0), 10.0);
        assert_eq!(vp.scale, 500.0);
        vp.zoom_at(Point::new(10.0, 10.0), -1.0);
        assert_eq!(vp.scale, 0.01);
    }

    #[test]
    fn set_scale_respects_configured_range() {
        let settings = CanvasSettings {
            min_scale: 1.0,
            max_scale: 20.0,
            ..CanvasSettings::default()
        };
        let mut vp = ViewPort::new(&settings);
        vp.set_scale(5.0);
        assert_eq!(vp.scale, 5.0);
        vp.set_scale(100.0);
        assert_eq!(vp.scale, 20.0);
        vp.set_scale(f64::INFINITY);
        assert_eq!(vp.scale, 1.0);
    }

    #[test]
    fn fit_centers_padded_content() {
        let settings = CanvasSettings::default();
        let mut vp = ViewPort::new(&settings);
        let boxes = [Rect::new(0.0, 0.0, 20.0, 10.0)];
        vp.fit_to_content(&boxes, Size::new(1000.0, 1000.0), &settings);

        // Padded box is 24 x 12 m, width-limited
        assert!((vp.scale - 900.0 / 24.0).abs() < 1e-9);
        let center = vp.world_to_screen(Point::new(10.0, 5.0));
        assert!((center - Point::new(500.0, 500.0)).hypot() < 1e-9);
    }

    #[test]
    fn fit_single_point_uses_minimum_padding() {
        let settings = CanvasSettings::default();
        let mut vp = ViewPort::new(&settings);
        let p = Rect::from_points((3.0, 4.0), (3.0, 4.0));
        vp.fit_to_content(&[p], Size::new(200.0, 100.0), &settings);
        // 2 x 2 m box, height-limited
        assert!((vp.scale - 45.0).abs() < 1e-9);
    }

    #[test]
    fn fit_without_content_is_noop() {
        let settings = CanvasSettings::default();
        let mut vp = ViewPort::new(&settings);
        let before = vp;
        vp.fit_to_content(&[], Size::new(800.0, 600.0), &settings);
        assert_eq!(vp, before);
        vp.fit_to_content(&[Rect::new(0.0, 0.0, 1.0, 1.0)], Size::ZERO, &settings);
        assert_eq!(vp, before);
    }
}
