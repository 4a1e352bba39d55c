// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Drawing functions for the map canvas. Everything here works in
//! screen space; callers map world positions through the viewport first.

use crate::editing::oriented_rect::OrientedRect;
use crate::editing::viewport::ViewPort;
use crate::model::{MapLayer, Transform};
use crate::theme;
use kurbo::{Affine, BezPath, Circle, Line, Point, Size, Stroke, Vec2};
use masonry::util::fill_color;
use masonry::vello::Scene;
use masonry::vello::peniko::{Brush, Color, ImageBrush};

/// Upper bound on grid lines per axis
const MAX_GRID_LINES: usize = 500;

// ============================================================================
// GRID AND AXES
// ============================================================================

/// Grid spacing in meters: the smallest 1, 2 or 5 × 10ⁿ whose on-screen
/// size is at least `min_px`.
pub(crate) fn grid_spacing(scale: f64, min_px: f64) -> Option<f64> {
    if !scale.is_finite() || scale <= 0.0 || !min_px.is_finite() || min_px <= 0.0 {
        return None;
    }
    let min_world = min_px / scale;
    let decade = 10f64.powf(min_world.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * decade)
        .find(|s| *s * scale >= min_px * (1.0 - 1e-9))
        .filter(|s| s.is_finite() && *s > 0.0)
}

/// Metric grid covering the visible area
pub(crate) fn draw_grid(scene: &mut Scene, viewport: &ViewPort, canvas_size: Size) {
    let Some(spacing) = grid_spacing(viewport.scale, theme::size::GRID_MIN_SPACING) else {
        return;
    };

    // World y grows upward, so the screen corners swap on y
    let top_left = viewport.screen_to_world(Point::ZERO);
    let bottom_right = viewport.screen_to_world(Point::new(canvas_size.width, canvas_size.height));
    if !top_left.is_finite() || !bottom_right.is_finite() {
        return;
    }
    let min_x = top_left.x.min(bottom_right.x);
    let max_x = top_left.x.max(bottom_right.x);
    let min_y = top_left.y.min(bottom_right.y);
    let max_y = top_left.y.max(bottom_right.y);

    let stroke = Stroke::new(theme::size::GRID_LINE_WIDTH);
    let brush = Brush::Solid(theme::grid::LINE);

    let first_x = (min_x / spacing).floor() * spacing;
    for i in 0..MAX_GRID_LINES {
        let x = first_x + i as f64 * spacing;
        if x > max_x {
            break;
        }
        let sx = viewport.world_to_screen(Point::new(x, 0.0)).x;
        let line = Line::new((sx, 0.0), (sx, canvas_size.height));
        scene.stroke(&stroke, Affine::IDENTITY, &brush, None, &line);
    }

    let first_y = (min_y / spacing).floor() * spacing;
    for i in 0..MAX_GRID_LINES {
        let y = first_y + i as f64 * spacing;
        if y > max_y {
            break;
        }
        let sy = viewport.world_to_screen(Point::new(0.0, y)).y;
        let line = Line::new((0.0, sy), (canvas_size.width, sy));
        scene.stroke(&stroke, Affine::IDENTITY, &brush, None, &line);
    }
}

/// Red X and green Y axes at the world origin, constant screen length
pub(crate) fn draw_axes(scene: &mut Scene, viewport: &ViewPort) {
    let origin = viewport.world_to_screen(Point::ORIGIN);
    if !origin.is_finite() {
        return;
    }
    let len = theme::size::AXIS_LENGTH;
    let stroke = Stroke::new(theme::size::AXIS_WIDTH);

    let x_axis = Line::new(origin, origin + Vec2::new(len, 0.0));
    scene.stroke(&stroke, Affine::IDENTITY, &Brush::Solid(theme::grid::AXIS_X), None, &x_axis);

    let y_axis = Line::new(origin, origin + Vec2::new(0.0, -len));
    scene.stroke(&stroke, Affine::IDENTITY, &Brush::Solid(theme::grid::AXIS_Y), None, &y_axis);
}

// ============================================================================
// MAP LAYERS
// ============================================================================

/// Draw one map with its placement transform and opacity
pub(crate) fn draw_map_layer(scene: &mut Scene, viewport: &ViewPort, layer: &MapLayer) {
    let Some(image) = &layer.image else {
        return;
    };
    if !layer.visible || layer.opacity <= 0.0 {
        return;
    }
    let transform = viewport.affine() * layer.info.image_to_world();
    if transform.as_coeffs().iter().any(|c| !c.is_finite()) {
        tracing::warn!("Skipping map layer '{}' with non-finite placement", layer.name);
        return;
    }
    let brush = ImageBrush::new(image.clone()).with_alpha(layer.opacity as f32);
    scene.draw_image(&brush, transform);
}

// ============================================================================
// WAYPOINTS
// ============================================================================

/// Arrow marker at `screen_pos` pointing along world `yaw`.
///
/// The arrow is centered on the position so the marker and its hit area
/// agree. World y is up and screen y is down, hence the sign flip.
pub(crate) fn marker_path(screen_pos: Point, yaw: f64) -> BezPath {
    let dir = Vec2::new(yaw.cos(), -yaw.sin());
    let perp = Vec2::new(-dir.y, dir.x);
    let len = theme::size::MARKER_LENGTH;
    let half_width = theme::size::MARKER_HALF_WIDTH;

    let tip = screen_pos + dir * (len * 2.0 / 3.0);
    let back = screen_pos - dir * (len / 3.0);
    let notch = screen_pos - dir * (len / 6.0);

    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(back + perp * half_width);
    path.line_to(notch);
    path.line_to(back - perp * half_width);
    path.close_path();
    path
}

/// Waypoint arrow, colored by selection state
pub(crate) fn draw_waypoint(
    scene: &mut Scene,
    viewport: &ViewPort,
    transform: &Transform,
    is_selected: bool,
) {
    let pos = viewport.world_to_screen(transform.position());
    let yaw = transform.yaw();
    if !pos.is_finite() || !yaw.is_finite() {
        return;
    }

    let (fill, outline) = if is_selected {
        (theme::marker::SELECTED_FILL, theme::marker::SELECTED_STROKE)
    } else {
        (theme::marker::FILL, theme::marker::STROKE)
    };
    draw_arrow(scene, pos, yaw, fill, outline);
}

fn draw_arrow(scene: &mut Scene, pos: Point, yaw: f64, fill: Color, outline: Color) {
    let arrow = marker_path(pos, yaw);
    fill_color(scene, &arrow, fill);
    let stroke = Stroke::new(theme::size::MARKER_STROKE_WIDTH);
    scene.stroke(&stroke, Affine::IDENTITY, &Brush::Solid(outline), None, &arrow);
}

/// Polyline through `points` in order. Non-finite points break the line.
pub(crate) fn draw_path_line(scene: &mut Scene, points: impl IntoIterator<Item = Point>) {
    let mut path = BezPath::new();
    let mut pen_down = false;
    for p in points {
        if !p.is_finite() {
            pen_down = false;
            continue;
        }
        if pen_down {
            path.line_to(p);
        } else {
            path.move_to(p);
            pen_down = true;
        }
    }
    if path.elements().len() < 2 {
        return;
    }
    let stroke = Stroke::new(theme::size::PATH_LINE_WIDTH);
    scene.stroke(&stroke, Affine::IDENTITY, &Brush::Solid(theme::path::LINE), None, &path);
}

// ============================================================================
// GENERATOR INPUT PREVIEWS
// ============================================================================

/// Scratch point input: an arrow in the preview color
pub(crate) fn draw_point_preview(scene: &mut Scene, viewport: &ViewPort, transform: &Transform) {
    let pos = viewport.world_to_screen(transform.position());
    let yaw = transform.yaw();
    if !pos.is_finite() || !yaw.is_finite() {
        return;
    }
    draw_arrow(scene, pos, yaw, theme::preview::FILL, theme::preview::STROKE);
}

/// Scratch rectangle input: dashed outline, corner handles, and the
/// rotation handle on its stalk
pub(crate) fn draw_rect_preview(
    scene: &mut Scene,
    viewport: &ViewPort,
    rect: &OrientedRect,
    rotation_offset_px: f64,
) {
    if !rect.is_finite() {
        return;
    }
    let corners = rect.corners().map(|c| viewport.world_to_screen(c));
    if corners.iter().any(|c| !c.is_finite()) {
        return;
    }

    let mut outline = BezPath::new();
    outline.move_to(corners[0]);
    for corner in &corners[1..] {
        outline.line_to(*corner);
    }
    outline.close_path();
    fill_color(scene, &outline, theme::preview::FILL);
    let stroke = Stroke::new(theme::size::PREVIEW_LINE_WIDTH).with_dashes(0.0, theme::preview::LINE_DASH);
    let brush = Brush::Solid(theme::preview::STROKE);
    scene.stroke(&stroke, Affine::IDENTITY, &brush, None, &outline);

    let offset = viewport.screen_len_to_world(rotation_offset_px);
    let edge_mid = viewport.world_to_screen(rect.local_to_world(Point::new(0.0, -rect.height / 2.0)));
    let handle = viewport.world_to_screen(rect.rotation_handle(offset));
    if edge_mid.is_finite() && handle.is_finite() {
        let stalk = Stroke::new(theme::size::PREVIEW_LINE_WIDTH);
        scene.stroke(&stalk, Affine::IDENTITY, &brush, None, &Line::new(edge_mid, handle));
        draw_handle(scene, handle);
    }
    for corner in corners {
        draw_handle(scene, corner);
    }
}

fn draw_handle(scene: &mut Scene, pos: Point) {
    let circle = Circle::new(pos, theme::size::HANDLE_RADIUS);
    fill_color(scene, &circle, theme::preview::HANDLE_FILL);
    let stroke = Stroke::new(theme::size::PREVIEW_LINE_WIDTH);
    scene.stroke(&stroke, Affine::IDENTITY, &Brush::Solid(theme::preview::STROKE), None, &circle);
}
