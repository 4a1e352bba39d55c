// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene renderer for the map canvas.
//!
//! Painting only reads `SceneState`. Layers are drawn back to front:
//! background, maps, grid and axes, the path line, waypoints, then the
//! generator input previews on top.

mod drawing;

use crate::editing::interaction::Tool;
use crate::editing::interaction_data::InputValue;
use crate::editing::session::SceneState;
use kurbo::Size;
use masonry::util::fill_color;
use masonry::vello::Scene;

/// Paint the whole canvas for a viewport of `canvas_size`
pub fn paint_scene(scene: &mut Scene, state: &SceneState, canvas_size: Size) {
    fill_color(scene, &canvas_size.to_rect(), crate::theme::canvas::BACKGROUND);

    let viewport = state.viewport();
    let settings = state.settings();

    // Index 0 is the top layer
    for layer in state.layers().iter().rev() {
        drawing::draw_map_layer(scene, viewport, layer);
    }

    if settings.show_grid {
        drawing::draw_grid(scene, viewport, canvas_size);
        drawing::draw_axes(scene, viewport);
    }

    let waypoints = state.tree().flatten_waypoints();
    if settings.show_paths {
        let points = waypoints
            .iter()
            .filter_map(|node| node.transform())
            .map(|t| viewport.world_to_screen(t.position()));
        drawing::draw_path_line(scene, points);
    }

    let selection = state.tree().selection();
    for node in &waypoints {
        if let Some(transform) = node.transform() {
            drawing::draw_waypoint(scene, viewport, transform, selection.contains(&node.id));
        }
    }

    if state.tool() == Tool::Generator {
        for (_, value) in state.scratch().iter() {
            match value {
                InputValue::Point(t) => drawing::draw_point_preview(scene, viewport, t),
                InputValue::Rectangle(rect) => drawing::draw_rect_preview(
                    scene,
                    viewport,
                    rect,
                    settings.rotation_handle_offset,
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::oriented_rect::OrientedRect;
    use crate::model::{MapInfo, Node, Transform};
    use kurbo::{Point, Vec2};
    use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};

    fn tiny_image() -> ImageData {
        ImageData {
            data: Blob::from(vec![0x80u8; 4 * 4 * 4]),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width: 4,
            height: 4,
        }
    }

    #[test]
    fn paints_a_populated_scene() {
        let mut state = SceneState::default();
        let info = MapInfo {
            resolution: 0.5,
            origin: [-1.0, -1.0, 0.3],
            width: 4,
            height: 4,
        };
        state.add_map_layer("floor", info, Some(tiny_image()));
        let a = Node::manual(Transform::at(0.0, 0.0));
        let id = a.id;
        state.add_node(a, None);
        state.add_node(Node::manual(Transform::with_yaw(3.0, 1.0, 1.0)), None);
        state.select_nodes(&[id], false);

        state.activate_generator(crate::editing::session::test_support::plugin(false));
        let rect = OrientedRect::new(Point::new(1.0, 1.0), 2.0, 1.0, 0.4);
        state.set_input_value("area", InputValue::Rectangle(rect)).unwrap();
        state
            .set_input_value("start", InputValue::Point(Transform::at(-2.0, 0.0)))
            .unwrap();
        state.fit_to_content(Size::new(640.0, 480.0));

        let mut scene = Scene::new();
        paint_scene(&mut scene, &state, Size::new(640.0, 480.0));
        assert!(!scene.encoding().is_empty());
    }

    #[test]
    fn degenerate_view_paints_background_only() {
        let mut state = SceneState::default();
        state.add_node(Node::manual(Transform::at(f64::NAN, 0.0)), None);
        state.viewport_mut().pan = Vec2::new(f64::NAN, 0.0);

        let mut scene = Scene::new();
        paint_scene(&mut scene, &state, Size::new(100.0, 100.0));
        assert!(!scene.encoding().is_empty());
    }
}
