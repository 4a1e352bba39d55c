// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Hit testing for SceneState

use super::SceneState;
use crate::editing::hit_test;
use crate::editing::input::{PointerButton, PointerEvent};
use crate::editing::interaction::{HandleHit, Press, Tool};
use crate::editing::oriented_rect::RectHandle;
use crate::model::NodeId;
use kurbo::Point;

impl SceneState {
    /// Waypoint marker closest to `screen_pos`, within the node hit
    /// radius (screen pixels). Generator children are hit like any other
    /// manual node; on a tie the earlier waypoint in path order wins.
    pub fn hit_test_node(&self, screen_pos: Point) -> Option<NodeId> {
        let waypoints = self.tree.flatten_waypoints();
        let candidates = waypoints.iter().filter_map(|node| {
            node.transform()
                .map(|t| (node.id, self.viewport.world_to_screen(t.position())))
        });
        let hit = hit_test::find_closest(screen_pos, candidates, self.settings.node_hit_radius)?;
        tracing::debug!("[hit_test_node] {} at {:.1}px", hit.target, hit.distance);
        Some(hit.target)
    }

    /// Rectangle handle closest to `world_pos` across every scratch
    /// rectangle, not just the active input's.
    pub fn hit_test_rect_handles(&self, world_pos: Point) -> Option<HandleHit> {
        let radius = self.viewport.screen_len_to_world(self.settings.handle_hit_radius);
        let offset = self
            .viewport
            .screen_len_to_world(self.settings.rotation_handle_offset);

        let mut best: Option<(HandleHit, f64)> = None;
        for (slot, rect) in self.scratch.rects() {
            let Some((handle, distance)) = rect.hit_test_handles(world_pos, radius, offset) else {
                continue;
            };
            if best.as_ref().is_some_and(|(_, d)| *d <= distance) {
                continue;
            }
            let anchor = match handle {
                RectHandle::Corner(corner) => rect.corner(corner.opposite()),
                RectHandle::Rotation => rect.center,
            };
            best = Some((
                HandleHit {
                    slot: slot.to_string(),
                    handle,
                    anchor,
                },
                distance,
            ));
        }
        best.map(|(hit, _)| hit)
    }

    /// Snapshot of what lies under a pointer-down
    pub(super) fn press_at(&self, event: &PointerEvent) -> Press {
        let button = event.button.unwrap_or(PointerButton::Primary);
        let world = self.viewport.screen_to_world(event.pos);
        let primary = button == PointerButton::Primary;

        let handle = if primary && self.tool == Tool::Generator {
            self.hit_test_rect_handles(world)
        } else {
            None
        };
        let node = if primary && self.tool.is_select_capable() {
            self.hit_test_node(event.pos)
        } else {
            None
        };
        let active_input = self
            .active_input()
            .map(|(slot, kind)| (slot.to_string(), kind));

        Press {
            button,
            tool: self.tool,
            screen: event.pos,
            world,
            handle,
            node,
            active_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::interaction_data::InputValue;
    use crate::editing::oriented_rect::{Corner, OrientedRect};
    use crate::editing::session::test_support::plugin;
    use crate::model::{Node, Transform};
    use kurbo::Vec2;

    fn scene() -> SceneState {
        let mut scene = SceneState::default();
        scene.viewport_mut().scale = 10.0;
        scene.viewport_mut().pan = Vec2::new(400.0, 300.0);
        scene
    }

    #[test]
    fn node_hit_uses_screen_radius() {
        let mut scene = scene();
        let node = Node::manual(Transform::at(1.0, 1.0));
        let id = node.id;
        scene.add_node(node, None);

        // (1, 1) is at screen (410, 290)
        assert_eq!(scene.hit_test_node(Point::new(415.0, 290.0)), Some(id));
        assert_eq!(scene.hit_test_node(Point::new(425.0, 290.0)), None);
    }

    #[test]
    fn stacked_nodes_hit_first_in_path_order() {
        let mut scene = scene();
        let ids: Vec<_> = (0..8)
            .map(|_| {
                let node = Node::manual(Transform::at(2.0, 0.0));
                let id = node.id;
                scene.add_node(node, None);
                id
            })
            .collect();

        assert_eq!(scene.hit_test_node(Point::new(420.0, 300.0)), Some(ids[0]));
        scene.remove_nodes(&ids[..1]);
        assert_eq!(scene.hit_test_node(Point::new(420.0, 300.0)), Some(ids[1]));
    }

    #[test]
    fn closest_handle_across_slots_wins() {
        let mut scene = scene();
        scene.activate_generator(plugin(false));
        let first = OrientedRect::new(Point::new(0.0, 0.0), 2.0, 2.0, 0.0);
        let second = OrientedRect::new(Point::new(2.5, 0.0), 2.0, 2.0, 0.0);
        scene.set_input_value("area", InputValue::Rectangle(first)).unwrap();
        // Only one rectangle input is declared; place a second directly
        scene.scratch.set("other", InputValue::Rectangle(second));

        // Max of `first` is (1, 1); BottomLeft of `second` is (1.5, 1)
        let hit = scene.hit_test_rect_handles(Point::new(1.4, 1.0)).unwrap();
        assert_eq!(hit.slot, "other");
        assert_eq!(hit.handle, RectHandle::Corner(Corner::BottomLeft));
        assert_eq!(hit.anchor, second.corner(Corner::TopRight));

        let hit = scene.hit_test_rect_handles(Point::new(1.05, 1.0)).unwrap();
        assert_eq!(hit.slot, "area");
        assert_eq!(hit.handle, RectHandle::Corner(Corner::Max));
    }
}
