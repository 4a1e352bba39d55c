// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Input event handling for SceneState

use super::SceneState;
use crate::editing::input::{InputEvent, PointerEvent};
use crate::editing::interaction::{Interaction, PressAction, drag_yaw};
use crate::editing::interaction_data::InputValue;
use crate::editing::oriented_rect::OrientedRect;
use crate::model::{Node, Transform};
use kurbo::{Point, Vec2};

/// Pointer capture request for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureChange {
    Capture(u64),
    Release(u64),
}

/// Result of handling one input event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Handled {
    /// The scene changed and should be repainted
    pub needs_redraw: bool,
    pub capture: Option<CaptureChange>,
}

impl Handled {
    pub(crate) fn redraw(mut self) -> Self {
        self.needs_redraw = true;
        self
    }

    pub(crate) fn capture(id: u64) -> Self {
        Self {
            needs_redraw: true,
            capture: Some(CaptureChange::Capture(id)),
        }
    }

    pub(crate) fn release(id: u64) -> Self {
        Self {
            needs_redraw: false,
            capture: Some(CaptureChange::Release(id)),
        }
    }
}

impl SceneState {
    // ============================================================================
    // EVENT DISPATCH
    // ============================================================================

    /// Feed one input event to the scene
    pub fn handle_event(&mut self, event: InputEvent) -> Handled {
        match event {
            InputEvent::PointerDown(e) => self.pointer_down(&e),
            InputEvent::PointerMove(e) => self.pointer_move(&e),
            InputEvent::PointerUp(e) => self.pointer_up(&e),
            InputEvent::PointerLeave { pointer_id } => self.pointer_leave(pointer_id),
            InputEvent::Wheel { pos, delta } => self.wheel(pos, delta),
            InputEvent::KeyDown { key, .. } => self.handle_key(key),
        }
    }

    /// True when `pointer_id` may drive the current gesture
    fn owns_pointer(&self, pointer_id: u64) -> bool {
        self.captured_pointer.is_none_or(|id| id == pointer_id)
    }

    // ============================================================================
    // POINTER DOWN
    // ============================================================================

    fn pointer_down(&mut self, event: &PointerEvent) -> Handled {
        let press = self.press_at(event);
        let action = self.interaction.on_press(&press);
        tracing::debug!(
            "[pointer_down] at {:?} (world {:?}), tool {:?} -> {:?}",
            event.pos,
            press.world,
            self.tool,
            action
        );

        let world = press.world;
        if !world.is_finite() && !matches!(action, PressAction::Begin(Interaction::Pan { .. })) {
            tracing::warn!("Ignoring press at non-finite world position");
            return Handled::default();
        }

        self.interaction = match action {
            PressAction::Ignore => return Handled::default(),
            PressAction::EmptyPress => {
                self.idle_press = true;
                return Handled::default();
            }
            PressAction::Begin(next) => next,
            PressAction::PlacePoint => {
                let node = Node::manual(Transform::at(world.x, world.y));
                let id = node.id;
                tracing::info!("Placed waypoint {id} at ({:.2}, {:.2})", world.x, world.y);
                self.tree.add_node(node, None);
                self.tree.select_nodes(&[id], false);
                Interaction::SetYaw { node: id }
            }
            PressAction::GrabNode(id) => {
                self.tree.select_nodes(&[id], event.mods.is_additive());
                Interaction::DragNode { node: id }
            }
            PressAction::SeedPoint(slot) => {
                self.scratch
                    .set(slot.as_str(), InputValue::Point(Transform::at(world.x, world.y)));
                Interaction::SetYawPlugin { slot }
            }
            PressAction::StartRect(slot) => {
                self.scratch
                    .set(slot.as_str(), InputValue::Rectangle(OrientedRect::at(world)));
                Interaction::DrawRect {
                    slot,
                    origin: world,
                }
            }
        };

        self.idle_press = false;
        self.captured_pointer = Some(event.pointer_id);
        Handled::capture(event.pointer_id)
    }

    // ============================================================================
    // POINTER MOVE
    // ============================================================================

    fn pointer_move(&mut self, event: &PointerEvent) -> Handled {
        if self.interaction.is_idle() || !self.owns_pointer(event.pointer_id) {
            return Handled::default();
        }

        if let Interaction::Pan { last } = &mut self.interaction {
            let delta = event.pos - *last;
            *last = event.pos;
            self.viewport.pan_by(delta);
            return Handled::default().redraw();
        }

        let world = self.viewport.screen_to_world(event.pos);
        if !world.is_finite() {
            return Handled::default();
        }
        let min_yaw_distance = self.settings.min_yaw_drag_distance;

        match &self.interaction {
            Interaction::Idle | Interaction::Pan { .. } => {}
            Interaction::SetYaw { node } => {
                let node = *node;
                if let Some(mut transform) = self.tree.get(node).and_then(|n| n.transform()).copied()
                    && let Some(yaw) = drag_yaw(transform.position(), world, min_yaw_distance)
                {
                    transform.set_yaw(yaw);
                    self.tree.set_transform(node, transform);
                }
            }
            Interaction::DragNode { node } => {
                let node = *node;
                if let Some(mut transform) = self.tree.get(node).and_then(|n| n.transform()).copied() {
                    transform.set_position(world);
                    self.tree.set_transform(node, transform);
                }
            }
            Interaction::SetYawPlugin { slot } => {
                if let Some(point) = self.scratch.point_mut(slot)
                    && let Some(yaw) = drag_yaw(point.position(), world, min_yaw_distance)
                {
                    point.set_yaw(yaw);
                }
            }
            Interaction::DrawRect { slot, origin } => {
                let origin = *origin;
                if let Some(rect) = self.scratch.rect_mut(slot) {
                    rect.draw_to(origin, world);
                }
            }
            Interaction::DragRectCorner { slot, anchor, .. } => {
                let anchor = *anchor;
                if let Some(rect) = self.scratch.rect_mut(slot) {
                    rect.resize_from_anchor(anchor, world);
                }
            }
            Interaction::SetRectRotation { slot } => {
                if let Some(rect) = self.scratch.rect_mut(slot) {
                    rect.rotate_to(world, min_yaw_distance);
                }
            }
        }
        Handled::default().redraw()
    }

    // ============================================================================
    // POINTER UP / LEAVE
    // ============================================================================

    fn pointer_up(&mut self, event: &PointerEvent) -> Handled {
        if !self.owns_pointer(event.pointer_id) {
            return Handled::default();
        }
        if self.interaction.is_idle() {
            // A gesture cut short (e.g. its node was deleted) still holds capture
            let mut handled = match self.captured_pointer.take() {
                Some(id) => Handled::release(id).redraw(),
                None => Handled::default(),
            };
            if self.idle_press && self.tool.is_select_capable() {
                self.tree.clear_selection();
                handled = handled.redraw();
            }
            self.idle_press = false;
            return handled;
        }

        let filled_slot = self.interaction.slot().is_some();
        self.interaction = self.interaction.on_release();
        if filled_slot {
            self.advance_input();
        }
        let handled = match self.captured_pointer.take() {
            Some(id) => Handled::release(id),
            None => Handled::default(),
        };
        handled.redraw()
    }

    fn pointer_leave(&mut self, pointer_id: u64) -> Handled {
        if !self.owns_pointer(pointer_id) {
            return Handled::default();
        }
        self.idle_press = false;
        if self.interaction.is_idle() && self.captured_pointer.is_none() {
            return Handled::default();
        }
        self.interaction = self.interaction.on_release();
        match self.captured_pointer.take() {
            Some(id) => Handled::release(id).redraw(),
            None => Handled::default().redraw(),
        }
    }

    // ============================================================================
    // WHEEL
    // ============================================================================

    /// Zoom about the pointer. Available in every state.
    fn wheel(&mut self, pos: Point, delta: Vec2) -> Handled {
        let factor = -delta.y * self.settings.wheel_sensitivity;
        if factor == 0.0 || !factor.is_finite() {
            return Handled::default();
        }
        self.viewport.zoom_at(pos, factor);
        Handled::default().redraw()
    }
}
