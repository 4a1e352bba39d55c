// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Canvas tools and the pointer interaction state machine.
//!
//! The state is a plain enum. Deciding what a press does is a pure
//! function of the current state and a `Press` snapshot assembled by the
//! session, so every transition can be tested without a scene.

use super::input::PointerButton;
use super::oriented_rect::{Corner, RectHandle};
use crate::generator::InputKind;
use crate::model::{NodeId, normalize_yaw};
use kurbo::Point;

// ============================================================================
// TOOLS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tool {
    /// Select and drag waypoints
    #[default]
    Select,
    /// Drag to pan
    Pan,
    /// Click to place a waypoint, drag to orient it
    AddPoint,
    /// Collect inputs for the active generator
    Generator,
}

impl Tool {
    /// Tools where clicking a marker selects it and clicking empty
    /// canvas clears the selection
    pub fn is_select_capable(self) -> bool {
        matches!(self, Tool::Select)
    }
}

// ============================================================================
// INTERACTION STATE
// ============================================================================

/// The in-progress pointer gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Panning; `last` is the previous screen position
    Pan { last: Point },
    /// Orienting a freshly placed node
    SetYaw { node: NodeId },
    /// Moving a node, orientation unchanged
    DragNode { node: NodeId },
    /// Orienting a generator point input
    SetYawPlugin { slot: String },
    /// Drawing a new rectangle input from `origin` (world)
    DrawRect { slot: String, origin: Point },
    /// Resizing a rectangle input; `anchor` is the world position of the
    /// corner opposite the one grabbed, fixed for the whole drag
    DragRectCorner {
        slot: String,
        corner: Corner,
        anchor: Point,
    },
    /// Rotating a rectangle input by its handle
    SetRectRotation { slot: String },
}

/// A rectangle handle found under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct HandleHit {
    pub slot: String,
    pub handle: RectHandle,
    /// World position of the corner opposite `handle`, when it is one
    pub anchor: Point,
}

/// Everything a pointer-down decision depends on
#[derive(Debug, Clone, PartialEq)]
pub struct Press {
    pub button: PointerButton,
    pub tool: Tool,
    pub screen: Point,
    pub world: Point,
    /// Closest rectangle handle across every scratch rectangle
    pub handle: Option<HandleHit>,
    /// Marker under the pointer
    pub node: Option<NodeId>,
    /// Slot and kind of the active generator input
    pub active_input: Option<(String, InputKind)>,
}

/// What the session should do for a press
#[derive(Debug, Clone, PartialEq)]
pub enum PressAction {
    Ignore,
    /// Enter a state that needs no further setup
    Begin(Interaction),
    /// Create a node at the press position, select it, then `SetYaw`
    PlacePoint,
    /// Select the node, then `DragNode`
    GrabNode(NodeId),
    /// Seed a point input at the press position, then `SetYawPlugin`
    SeedPoint(String),
    /// Seed an empty rectangle input, then `DrawRect`
    StartRect(String),
    /// Press on empty canvas; the release decides what happens
    EmptyPress,
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The generator input this gesture edits, if any
    pub fn slot(&self) -> Option<&str> {
        match self {
            Interaction::SetYawPlugin { slot }
            | Interaction::DrawRect { slot, .. }
            | Interaction::DragRectCorner { slot, .. }
            | Interaction::SetRectRotation { slot } => Some(slot),
            Interaction::Idle
            | Interaction::Pan { .. }
            | Interaction::SetYaw { .. }
            | Interaction::DragNode { .. } => None,
        }
    }

    /// Decide the next step for a pointer-down.
    ///
    /// Presses are ignored mid-gesture. Rectangle handles win over every
    /// tool-specific action so an earlier input can be adjusted without
    /// re-selecting its step.
    pub fn on_press(&self, press: &Press) -> PressAction {
        if !self.is_idle() {
            return PressAction::Ignore;
        }
        match press.button {
            PointerButton::Middle => {
                return PressAction::Begin(Interaction::Pan { last: press.screen });
            }
            PointerButton::Secondary => return PressAction::Ignore,
            PointerButton::Primary => {}
        }

        if let Some(hit) = &press.handle {
            let slot = hit.slot.clone();
            return PressAction::Begin(match hit.handle {
                RectHandle::Corner(corner) => Interaction::DragRectCorner {
                    slot,
                    corner,
                    anchor: hit.anchor,
                },
                RectHandle::Rotation => Interaction::SetRectRotation { slot },
            });
        }

        match press.tool {
            Tool::Pan => PressAction::Begin(Interaction::Pan { last: press.screen }),
            Tool::AddPoint => PressAction::PlacePoint,
            Tool::Select => match press.node {
                Some(id) => PressAction::GrabNode(id),
                None => PressAction::EmptyPress,
            },
            Tool::Generator => match &press.active_input {
                Some((slot, InputKind::Point)) => PressAction::SeedPoint(slot.clone()),
                Some((slot, InputKind::Rectangle)) => PressAction::StartRect(slot.clone()),
                _ => PressAction::Ignore,
            },
        }
    }

    /// Pointer-up and pointer-leave always end the gesture
    pub fn on_release(&self) -> Interaction {
        Interaction::Idle
    }
}

/// Yaw of the drag vector from `pivot` to `pointer`.
///
/// `None` while the pointer is within `min_distance` of the pivot, where
/// the angle is undefined or jittery.
pub fn drag_yaw(pivot: Point, pointer: Point, min_distance: f64) -> Option<f64> {
    let d = pointer - pivot;
    let distance = d.hypot();
    if !distance.is_finite() || distance <= min_distance {
        return None;
    }
    Some(normalize_yaw(d.atan2()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn press(tool: Tool) -> Press {
        Press {
            button: PointerButton::Primary,
            tool,
            screen: Point::new(100.0, 100.0),
            world: Point::new(2.0, 3.0),
            handle: None,
            node: None,
            active_input: None,
        }
    }

    #[test]
    fn middle_button_pans_under_any_tool() {
        for tool in [Tool::Select, Tool::AddPoint, Tool::Generator] {
            let mut p = press(tool);
            p.button = PointerButton::Middle;
            assert_eq!(
                Interaction::Idle.on_press(&p),
                PressAction::Begin(Interaction::Pan {
                    last: Point::new(100.0, 100.0)
                })
            );
        }
    }

    #[test]
    fn presses_are_ignored_mid_gesture() {
        let state = Interaction::DragNode { node: NodeId::new() };
        assert_eq!(state.on_press(&press(Tool::AddPoint)), PressAction::Ignore);
    }

    #[test]
    fn tool_actions() {
        assert_eq!(Interaction::Idle.on_press(&press(Tool::AddPoint)), PressAction::PlacePoint);
        assert_eq!(Interaction::Idle.on_press(&press(Tool::Select)), PressAction::EmptyPress);

        let id = NodeId::new();
        let mut p = press(Tool::Select);
        p.node = Some(id);
        assert_eq!(Interaction::Idle.on_press(&p), PressAction::GrabNode(id));
    }

    #[test]
    fn generator_input_kind_picks_gesture() {
        let mut p = press(Tool::Generator);
        assert_eq!(Interaction::Idle.on_press(&p), PressAction::Ignore);

        p.active_input = Some(("start".into(), InputKind::Point));
        assert_eq!(
            Interaction::Idle.on_press(&p),
            PressAction::SeedPoint("start".into())
        );

        p.active_input = Some(("area".into(), InputKind::Rectangle));
        assert_eq!(
            Interaction::Idle.on_press(&p),
            PressAction::StartRect("area".into())
        );

        p.active_input = Some(("nodes".into(), InputKind::NodeSelect));
        assert_eq!(Interaction::Idle.on_press(&p), PressAction::Ignore);
    }

    #[test]
    fn handles_take_priority_over_new_shapes() {
        let mut p = press(Tool::Generator);
        p.active_input = Some(("second".into(), InputKind::Rectangle));
        p.handle = Some(HandleHit {
            slot: "first".into(),
            handle: RectHandle::Corner(Corner::Max),
            anchor: Point::new(-1.0, -1.0),
        });
        assert_eq!(
            Interaction::Idle.on_press(&p),
            PressAction::Begin(Interaction::DragRectCorner {
                slot: "first".into(),
                corner: Corner::Max,
                anchor: Point::new(-1.0, -1.0),
            })
        );

        p.handle.as_mut().unwrap().handle = RectHandle::Rotation;
        let action = Interaction::Idle.on_press(&p);
        assert_eq!(
            action,
            PressAction::Begin(Interaction::SetRectRotation {
                slot: "first".into()
            })
        );
    }

    #[test]
    fn release_returns_to_idle() {
        let state = Interaction::SetYawPlugin { slot: "a".into() };
        assert_eq!(state.slot(), Some("a"));
        assert!(state.on_release().is_idle());
    }

    #[test]
    fn drag_yaw_requires_distance() {
        let pivot = Point::new(2.0, 3.0);
        assert_eq!(drag_yaw(pivot, Point::new(2.05, 3.0), 0.1), None);
        assert_eq!(drag_yaw(pivot, Point::new(5.0, 3.0), 0.1), Some(0.0));
        let up = drag_yaw(pivot, Point::new(2.0, 6.0), 0.1).unwrap();
        assert!((up - FRAC_PI_2).abs() < 1e-12);
    }
}
