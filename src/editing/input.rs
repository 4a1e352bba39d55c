// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Device-independent input events fed to the scene by the host.
//!
//! Positions are canvas-local screen pixels.

use kurbo::{Point, Vec2};

/// Modifier key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift, Ctrl or Cmd: add to / toggle the selection
    pub fn is_additive(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// A pointer press, move, or release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identifies the pointer for capture
    pub pointer_id: u64,
    pub pos: Point,
    /// `None` for moves with no button change
    pub button: Option<PointerButton>,
    pub mods: Modifiers,
}

impl PointerEvent {
    pub fn new(pos: Point) -> Self {
        Self {
            pointer_id: 0,
            pos,
            button: Some(PointerButton::Primary),
            mods: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }
}

/// Keys the canvas reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Other,
}

/// Everything the canvas consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// The pointer left the canvas
    PointerLeave { pointer_id: u64 },
    /// Scroll wheel; `delta.y` is positive when scrolling down
    Wheel { pos: Point, delta: Vec2 },
    KeyDown { key: Key, mods: Modifiers },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_modifiers() {
        assert!(!Modifiers::NONE.is_additive());
        assert!(Modifiers::SHIFT.is_additive());
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.is_additive());
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert!(!alt.is_additive());
    }
}
