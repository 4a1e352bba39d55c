// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod input;
pub mod interaction;
pub mod interaction_data;
pub mod oriented_rect;
pub mod selection;
pub mod session;
pub mod viewport;

pub use input::{InputEvent, Key, Modifiers, PointerButton, PointerEvent};
pub use interaction::{Interaction, Tool};
pub use interaction_data::{InputValue, InteractionData};
pub use oriented_rect::{Corner, OrientedRect, RectHandle};
pub use selection::Selection;
pub use session::{CaptureChange, Handled, SceneState};
pub use viewport::ViewPort;
