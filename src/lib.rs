// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Waypoint Scene: an interactive scene engine for placing, orienting,
//! and generating 2D waypoints over raster maps.
//!
//! Hosts own a [`SceneState`], feed it [`InputEvent`]s and operation
//! calls, and paint it into a vello scene with [`paint_scene`].

pub mod canvas;
pub mod editing;
pub mod error;
pub mod generator;
pub mod model;
pub mod settings;
pub mod theme;

pub use canvas::paint_scene;
pub use editing::{
    CaptureChange, Handled, InputEvent, InputValue, Interaction, InteractionData, Key, Modifiers,
    OrientedRect, PointerButton, PointerEvent, SceneState, Tool, ViewPort,
};
pub use error::{GeneratorError, InteractionError};
pub use generator::{GeneratedWaypoint, GeneratorBackend, PluginInstance, PluginManifest};
pub use model::{MapInfo, Node, NodeId, NodeKind, NodeTree, NodeUpdate, Transform};
pub use settings::CanvasSettings;

/// Install a tracing subscriber controlled by `RUST_LOG`.
///
/// Defaults to `info` for this crate. Does nothing if a global
/// subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("waypoint_scene=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
