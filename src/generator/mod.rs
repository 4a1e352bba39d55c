// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Generator plugins: manifests and the execution seam

pub mod backend;
pub mod manifest;

pub use backend::{GeneratedWaypoint, GeneratorBackend};
pub use manifest::{InputKind, PluginInputDef, PluginInstance, PluginManifest};
