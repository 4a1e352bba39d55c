// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Waypoint data model

pub mod map_layer;
pub mod node;
pub mod node_id;
pub mod options;
pub mod orientation;
pub mod transform;
pub mod tree;

pub use map_layer::{MapInfo, MapLayer, MapLayerUpdate, MapLayers};
pub use node::{Node, NodeKind, NodeUpdate};
pub use node_id::{LayerId, NodeId};
pub use options::{OptionDef, OptionIssue, OptionType, OptionValue, OptionsSchema, WaypointOptions};
pub use orientation::{Quaternion, normalize_yaw, quaternion_from_yaw, yaw_from_quaternion};
pub use transform::Transform;
pub use tree::NodeTree;
