// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Waypoint nodes: hand-placed manual nodes and generator nodes that own
//! an ordered batch of produced children.

use super::node_id::NodeId;
use super::options::WaypointOptions;
use super::transform::Transform;
use serde::{Deserialize, Serialize};

/// A node in the waypoint tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// The two node variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// A waypoint with its own pose
    Manual {
        transform: Transform,
        #[serde(default)]
        options: WaypointOptions,
    },
    /// One invocation of a generator plugin. Children are always manual
    /// nodes, stored by id in the tree's node table.
    Generator {
        plugin_id: String,
        /// The context payload the plugin was last run with
        #[serde(rename = "generator_params", default)]
        params: serde_json::Value,
        #[serde(rename = "children_ids", default)]
        children: Vec<NodeId>,
    },
}

impl Node {
    /// A new manual node with a fresh id
    pub fn manual(transform: Transform) -> Self {
        Self {
            id: NodeId::new(),
            kind: NodeKind::Manual {
                transform,
                options: WaypointOptions::new(),
            },
        }
    }

    /// A new manual node carrying options
    pub fn manual_with_options(transform: Transform, options: WaypointOptions) -> Self {
        Self {
            id: NodeId::new(),
            kind: NodeKind::Manual { transform, options },
        }
    }

    /// A new, childless generator node with a fresh id
    pub fn generator(plugin_id: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            id: NodeId::new(),
            kind: NodeKind::Generator {
                plugin_id: plugin_id.into(),
                params,
                children: Vec::new(),
            },
        }
    }

    pub fn is_generator(&self) -> bool {
        matches!(self.kind, NodeKind::Generator { .. })
    }

    /// The pose of a manual node; generators have none
    pub fn transform(&self) -> Option<&Transform> {
        match &self.kind {
            NodeKind::Manual { transform, .. } => Some(transform),
            NodeKind::Generator { .. } => None,
        }
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        match &mut self.kind {
            NodeKind::Manual { transform, .. } => Some(transform),
            NodeKind::Generator { .. } => None,
        }
    }

    pub fn options(&self) -> Option<&WaypointOptions> {
        match &self.kind {
            NodeKind::Manual { options, .. } => Some(options),
            NodeKind::Generator { .. } => None,
        }
    }

    /// Child ids in order; empty for manual nodes
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Manual { .. } => &[],
            NodeKind::Generator { children, .. } => children,
        }
    }

    /// Apply a partial update. Fields that do not exist on this variant
    /// are ignored.
    pub fn apply(&mut self, update: NodeUpdate) {
        match &mut self.kind {
            NodeKind::Manual { transform, options } => {
                if let Some(t) = update.transform {
                    *transform = t;
                }
                if let Some(o) = update.options {
                    *options = o;
                }
            }
            NodeKind::Generator {
                plugin_id, params, ..
            } => {
                if let Some(p) = update.plugin_id {
                    *plugin_id = p;
                }
                if let Some(p) = update.params {
                    *params = p;
                }
            }
        }
    }
}

/// A shallow partial update for `NodeTree::update_node`.
///
/// Child lists are not part of an update; they change only through
/// `add_node`, `remove_nodes`, and `replace_children`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub transform: Option<Transform>,
    pub options: Option<WaypointOptions>,
    pub plugin_id: Option<String>,
    pub params: Option<serde_json::Value>,
}

impl NodeUpdate {
    pub fn transform(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }

    pub fn options(options: WaypointOptions) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }

    pub fn params(params: serde_json::Value) -> Self {
        Self {
            params: Some(params),
            ..Self::default()
        }
    }
}
