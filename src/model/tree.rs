// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! The waypoint node tree.
//!
//! Nodes live in one flat table keyed by id. Top-level order is kept in
//! `root`; a generator keeps its children as an id list. There are no
//! back-pointers from child to parent, so removal is a plain tree walk.

use super::node::{Node, NodeKind, NodeUpdate};
use super::node_id::NodeId;
use super::transform::Transform;
use crate::editing::selection::Selection;
use std::collections::{HashMap, HashSet};

/// Owns every node, the root order, and the current selection
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: HashMap<NodeId, Node>,
    root: Vec<NodeId>,
    selection: Selection,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Top-level ids in path/export order
    pub fn root_order(&self) -> &[NodeId] {
        &self.root
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Add a node at the end of the root order, or at the end of a
    /// generator's child list when `parent` is given.
    ///
    /// A `parent` that exists but is not a generator puts the node at the
    /// end of the root order instead. A missing `parent` makes this a
    /// no-op, as does a node whose id is already in the tree.
    pub fn add_node(&mut self, node: Node, parent: Option<NodeId>) {
        if self.nodes.contains_key(&node.id) {
            tracing::debug!("add_node: {} already present", node.id);
            return;
        }
        let id = node.id;
        match parent {
            None => self.root.push(id),
            Some(parent_id) => match self.nodes.get_mut(&parent_id).map(|p| &mut p.kind) {
                Some(NodeKind::Generator { children, .. }) => children.push(id),
                Some(NodeKind::Manual { .. }) => {
                    tracing::debug!("add_node: parent {parent_id} is manual, using root");
                    self.root.push(id);
                }
                None => {
                    tracing::debug!("add_node: parent {parent_id} not found");
                    return;
                }
            },
        }
        self.nodes.insert(id, node);
    }

    /// Shallow-merge `update` into the node. Unknown ids are ignored.
    pub fn update_node(&mut self, id: NodeId, update: NodeUpdate) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.apply(update);
        }
    }

    /// Set a manual node's transform, keeping everything else.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        if let Some(t) = self.nodes.get_mut(&id).and_then(Node::transform_mut) {
            *t = transform;
        }
    }

    /// Remove `ids` and all their descendants.
    ///
    /// Removed ids are stripped from every child list, the root order,
    /// and the selection. Unknown ids are ignored.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) {
        let doomed = self.descendants_of(ids);
        if doomed.is_empty() {
            return;
        }

        for id in &doomed {
            self.nodes.remove(id);
        }
        for node in self.nodes.values_mut() {
            if let NodeKind::Generator { children, .. } = &mut node.kind {
                children.retain(|id| !doomed.contains(id));
            }
        }
        self.root.retain(|id| !doomed.contains(id));
        self.selection.retain(|id| !doomed.contains(id));
        tracing::debug!("Removed {} node(s)", doomed.len());
    }

    /// The existing ids in `ids` plus everything reachable through
    /// child lists, at any depth.
    fn descendants_of(&self, ids: &[NodeId]) -> HashSet<NodeId> {
        let mut found = HashSet::new();
        let mut stack: Vec<NodeId> = ids.to_vec();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if found.insert(id) {
                stack.extend(node.children().iter().copied());
            }
        }
        found
    }

    /// Move one root entry from `from` to `to`. Out of range is a no-op.
    pub fn reorder_root(&mut self, from: usize, to: usize) {
        if from >= self.root.len() || to >= self.root.len() || from == to {
            return;
        }
        let id = self.root.remove(from);
        self.root.insert(to, id);
    }

    /// Replace the selection with `ids`, or toggle each id when
    /// `additive`. Ids not in the tree are skipped.
    pub fn select_nodes(&mut self, ids: &[NodeId], additive: bool) {
        if !additive {
            self.selection.clear();
        }
        for &id in ids {
            if !self.nodes.contains_key(&id) {
                continue;
            }
            if additive {
                self.selection.toggle(id);
            } else {
                self.selection.insert(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Swap a generator's children for `children` and store `params`.
    ///
    /// Old children are removed (and purged from the selection) and the
    /// new ones inserted in a single call, so no caller ever sees a
    /// half-replaced batch. Returns false when `generator` is not a
    /// generator node, leaving the tree untouched.
    pub fn replace_children(
        &mut self,
        generator: NodeId,
        children: Vec<Node>,
        params: serde_json::Value,
    ) -> bool {
        let old = match self.nodes.get(&generator) {
            Some(node) if node.is_generator() => node.children().to_vec(),
            _ => return false,
        };
        self.remove_nodes(&old);

        let ids: Vec<NodeId> = children.iter().map(|c| c.id).collect();
        if let Some(NodeKind::Generator {
            children: child_ids,
            params: stored,
            ..
        }) = self.nodes.get_mut(&generator).map(|n| &mut n.kind)
        {
            *child_ids = ids;
            *stored = params;
        }
        for child in children {
            self.nodes.insert(child.id, child);
        }
        true
    }

    /// Manual nodes in path order: root entries with each generator
    /// expanded into its children.
    pub fn flatten_waypoints(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for id in &self.root {
            self.collect_manual(*id, &mut out);
        }
        out
    }

    fn collect_manual<'a>(&'a self, id: NodeId, out: &mut Vec<&'a Node>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match &node.kind {
            NodeKind::Manual { .. } => out.push(node),
            NodeKind::Generator { children, .. } => {
                for child in children {
                    self.collect_manual(*child, out);
                }
            }
        }
    }

    /// Every manual node with its transform, in no particular order
    pub fn manual_nodes(&self) -> impl Iterator<Item = (NodeId, &Transform)> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| node.transform().map(|t| (*id, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(x: f64, y: f64) -> Node {
        Node::manual(Transform::at(x, y))
    }

    fn generator_with_children(tree: &mut NodeTree, count: usize) -> (NodeId, Vec<NodeId>) {
        let generator = Node::generator("sweep", serde_json::Value::Null);
        let gid = generator.id;
        tree.add_node(generator, None);
        let children: Vec<NodeId> = (0..count)
            .map(|i| {
                let child = manual(i as f64, 0.0);
                let id = child.id;
                tree.add_node(child, Some(gid));
                id
            })
            .collect();
        (gid, children)
    }

    #[test]
    fn add_to_missing_parent_is_noop() {
        let mut tree = NodeTree::new();
        tree.add_node(manual(0.0, 0.0), Some(NodeId::new()));
        assert!(tree.is_empty());
        assert!(tree.root_order().is_empty());
    }

    #[test]
    fn add_under_manual_parent_goes_to_root() {
        let mut tree = NodeTree::new();
        let parent = manual(0.0, 0.0);
        let pid = parent.id;
        tree.add_node(parent, None);
        let child = manual(1.0, 1.0);
        let cid = child.id;
        tree.add_node(child, Some(pid));

        assert!(tree.contains(cid));
        assert_eq!(tree.root_order(), &[pid, cid]);
        assert!(tree.get(pid).unwrap().children().is_empty());
    }

    #[test]
    fn cascade_delete_nested_generators() {
        let mut tree = NodeTree::new();
        let outer = Node::generator("outer", serde_json::Value::Null);
        let inner = Node::generator("inner", serde_json::Value::Null);
        let leaf = manual(1.0, 2.0);
        let ids = [outer.id, inner.id, leaf.id];
        tree.add_node(outer, None);
        tree.add_node(inner, Some(ids[0]));
        tree.add_node(leaf, Some(ids[1]));
        assert_eq!(tree.len(), 3);
        tree.select_nodes(&ids, false);

        tree.remove_nodes(&[ids[0]]);

        for id in &ids {
            assert!(!tree.contains(*id));
            assert!(!tree.selection().contains(id));
            assert!(!tree.root_order().contains(id));
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn children_stay_out_of_root_order() {
        let mut tree = NodeTree::new();
        let (gid, children) = generator_with_children(&mut tree, 2);
        assert_eq!(tree.root_order(), &[gid]);
        assert_eq!(tree.get(gid).unwrap().children(), children.as_slice());
    }

    #[test]
    fn cascade_delete() {
        let mut tree = NodeTree::new();
        let (gid, children) = generator_with_children(&mut tree, 3);
        let other = manual(9.0, 9.0);
        let other_id = other.id;
        tree.add_node(other, None);

        let mut all = children.clone();
        all.push(gid);
        tree.select_nodes(&all, false);

        tree.remove_nodes(&[gid]);

        for id in &all {
            assert!(!tree.contains(*id));
            assert!(!tree.selection().contains(id));
            assert!(!tree.root_order().contains(id));
        }
        assert_eq!(tree.root_order(), &[other_id]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut tree = NodeTree::new();
        let node = manual(0.0, 0.0);
        let id = node.id;
        tree.add_node(node, None);
        tree.remove_nodes(&[id, NodeId::new()]);
        tree.remove_nodes(&[id]);
        assert!(tree.is_empty());
    }

    #[test]
    fn removing_a_child_strips_it_from_parent() {
        let mut tree = NodeTree::new();
        let (gid, children) = generator_with_children(&mut tree, 3);
        tree.remove_nodes(&[children[1]]);
        assert_eq!(tree.get(gid).unwrap().children(), &[children[0], children[2]]);
    }

    #[test]
    fn multi_select_toggles() {
        let mut tree = NodeTree::new();
        let a = manual(0.0, 0.0);
        let b = manual(1.0, 0.0);
        let (a, b) = {
            let ids = (a.id, b.id);
            tree.add_node(a, None);
            tree.add_node(b, None);
            ids
        };

        tree.select_nodes(&[a], false);
        tree.select_nodes(&[a, b], true);

        let selected: Vec<NodeId> = tree.selection().iter().copied().collect();
        assert_eq!(selected, vec![b]);
    }

    #[test]
    fn select_skips_unknown_ids() {
        let mut tree = NodeTree::new();
        tree.select_nodes(&[NodeId::new()], true);
        assert!(tree.selection().is_empty());
    }

    #[test]
    fn reorder_root() {
        let mut tree = NodeTree::new();
        let ids: Vec<NodeId> = (0..3)
            .map(|i| {
                let node = manual(i as f64, 0.0);
                let id = node.id;
                tree.add_node(node, None);
                id
            })
            .collect();

        tree.reorder_root(0, 2);
        assert_eq!(tree.root_order(), &[ids[1], ids[2], ids[0]]);

        tree.reorder_root(0, 3);
        tree.reorder_root(7, 0);
        assert_eq!(tree.root_order(), &[ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn regeneration_replaces_all_children() {
        let mut tree = NodeTree::new();
        let (gid, old) = generator_with_children(&mut tree, 2);
        tree.select_nodes(&old, false);

        let fresh: Vec<Node> = (0..5).map(|i| manual(i as f64, 1.0)).collect();
        let fresh_ids: Vec<NodeId> = fresh.iter().map(|n| n.id).collect();
        let params = serde_json::json!({"properties": {"spacing": 2.0}});
        assert!(tree.replace_children(gid, fresh, params.clone()));

        let generator = tree.get(gid).unwrap();
        assert_eq!(generator.children(), fresh_ids.as_slice());
        match &generator.kind {
            NodeKind::Generator { params: stored, .. } => assert_eq!(stored, &params),
            NodeKind::Manual { .. } => panic!("expected generator"),
        }
        for id in &old {
            assert!(!tree.contains(*id));
        }
        assert!(tree.selection().is_empty());
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn replace_children_on_manual_is_rejected() {
        let mut tree = NodeTree::new();
        let node = manual(0.0, 0.0);
        let id = node.id;
        tree.add_node(node, None);
        assert!(!tree.replace_children(id, vec![manual(1.0, 1.0)], serde_json::Value::Null));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn flatten_expands_generators_in_place() {
        let mut tree = NodeTree::new();
        let first = manual(0.0, 0.0);
        let first_id = first.id;
        tree.add_node(first, None);
        let (_, children) = generator_with_children(&mut tree, 2);
        let last = manual(5.0, 5.0);
        let last_id = last.id;
        tree.add_node(last, None);

        let order: Vec<NodeId> = tree.flatten_waypoints().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![first_id, children[0], children[1], last_id]);
    }
}
