// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection set for tracking which nodes are selected.
//!
//! `Selection` wraps an `Arc<BTreeSet<NodeId>>` so it can be cheaply
//! cloned into render snapshots. Mutations copy on write via
//! `Arc::make_mut`. The `BTreeSet` gives deterministic iteration order.

use crate::model::NodeId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A set of selected nodes (manual or generator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    inner: Arc<BTreeSet<NodeId>>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BTreeSet::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.inner.iter()
    }

    pub fn insert(&mut self, id: NodeId) {
        Arc::make_mut(&mut self.inner).insert(id);
    }

    pub fn remove(&mut self, id: &NodeId) {
        if self.inner.contains(id) {
            Arc::make_mut(&mut self.inner).remove(id);
        }
    }

    /// Add the id if absent, remove it if present
    pub fn toggle(&mut self, id: NodeId) {
        let set = Arc::make_mut(&mut self.inner);
        if !set.remove(&id) {
            set.insert(id);
        }
    }

    pub fn clear(&mut self) {
        if !self.inner.is_empty() {
            self.inner = Arc::new(BTreeSet::new());
        }
    }

    /// Keep only ids for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&NodeId) -> bool) {
        if self.inner.iter().all(|id| keep(id)) {
            return;
        }
        Arc::make_mut(&mut self.inner).retain(|id| keep(id));
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}
