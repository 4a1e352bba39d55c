// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced to the host.
//!
//! Tree, viewport, and geometry operations never fail; invalid ids are
//! ignored and degenerate numbers are clamped. Only generator runs and
//! slot edits can report an error.

use crate::model::NodeId;
use thiserror::Error;

/// Failure to run or commit a generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("no generator is active")]
    NoActiveGenerator,

    #[error("node {0} is not a generator")]
    NotAGenerator(NodeId),

    #[error("this plugin requires selecting waypoint(s) on the canvas first")]
    SelectionRequired,

    #[error("generator '{plugin_id}' failed: {message}")]
    Backend { plugin_id: String, message: String },

    #[error("generator '{0}' returned 0 waypoints")]
    EmptyResult(String),

    #[error("failed to build generator context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Rejected edit of generator scratch data
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InteractionError {
    #[error("no generator is active")]
    NoActiveGenerator,

    #[error("input slot '{0}' is not declared by the active generator")]
    UnknownSlot(String),

    #[error("input slot '{slot}' expects a {expected} value")]
    SlotTypeMismatch { slot: String, expected: &'static str },

    #[error("input index {0} is out of range")]
    IndexOutOfRange(usize),
}
