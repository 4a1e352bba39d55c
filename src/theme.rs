// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Theme colors and constants
//!
//! All colors use hexadecimal format: Color::from_rgb8(0xRR, 0xGG, 0xBB)

use masonry::vello::peniko::Color;

// ============================================================================
// CANVAS BACKGROUND
// ============================================================================
const CANVAS_BACKGROUND: Color = Color::from_rgb8(0x0f, 0x17, 0x2a);

// ============================================================================
// GRID AND AXES
// ============================================================================
const GRID_LINE: Color = Color::from_rgba8(0x33, 0x41, 0x55, 0x99);
const AXIS_X: Color = Color::from_rgb8(0xef, 0x44, 0x44);
const AXIS_Y: Color = Color::from_rgb8(0x22, 0xc5, 0x5e);

// ============================================================================
// WAYPOINT MARKERS
// ============================================================================
const MARKER_FILL: Color = Color::from_rgb8(0xff, 0xd7, 0x00);
const MARKER_STROKE: Color = Color::from_rgb8(0xff, 0xa5, 0x00);

// Selected markers - BLUE
const MARKER_SELECTED_FILL: Color = Color::from_rgb8(0x60, 0xa5, 0xfa);
const MARKER_SELECTED_STROKE: Color = Color::from_rgb8(0x3b, 0x82, 0xf6);

// Line joining waypoints in path order
const PATH_LINE: Color = Color::from_rgba8(0x94, 0xa3, 0xb8, 0x99);

// ============================================================================
// GENERATOR INPUT PREVIEWS
// ============================================================================
const PREVIEW_STROKE: Color = Color::from_rgb8(0xa7, 0x8b, 0xfa);
const PREVIEW_FILL: Color = Color::from_rgba8(0xa7, 0x8b, 0xfa, 0x26);
const PREVIEW_HANDLE_FILL: Color = Color::from_rgb8(0xf8, 0xfa, 0xfc);

// ============================================================================
// PUBLIC API
// ============================================================================

/// Canvas background
pub mod canvas {
    use super::Color;
    pub const BACKGROUND: Color = super::CANVAS_BACKGROUND;
}

/// Metric grid and origin axes
pub mod grid {
    use super::Color;
    pub const LINE: Color = super::GRID_LINE;
    pub const AXIS_X: Color = super::AXIS_X;
    pub const AXIS_Y: Color = super::AXIS_Y;
}

/// Waypoint marker colors
pub mod marker {
    use super::Color;
    pub const FILL: Color = super::MARKER_FILL;
    pub const STROKE: Color = super::MARKER_STROKE;
    pub const SELECTED_FILL: Color = super::MARKER_SELECTED_FILL;
    pub const SELECTED_STROKE: Color = super::MARKER_SELECTED_STROKE;
}

/// Path line between waypoints
pub mod path {
    use super::Color;
    pub const LINE: Color = super::PATH_LINE;
}

/// Scratch input previews (points and rectangles being collected)
pub mod preview {
    use super::Color;
    pub const STROKE: Color = super::PREVIEW_STROKE;
    pub const FILL: Color = super::PREVIEW_FILL;
    pub const HANDLE_FILL: Color = super::PREVIEW_HANDLE_FILL;
    /// Dash pattern for rectangle outlines [dash_length, gap_length]
    pub const LINE_DASH: [f64; 2] = [6.0, 4.0];
}

/// Sizes for rendering, in screen pixels
pub mod size {
    /// Length of the waypoint arrow from tail to tip
    pub const MARKER_LENGTH: f64 = 18.0;
    /// Half-width of the arrow at its base
    pub const MARKER_HALF_WIDTH: f64 = 7.0;
    /// Outline width of waypoint markers
    pub const MARKER_STROKE_WIDTH: f64 = 1.5;

    /// Length of each origin axis
    pub const AXIS_LENGTH: f64 = 50.0;
    pub const AXIS_WIDTH: f64 = 2.0;

    pub const GRID_LINE_WIDTH: f64 = 1.0;
    /// Grid lines are never closer than this
    pub const GRID_MIN_SPACING: f64 = 40.0;

    pub const PATH_LINE_WIDTH: f64 = 1.5;

    pub const PREVIEW_LINE_WIDTH: f64 = 1.5;
    /// Radius of rectangle corner and rotation handles
    pub const HANDLE_RADIUS: f64 = 5.0;
}
