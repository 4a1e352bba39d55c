// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Canvas settings and configuration constants.
//!
//! The constants below are the defaults. `CanvasSettings` carries the
//! runtime values and can be loaded from a TOML file; any key left out
//! of the file falls back to the constant of the same name. Visual
//! styling (colors, stroke widths) belongs in `theme.rs`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// ZOOM SETTINGS
// ============================================================================
/// Smallest allowed scale (pixels per meter)
const MIN_SCALE: f64 = 0.01;

/// Largest allowed scale (pixels per meter)
const MAX_SCALE: f64 = 500.0;

/// Scale used before anything has been framed
const INITIAL_SCALE: f64 = 20.0;

/// Zoom factor per wheel delta unit: `factor = -delta_y * sensitivity`
const WHEEL_SENSITIVITY: f64 = 0.001;

// ============================================================================
// FIT-TO-CONTENT SETTINGS
// ============================================================================
/// Padding added around the content box, as a fraction of its size
const FIT_PADDING_RATIO: f64 = 0.1;

/// Minimum padding on each axis (meters)
const FIT_MIN_PADDING: f64 = 1.0;

/// Fraction of the viewport the padded content box may occupy
const FIT_VIEWPORT_FILL: f64 = 0.9;

// ============================================================================
// HANDLE SETTINGS
// ============================================================================
/// Grab radius for rectangle corner and rotation handles (screen pixels)
const HANDLE_HIT_RADIUS: f64 = 10.0;

/// Distance of the rotation handle beyond the rectangle edge (screen pixels)
const ROTATION_HANDLE_OFFSET: f64 = 30.0;

/// Grab radius for waypoint markers (screen pixels)
const NODE_HIT_RADIUS: f64 = 10.0;

// ============================================================================
// INTERACTION SETTINGS
// ============================================================================
/// Pointer must be at least this far from the pivot (meters) before a
/// yaw is derived from the drag vector.
const MIN_YAW_DRAG_DISTANCE: f64 = 0.1;

// ============================================================================
// DISPLAY SETTINGS
// ============================================================================
/// Opacity given to newly added map layers
const DEFAULT_MAP_OPACITY: f64 = 0.5;

/// Draw the metric grid and origin axes
const SHOW_GRID: bool = true;

/// Draw the line connecting waypoints in path order
const SHOW_PATHS: bool = true;

/// First index shown in waypoint labels (0 or 1)
const INDEX_START: u32 = 0;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Zoom limits and wheel response
pub mod zoom {
    pub const MIN_SCALE: f64 = super::MIN_SCALE;
    pub const MAX_SCALE: f64 = super::MAX_SCALE;
    pub const INITIAL_SCALE: f64 = super::INITIAL_SCALE;
    pub const WHEEL_SENSITIVITY: f64 = super::WHEEL_SENSITIVITY;
}

/// Fit-to-content framing
pub mod fit {
    pub const PADDING_RATIO: f64 = super::FIT_PADDING_RATIO;
    pub const MIN_PADDING: f64 = super::FIT_MIN_PADDING;
    pub const VIEWPORT_FILL: f64 = super::FIT_VIEWPORT_FILL;
}

/// Handle sizes, all in screen pixels
pub mod handles {
    pub const HIT_RADIUS: f64 = super::HANDLE_HIT_RADIUS;
    pub const ROTATION_OFFSET: f64 = super::ROTATION_HANDLE_OFFSET;
    pub const NODE_HIT_RADIUS: f64 = super::NODE_HIT_RADIUS;
}

/// Pointer interaction thresholds
pub mod interaction {
    pub const MIN_YAW_DRAG_DISTANCE: f64 = super::MIN_YAW_DRAG_DISTANCE;
}

/// Display toggles and defaults
pub mod display {
    pub const DEFAULT_MAP_OPACITY: f64 = super::DEFAULT_MAP_OPACITY;
    pub const SHOW_GRID: bool = super::SHOW_GRID;
    pub const SHOW_PATHS: bool = super::SHOW_PATHS;
    pub const INDEX_START: u32 = super::INDEX_START;
}

// ============================================================================
// RUNTIME SETTINGS
// ============================================================================

/// Runtime canvas configuration.
///
/// Every field defaults to the matching constant, so a TOML file only
/// needs the keys it wants to change:
///
/// ```toml
/// max_scale = 200.0
/// show_grid = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_scale: f64,
    pub wheel_sensitivity: f64,
    pub fit_padding_ratio: f64,
    pub fit_min_padding: f64,
    pub fit_viewport_fill: f64,
    pub handle_hit_radius: f64,
    pub rotation_handle_offset: f64,
    pub node_hit_radius: f64,
    pub min_yaw_drag_distance: f64,
    pub default_map_opacity: f64,
    pub show_grid: bool,
    pub show_paths: bool,
    pub index_start: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            min_scale: zoom::MIN_SCALE,
            max_scale: zoom::MAX_SCALE,
            initial_scale: zoom::INITIAL_SCALE,
            wheel_sensitivity: zoom::WHEEL_SENSITIVITY,
            fit_padding_ratio: fit::PADDING_RATIO,
            fit_min_padding: fit::MIN_PADDING,
            fit_viewport_fill: fit::VIEWPORT_FILL,
            handle_hit_radius: handles::HIT_RADIUS,
            rotation_handle_offset: handles::ROTATION_OFFSET,
            node_hit_radius: handles::NODE_HIT_RADIUS,
            min_yaw_drag_distance: interaction::MIN_YAW_DRAG_DISTANCE,
            default_map_opacity: display::DEFAULT_MAP_OPACITY,
            show_grid: display::SHOW_GRID,
            show_paths: display::SHOW_PATHS,
            index_start: display::INDEX_START,
        }
    }
}

impl CanvasSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("Failed to parse canvas settings")?;
        Ok(settings.sanitized())
    }

    /// Load settings from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading canvas settings from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// Repair values that would break the transform chain.
    ///
    /// Non-positive or non-finite scale limits fall back to the
    /// defaults, and an inverted range is swapped.
    fn sanitized(mut self) -> Self {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            tracing::warn!("Ignoring invalid min_scale {}", self.min_scale);
            self.min_scale = zoom::MIN_SCALE;
        }
        if !(self.max_scale.is_finite() && self.max_scale > 0.0) {
            tracing::warn!("Ignoring invalid max_scale {}", self.max_scale);
            self.max_scale = zoom::MAX_SCALE;
        }
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.default_map_opacity = self.default_map_opacity.clamp(0.0, 1.0);
        self.index_start = self.index_start.min(1);
        self
    }

    /// Clamp a scale into the configured range, flooring non-finite
    /// values at the minimum.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        clamp_scale(scale, self.min_scale, self.max_scale)
    }
}

/// Clamp `scale` into `[min, max]`; non-finite values become `min`.
pub(crate) fn clamp_scale(scale: f64, min: f64, max: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(min, max)
    } else {
        min
    }
}
