// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Raster map layers and their world placement.
//!
//! Image decoding happens outside this crate; a layer carries the
//! already-decoded RGBA pixels as `peniko::ImageData` plus the placement
//! metadata from the map's YAML sidecar.

use super::node_id::LayerId;
use kurbo::{Affine, Rect};
use peniko::ImageData;
use serde::{Deserialize, Serialize};

/// Placement metadata for a raster map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    /// Meters per pixel
    pub resolution: f64,
    /// World pose of the image's bottom-left pixel: `[x, y, yaw]`
    pub origin: [f64; 3],
    /// Size in pixels
    pub width: u32,
    pub height: u32,
}

impl MapInfo {
    /// Image pixel space (Y down, origin top-left) to world space.
    pub fn image_to_world(&self) -> Affine {
        let [ox, oy, yaw] = self.origin;
        let res = self.resolution;
        let flip = Affine::new([res, 0.0, 0.0, -res, 0.0, f64::from(self.height) * res]);
        Affine::translate((ox, oy)) * Affine::rotate(yaw) * flip
    }

    /// Axis-aligned world bounding box of the (possibly rotated) image.
    ///
    /// `None` for maps whose metadata is non-finite or empty.
    pub fn footprint(&self) -> Option<Rect> {
        if self.width == 0 || self.height == 0 || !self.resolution.is_finite() {
            return None;
        }
        let pixels = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        let bbox = self.image_to_world().transform_rect_bbox(pixels);
        bbox.is_finite().then_some(bbox)
    }
}

/// One map in the layer stack
#[derive(Debug, Clone)]
pub struct MapLayer {
    pub id: LayerId,
    pub name: String,
    pub info: MapInfo,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub opacity: f64,
    pub visible: bool,
    /// Higher draws on top
    pub z_index: usize,
    /// Decoded pixels. `None` until the host has loaded the image.
    pub image: Option<ImageData>,
}

/// Partial update for a map layer
#[derive(Debug, Clone, Default)]
pub struct MapLayerUpdate {
    pub name: Option<String>,
    pub info: Option<MapInfo>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub image: Option<ImageData>,
}

/// Ordered stack of map layers. Index 0 is the top-most layer.
#[derive(Debug, Clone, Default)]
pub struct MapLayers {
    layers: Vec<MapLayer>,
}

impl MapLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Top-most first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MapLayer> {
        self.layers.iter()
    }

    pub fn get(&self, id: LayerId) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Push a new visible layer on top of the stack.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        info: MapInfo,
        image: Option<ImageData>,
        opacity: f64,
    ) -> LayerId {
        let layer = MapLayer {
            id: LayerId::new(),
            name: name.into(),
            info,
            opacity: clamp_opacity(opacity),
            visible: true,
            z_index: 0,
            image,
        };
        let id = layer.id;
        tracing::info!("Added map layer '{}'", layer.name);
        self.layers.insert(0, layer);
        self.renumber();
        id
    }

    /// Apply a partial update. Unknown ids are ignored.
    pub fn update(&mut self, id: LayerId, update: MapLayerUpdate) {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return;
        };
        if let Some(name) = update.name {
            layer.name = name;
        }
        if let Some(info) = update.info {
            layer.info = info;
        }
        if let Some(opacity) = update.opacity {
            layer.opacity = clamp_opacity(opacity);
        }
        if let Some(visible) = update.visible {
            layer.visible = visible;
        }
        if let Some(image) = update.image {
            layer.image = Some(image);
        }
    }

    pub fn remove(&mut self, id: LayerId) {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        if self.layers.len() != before {
            self.renumber();
        }
    }

    /// Move the layer at `from` to `to`. Out of range is a no-op.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.layers.len() || to >= self.layers.len() || from == to {
            return;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.renumber();
    }

    /// World bounding boxes of every layer with valid metadata
    pub fn footprints(&self) -> Vec<Rect> {
        self.layers
            .iter()
            .filter_map(|l| l.info.footprint())
            .collect()
    }

    fn renumber(&mut self) {
        let count = self.layers.len();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.z_index = count - 1 - i;
        }
    }
}

fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use std::f64::consts::FRAC_PI_2;

    fn info(origin: [f64; 3]) -> MapInfo {
        MapInfo {
            resolution: 0.05,
            origin,
            width: 200,
            height: 100,
        }
    }

    #[test]
    fn image_corners_land_in_world() {
        let info = info([-5.0, -2.0, 0.0]);
        let to_world = info.image_to_world();
        // Bottom-left pixel is the origin
        let bl = to_world * Point::new(0.0, 100.0);
        assert!((bl - Point::new(-5.0, -2.0)).hypot() < 1e-9);
        // Top-right is origin + (w, h) * res
        let tr = to_world * Point::new(200.0, 0.0);
        assert!((tr - Point::new(5.0, 3.0)).hypot() < 1e-9);
    }

    #[test]
    fn rotated_footprint() {
        let rect = info([0.0, 0.0, FRAC_PI_2]).footprint().unwrap();
        // 10 m wide, 5 m tall map turned a quarter: spans x in [-5, 0], y in [0, 10]
        assert!((rect.x0 + 5.0).abs() < 1e-9);
        assert!(rect.x1.abs() < 1e-9);
        assert!(rect.y0.abs() < 1e-9);
        assert!((rect.y1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_map_has_no_footprint() {
        let mut i = info([0.0, 0.0, 0.0]);
        i.width = 0;
        assert!(i.footprint().is_none());
    }

    #[test]
    fn new_layers_go_on_top() {
        let mut layers = MapLayers::new();
        let a = layers.add("a", info([0.0; 3]), None, 0.5);
        let b = layers.add("b", info([0.0; 3]), None, 0.5);
        let order: Vec<LayerId> = layers.iter().map(|l| l.id).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(layers.get(b).unwrap().z_index, 1);
        assert_eq!(layers.get(a).unwrap().z_index, 0);
    }

    #[test]
    fn reorder_renumbers() {
        let mut layers = MapLayers::new();
        let a = layers.add("a", info([0.0; 3]), None, 0.5);
        let b = layers.add("b", info([0.0; 3]), None, 0.5);
        let c = layers.add("c", info([0.0; 3]), None, 0.5);

        layers.reorder(0, 2);
        let order: Vec<LayerId> = layers.iter().map(|l| l.id).collect();
        assert_eq!(order, vec![b, a, c]);
        assert_eq!(layers.get(c).unwrap().z_index, 0);

        layers.reorder(0, 5);
        assert_eq!(layers.iter().next().unwrap().id, b);
    }

    #[test]
    fn update_and_remove() {
        let mut layers = MapLayers::new();
        let a = layers.add("a", info([0.0; 3]), None, 0.5);
        layers.update(
            a,
            MapLayerUpdate {
                opacity: Some(3.0),
                visible: Some(false),
                ..Default::default()
            },
        );
        let layer = layers.get(a).unwrap();
        assert_eq!(layer.opacity, 1.0);
        assert!(!layer.visible);

        layers.remove(a);
        assert!(layers.is_empty());
        assert!(layers.footprints().is_empty());
    }
}
