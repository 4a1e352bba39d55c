// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene state - everything the canvas reads and mutates

mod generator;
mod hit_testing;
mod pointer;

pub use pointer::{CaptureChange, Handled};

use super::input::Key;
use super::interaction::{Interaction, Tool};
use super::interaction_data::{InputValue, InteractionData};
use super::viewport::ViewPort;
use crate::error::InteractionError;
use crate::generator::{InputKind, PluginInstance, PluginManifest};
use crate::model::{
    LayerId, MapInfo, MapLayers, Node, NodeId, NodeTree, NodeUpdate, OptionsSchema,
};
use crate::settings::CanvasSettings;
use kurbo::{Rect, Size};
use peniko::ImageData;

/// The scene behind one map canvas.
///
/// Owns the node tree, the view, the map layer stack, and generator
/// scratch data, along with the tool and the in-progress gesture. Hosts
/// feed it input with [`SceneState::handle_event`] and call the
/// operations below; the renderer only reads it.
#[derive(Debug, Clone)]
pub struct SceneState {
    tree: NodeTree,
    viewport: ViewPort,
    layers: MapLayers,
    scratch: InteractionData,
    settings: CanvasSettings,
    options_schema: OptionsSchema,

    tool: Tool,
    /// Plugin whose inputs the generator tool collects
    generator: Option<PluginInstance>,
    /// Index into the active generator's inputs
    active_input: usize,

    interaction: Interaction,
    captured_pointer: Option<u64>,
    /// A select-tool press on empty canvas is waiting for its release
    idle_press: bool,
}

impl SceneState {
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            tree: NodeTree::new(),
            viewport: ViewPort::new(&settings),
            layers: MapLayers::new(),
            scratch: InteractionData::new(),
            settings,
            options_schema: OptionsSchema::default(),
            tool: Tool::default(),
            generator: None,
            active_input: 0,
            interaction: Interaction::Idle,
            captured_pointer: None,
            idle_press: false,
        }
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn viewport(&self) -> &ViewPort {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewPort {
        &mut self.viewport
    }

    pub fn layers(&self) -> &MapLayers {
        &self.layers
    }

    /// Layer stack, for `update`/`remove`/`reorder`
    pub fn layers_mut(&mut self) -> &mut MapLayers {
        &mut self.layers
    }

    pub fn scratch(&self) -> &InteractionData {
        &self.scratch
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn options_schema(&self) -> &OptionsSchema {
        &self.options_schema
    }

    pub fn set_options_schema(&mut self, schema: OptionsSchema) {
        self.options_schema = schema;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn captured_pointer(&self) -> Option<u64> {
        self.captured_pointer
    }

    pub fn active_generator(&self) -> Option<&PluginInstance> {
        self.generator.as_ref()
    }

    pub fn active_input_index(&self) -> usize {
        self.active_input
    }

    fn manifest(&self) -> Option<&PluginManifest> {
        self.generator.as_ref().map(|g| &g.manifest)
    }

    /// Slot and kind of the active generator input
    pub fn active_input(&self) -> Option<(&str, InputKind)> {
        let input = self.manifest()?.inputs.get(self.active_input)?;
        Some((input.slot(), input.kind))
    }

    // ========================================================================
    // NODE TREE
    // ========================================================================

    pub fn add_node(&mut self, node: Node, parent: Option<NodeId>) {
        self.tree.add_node(node, parent);
    }

    pub fn update_node(&mut self, id: NodeId, update: NodeUpdate) {
        self.tree.update_node(id, update);
    }

    /// Remove `ids` and their generator descendants.
    ///
    /// A drag on a removed node ends immediately; the pointer capture is
    /// handed back on the next pointer-up.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) {
        self.tree.remove_nodes(ids);
        if let Interaction::DragNode { node } | Interaction::SetYaw { node } = self.interaction
            && !self.tree.contains(node)
        {
            self.interaction = Interaction::Idle;
        }
    }

    pub fn reorder_root(&mut self, from: usize, to: usize) {
        self.tree.reorder_root(from, to);
    }

    pub fn select_nodes(&mut self, ids: &[NodeId], additive: bool) {
        self.tree.select_nodes(ids, additive);
    }

    /// Remove every selected node (and, for generators, their children)
    pub fn delete_selection(&mut self) {
        let ids: Vec<NodeId> = self.tree.selection().iter().copied().collect();
        if !ids.is_empty() {
            tracing::info!("Deleting {} selected node(s)", ids.len());
            self.remove_nodes(&ids);
        }
    }

    // ========================================================================
    // MAP LAYERS AND FRAMING
    // ========================================================================

    /// Add a map on top of the stack at the configured default opacity
    pub fn add_map_layer(
        &mut self,
        name: impl Into<String>,
        info: MapInfo,
        image: Option<ImageData>,
    ) -> LayerId {
        let opacity = self.settings.default_map_opacity;
        self.layers.add(name, info, image, opacity)
    }

    /// World boxes of all layer footprints and every waypoint position
    pub fn content_bounds(&self) -> Vec<Rect> {
        let mut boxes = self.layers.footprints();
        boxes.extend(
            self.tree
                .manual_nodes()
                .map(|(_, t)| t.position())
                .filter(|p| p.is_finite())
                .map(|p| Rect::from_points(p, p)),
        );
        boxes
    }

    /// Frame all maps and waypoints in a viewport of `size`
    pub fn fit_to_content(&mut self, size: Size) {
        let boxes = self.content_bounds();
        self.viewport.fit_to_content(&boxes, size, &self.settings);
    }

    // ========================================================================
    // TOOLS AND GENERATOR INPUTS
    // ========================================================================

    /// Switch tools, cancelling any gesture in progress.
    ///
    /// Leaving the generator tool discards its scratch data.
    pub fn set_tool(&mut self, tool: Tool) -> Handled {
        let handled = self.cancel_interaction();
        if self.tool == Tool::Generator && tool != Tool::Generator {
            self.clear_scratch();
        }
        if self.tool != tool {
            tracing::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
        handled.redraw()
    }

    /// Make `plugin` the active generator and switch to the generator
    /// tool. Scratch data from any previous generator is discarded.
    pub fn activate_generator(&mut self, plugin: PluginInstance) -> Handled {
        tracing::info!("Activating generator '{}'", plugin.id);
        let handled = self.set_tool(Tool::Generator);
        self.clear_scratch();
        self.generator = Some(plugin);
        handled
    }

    /// Forget the active generator and return to the select tool
    pub fn deactivate_generator(&mut self) -> Handled {
        let handled = self.set_tool(Tool::Select);
        self.generator = None;
        handled
    }

    /// Choose which generator input the next gesture fills.
    ///
    /// Values already collected for other inputs are kept.
    pub fn set_active_input(&mut self, index: usize) -> Result<(), InteractionError> {
        let manifest = self.manifest().ok_or(InteractionError::NoActiveGenerator)?;
        if index >= manifest.inputs.len() {
            return Err(InteractionError::IndexOutOfRange(index));
        }
        self.active_input = index;
        Ok(())
    }

    /// Set a scratch value directly (e.g. from a numeric form).
    ///
    /// The slot must be declared by the active generator with a matching
    /// kind.
    pub fn set_input_value(&mut self, slot: &str, value: InputValue) -> Result<(), InteractionError> {
        let manifest = self.manifest().ok_or(InteractionError::NoActiveGenerator)?;
        let input = manifest
            .input(slot)
            .ok_or_else(|| InteractionError::UnknownSlot(slot.to_string()))?;
        if !input.kind.is_canvas_input() {
            return Err(InteractionError::SlotTypeMismatch {
                slot: slot.to_string(),
                expected: "canvas",
            });
        }
        let expected = match input.kind {
            InputKind::Rectangle => "rectangle",
            _ => "point",
        };
        let matches = matches!(
            (input.kind, &value),
            (InputKind::Point, InputValue::Point(_))
                | (InputKind::Rectangle, InputValue::Rectangle(_))
        );
        if !matches {
            return Err(InteractionError::SlotTypeMismatch {
                slot: slot.to_string(),
                expected,
            });
        }
        self.scratch.set(slot, value);
        Ok(())
    }

    /// Drop the scratch value for one slot
    pub fn clear_input(&mut self, slot: &str) {
        self.scratch.remove(slot);
    }

    fn clear_scratch(&mut self) {
        self.scratch.clear();
        self.active_input = 0;
    }

    /// After a gesture fills the active input, move to the next input
    /// that has no value yet.
    fn advance_input(&mut self) {
        let Some(manifest) = self.generator.as_ref().map(|g| &g.manifest) else {
            return;
        };
        if manifest.inputs.len() <= 1 {
            return;
        }
        let Some(current) = manifest.inputs.get(self.active_input) else {
            return;
        };
        if !self.scratch.contains(current.slot()) {
            return;
        }
        let next = manifest
            .inputs
            .iter()
            .enumerate()
            .skip(self.active_input + 1)
            .find(|(_, input)| !self.scratch.contains(input.slot()))
            .map(|(i, _)| i);
        if let Some(next) = next {
            tracing::debug!("Advancing to generator input {next}");
            self.active_input = next;
        }
    }

    // ========================================================================
    // CANCELLATION
    // ========================================================================

    /// Return to idle and release the pointer without touching the tree
    fn cancel_interaction(&mut self) -> Handled {
        self.idle_press = false;
        let was_active = !self.interaction.is_idle();
        self.interaction = Interaction::Idle;
        let handled = match self.captured_pointer.take() {
            Some(id) => Handled::release(id),
            None => Handled::default(),
        };
        if was_active { handled.redraw() } else { handled }
    }

    fn handle_key(&mut self, key: Key) -> Handled {
        match key {
            Key::Escape => {
                let mut handled = self.cancel_interaction();
                if self.tool == Tool::Generator && !self.scratch.is_empty() {
                    tracing::debug!("Escape: clearing generator inputs");
                    self.clear_scratch();
                    handled = handled.redraw();
                }
                handled
            }
            Key::Delete | Key::Backspace => {
                if self.tool.is_select_capable()
                    && self.interaction.is_idle()
                    && !self.tree.selection().is_empty()
                {
                    self.delete_selection();
                    Handled::default().redraw()
                } else {
                    Handled::default()
                }
            }
            Key::Other => Handled::default(),
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}
