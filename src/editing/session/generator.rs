// Copyright 2025 the Waypoint Scene Authors
// SPDX-License-Identifier: Apache-2.0

//! Running generator plugins and committing their output to the tree

use super::SceneState;
use crate::error::GeneratorError;
use crate::generator::{GeneratedWaypoint, GeneratorBackend};
use crate::model::{Node, NodeId, NodeKind, Transform};
use serde_json::{Map, Value};

impl SceneState {
    // ============================================================================
    // CONTEXT
    // ============================================================================

    /// Payload sent to the active generator.
    ///
    /// `interaction_data` holds only the declared input slots that have a
    /// value. `selected_points` is present when the plugin needs a
    /// selection and lists the selected waypoints in path order.
    pub fn generator_context(&self, properties: Value) -> Result<Value, GeneratorError> {
        let plugin = self
            .generator
            .as_ref()
            .ok_or(GeneratorError::NoActiveGenerator)?;
        let manifest = &plugin.manifest;

        let interaction_data = self
            .scratch
            .to_json_filtered(|slot| manifest.input(slot).is_some());

        let mut context = Map::new();
        context.insert("properties".into(), properties);
        context.insert("interaction_data".into(), interaction_data);

        if manifest.needs_selection() {
            let selected = self.selected_transforms();
            if selected.is_empty() {
                return Err(GeneratorError::SelectionRequired);
            }
            context.insert("selected_points".into(), serde_json::to_value(selected)?);
        }
        Ok(Value::Object(context))
    }

    /// Transforms of selected waypoints, in path order
    fn selected_transforms(&self) -> Vec<Transform> {
        let selection = self.tree.selection();
        self.tree
            .flatten_waypoints()
            .into_iter()
            .filter(|node| selection.contains(&node.id))
            .filter_map(|node| node.transform().copied())
            .collect()
    }

    // ============================================================================
    // FIRST RUN
    // ============================================================================

    /// Run the active generator and add its output as a new generator
    /// node. Returns the new node's id.
    ///
    /// On any failure the tree is left as it was.
    pub fn run_generator(
        &mut self,
        backend: &mut dyn GeneratorBackend,
        properties: Value,
    ) -> Result<NodeId, GeneratorError> {
        let context = self.generator_context(properties)?;
        let plugin_id = self
            .generator
            .as_ref()
            .map(|g| g.id.clone())
            .ok_or(GeneratorError::NoActiveGenerator)?;

        tracing::debug!("[run_generator] '{plugin_id}' context: {context}");
        let waypoints = invoke(backend, &plugin_id, &context)?;
        self.commit_generator_result(&plugin_id, context, waypoints)
    }

    /// Add a generator node for `plugin_id` holding `context` as its
    /// parameters, with one manual child per waypoint, and select it.
    pub fn commit_generator_result(
        &mut self,
        plugin_id: &str,
        context: Value,
        waypoints: Vec<GeneratedWaypoint>,
    ) -> Result<NodeId, GeneratorError> {
        if waypoints.is_empty() {
            return Err(GeneratorError::EmptyResult(plugin_id.to_string()));
        }

        let generator = Node::generator(plugin_id, context);
        let id = generator.id;
        self.tree.add_node(generator, None);
        let count = waypoints.len();
        for waypoint in waypoints {
            self.tree.add_node(waypoint.into_node(), Some(id));
        }
        self.tree.select_nodes(&[id], false);

        tracing::info!("Generator '{plugin_id}' produced {count} waypoint(s) under {id}");
        Ok(id)
    }

    // ============================================================================
    // REGENERATION
    // ============================================================================

    /// Re-run the plugin behind an existing generator node with new
    /// `properties`, replacing its children.
    ///
    /// The stored parameters are reused with `properties` swapped in, so
    /// the inputs captured on the first run stay the same.
    pub fn regenerate(
        &mut self,
        backend: &mut dyn GeneratorBackend,
        generator: NodeId,
        properties: Value,
    ) -> Result<(), GeneratorError> {
        let Some(Node {
            kind: NodeKind::Generator {
                plugin_id, params, ..
            },
            ..
        }) = self.tree.get(generator)
        else {
            return Err(GeneratorError::NotAGenerator(generator));
        };
        let plugin_id = plugin_id.clone();

        let mut context = match params {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        context.insert("properties".into(), properties);
        let context = Value::Object(context);

        tracing::debug!("[regenerate] '{plugin_id}' for {generator}");
        let waypoints = invoke(backend, &plugin_id, &context)?;
        self.commit_regeneration(generator, context, waypoints)
    }

    /// Swap a generator's children for `waypoints` and store `params`.
    pub fn commit_regeneration(
        &mut self,
        generator: NodeId,
        params: Value,
        waypoints: Vec<GeneratedWaypoint>,
    ) -> Result<(), GeneratorError> {
        let plugin_id = match self.tree.get(generator) {
            Some(Node {
                kind: NodeKind::Generator { plugin_id, .. },
                ..
            }) => plugin_id.clone(),
            _ => return Err(GeneratorError::NotAGenerator(generator)),
        };
        if waypoints.is_empty() {
            return Err(GeneratorError::EmptyResult(plugin_id));
        }

        let count = waypoints.len();
        let children = waypoints.into_iter().map(GeneratedWaypoint::into_node).collect();
        if !self.tree.replace_children(generator, children, params) {
            return Err(GeneratorError::NotAGenerator(generator));
        }
        tracing::info!("Regenerated {generator} with {count} waypoint(s)");
        Ok(())
    }
}

fn invoke(
    backend: &mut dyn GeneratorBackend,
    plugin_id: &str,
    context: &Value,
) -> Result<Vec<GeneratedWaypoint>, GeneratorError> {
    backend.run_generator(plugin_id, context).map_err(|err| {
        tracing::warn!("Generator '{plugin_id}' failed: {err:#}");
        GeneratorError::Backend {
            plugin_id: plugin_id.to_string(),
            message: format!("{err:#}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::interaction_data::InputValue;
    use crate::editing::oriented_rect::OrientedRect;
    use crate::editing::session::test_support::plugin;
    use crate::model::WaypointOptions;
    use anyhow::{Result, bail};
    use kurbo::Point;
    use serde_json::json;

    /// Returns `count` waypoints along x and records every context
    struct LineBackend {
        count: usize,
        contexts: Vec<Value>,
    }

    impl LineBackend {
        fn new(count: usize) -> Self {
            Self {
                count,
                contexts: Vec::new(),
            }
        }
    }

    impl GeneratorBackend for LineBackend {
        fn run_generator(&mut self, _plugin_id: &str, context: &Value) -> Result<Vec<GeneratedWaypoint>> {
            self.contexts.push(context.clone());
            Ok((0..self.count)
                .map(|i| GeneratedWaypoint {
                    transform: Transform::at(i as f64, 0.0),
                    options: WaypointOptions::new(),
                })
                .collect())
        }
    }

    struct FailingBackend;

    impl GeneratorBackend for FailingBackend {
        fn run_generator(&mut self, _plugin_id: &str, _context: &Value) -> Result<Vec<GeneratedWaypoint>> {
            bail!("exit status 1")
        }
    }

    fn generator_children(scene: &SceneState, id: NodeId) -> Vec<NodeId> {
        scene.tree().get(id).unwrap().children().to_vec()
    }

    #[test]
    fn first_run_creates_selected_generator() {
        let mut scene = SceneState::default();
        scene.activate_generator(plugin(false));
        let mut backend = LineBackend::new(3);

        let id = scene
            .run_generator(&mut backend, json!({"spacing": 1.0}))
            .unwrap();
        let node = scene.tree().get(id).unwrap();
        assert!(node.is_generator());
        assert_eq!(node.children().len(), 3);
        assert_eq!(scene.tree().root_order(), &[id]);
        assert!(scene.tree().selection().contains(&id));
        assert_eq!(scene.tree().flatten_waypoints().len(), 3);
        assert_eq!(backend.contexts[0]["properties"]["spacing"], json!(1.0));
    }

    #[test]
    fn context_keeps_only_declared_slots() {
        let mut scene = SceneState::default();
        scene.activate_generator(plugin(false));
        let rect = OrientedRect::new(Point::new(1.0, 2.0), 3.0, 4.0, 0.0);
        scene.set_input_value("area", InputValue::Rectangle(rect)).unwrap();
        scene.scratch.set("stale", InputValue::Point(Transform::at(0.0, 0.0)));

        let context = scene.generator_context(json!({})).unwrap();
        let data = context["interaction_data"].as_object().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["area"]["width"], json!(3.0));
        assert!(context.get("selected_points").is_none());
    }

    #[test]
    fn selection_required() {
        let mut scene = SceneState::default();
        let a = Node::manual(Transform::at(1.0, 0.0));
        let b = Node::manual(Transform::at(2.0, 0.0));
        let (a, b) = {
            let ids = (a.id, b.id);
            scene.add_node(a, None);
            scene.add_node(b, None);
            ids
        };
        scene.activate_generator(plugin(true));

        let err = scene.generator_context(json!({})).unwrap_err();
        assert!(matches!(err, GeneratorError::SelectionRequired));
        assert_eq!(
            err.to_string(),
            "this plugin requires selecting waypoint(s) on the canvas first"
        );

        // Selection order does not matter; path order does
        scene.select_nodes(&[b, a], false);
        let context = scene.generator_context(json!({})).unwrap();
        let points = context["selected_points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["x"], json!(1.0));
        assert_eq!(points[1]["x"], json!(2.0));
    }

    #[test]
    fn failures_leave_tree_untouched() {
        let mut scene = SceneState::default();
        scene.add_node(Node::manual(Transform::at(0.0, 0.0)), None);
        scene.activate_generator(plugin(false));

        let err = scene.run_generator(&mut FailingBackend, json!({})).unwrap_err();
        assert_eq!(err.to_string(), "generator 'sweep' failed: exit status 1");
        assert_eq!(scene.tree().len(), 1);

        let err = scene
            .run_generator(&mut LineBackend::new(0), json!({}))
            .unwrap_err();
        assert_eq!(err.to_string(), "generator 'sweep' returned 0 waypoints");
        assert_eq!(scene.tree().len(), 1);
    }

    #[test]
    fn no_active_generator() {
        let mut scene = SceneState::default();
        let err = scene
            .run_generator(&mut LineBackend::new(1), json!({}))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::NoActiveGenerator));
    }

    #[test]
    fn regeneration_replaces_children() {
        let mut scene = SceneState::default();
        scene.activate_generator(plugin(false));
        let area = OrientedRect::new(Point::new(0.0, 0.0), 2.0, 2.0, 0.0);
        scene.set_input_value("area", InputValue::Rectangle(area)).unwrap();

        let id = scene
            .run_generator(&mut LineBackend::new(2), json!({"spacing": 1.0}))
            .unwrap();
        let old = generator_children(&scene, id);
        assert_eq!(old.len(), 2);

        let mut backend = LineBackend::new(5);
        scene
            .regenerate(&mut backend, id, json!({"spacing": 0.25}))
            .unwrap();

        let new = generator_children(&scene, id);
        assert_eq!(new.len(), 5);
        assert!(old.iter().all(|c| !scene.tree().contains(*c) && !new.contains(c)));
        assert_eq!(scene.tree().len(), 6);

        let Node {
            kind: NodeKind::Generator { params, .. },
            ..
        } = scene.tree().get(id).unwrap()
        else {
            panic!("expected a generator");
        };
        assert_eq!(params["properties"]["spacing"], json!(0.25));
        assert_eq!(params["interaction_data"]["area"]["width"], json!(2.0));
        assert_eq!(backend.contexts[0], *params);
    }

    #[test]
    fn failed_regeneration_keeps_old_children() {
        let mut scene = SceneState::default();
        scene.activate_generator(plugin(false));
        let id = scene
            .run_generator(&mut LineBackend::new(2), json!({"spacing": 1.0}))
            .unwrap();
        let old = generator_children(&scene, id);

        assert!(scene.regenerate(&mut FailingBackend, id, json!({})).is_err());
        assert!(scene.regenerate(&mut LineBackend::new(0), id, json!({})).is_err());
        assert_eq!(generator_children(&scene, id), old);

        let manual = old[0];
        assert!(matches!(
            scene.regenerate(&mut LineBackend::new(1), manual, json!({})),
            Err(GeneratorError::NotAGenerator(_))
        ));
    }
}
