//! In-memory reference implementation of [`AnimatedScene`].
//!
//! `MemoryScene` models just enough of a host scene to run switches
//! end to end: named transform nodes with translate/rotate/scale channels,
//! linear animation curves, parents that can follow a space driver
//! attribute, a time cursor, and undo/viewport bookkeeping. It serializes to
//! JSON so scenes can be kept as snapshot files.
//!
//! Writes to a keyed channel behave like a host scene: the new value holds
//! until the time cursor moves, unless it is keyed first.

mod curve;
mod transform;

pub use curve::{AnimCurve, Keyframe};
pub use transform::{degrees_from_quat, quat_from_degrees};

use std::collections::BTreeMap;

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};
use spaceswitch_spec::{Pose, RotateOrder};

use crate::error::{SceneError, SceneResult};
use crate::scene::{AnimatedScene, ConstraintKind, NodeType};

/// Deepest parent chain evaluated before assuming a cycle.
const MAX_PARENT_DEPTH: usize = 64;

const KEY_TIME_EPSILON: f64 = 1e-6;

/// Default value of a transform channel, or `None` for other attributes.
fn transform_channel_default(attribute: &str) -> Option<f64> {
    match attribute {
        "translateX" | "translateY" | "translateZ" => Some(0.0),
        "rotateX" | "rotateY" | "rotateZ" => Some(0.0),
        "scaleX" | "scaleY" | "scaleZ" => Some(1.0),
        _ => None,
    }
}

fn default_playback_range() -> [f64; 2] {
    [1.0, 120.0]
}

// =============================================================================
// Nodes
// =============================================================================

/// How a node's parent is chosen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParentBinding {
    /// No parent.
    #[default]
    World,
    /// A fixed parent node.
    Node { node: String },
    /// Parent picked by a driver attribute: the option whose value is
    /// closest to the driver's current value wins.
    Space {
        node: String,
        attribute: String,
        spaces: Vec<SpaceOption>,
    },
}

/// One selectable parent of a [`ParentBinding::Space`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpaceOption {
    /// Driver value selecting this parent.
    pub value: f64,
    /// Parent node, or `None` for world.
    #[serde(default)]
    pub parent: Option<String>,
}

impl SpaceOption {
    /// Creates a space option.
    pub fn new(value: f64, parent: Option<&str>) -> Self {
        Self {
            value,
            parent: parent.map(str::to_string),
        }
    }
}

/// A node of the in-memory scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryNode {
    /// Type tag.
    #[serde(default)]
    pub kind: NodeType,
    /// Rotate order of the rotate channels.
    #[serde(default)]
    pub rotate_order: RotateOrder,
    /// Parent binding.
    #[serde(default)]
    pub parent: ParentBinding,
    /// Channels by attribute name. Missing transform channels read as
    /// identity.
    #[serde(default)]
    pub channels: BTreeMap<String, AnimCurve>,
}

impl MemoryNode {
    /// Creates a transform node at the origin.
    pub fn transform() -> Self {
        Self::default()
    }

    /// Creates a joint node at the origin.
    pub fn joint() -> Self {
        Self {
            kind: NodeType::Joint,
            ..Self::default()
        }
    }

    /// Creates a node without a transform, e.g. a settings node.
    pub fn other() -> Self {
        Self {
            kind: NodeType::Other,
            ..Self::default()
        }
    }

    /// Sets the parent binding.
    pub fn with_parent(mut self, parent: ParentBinding) -> Self {
        self.parent = parent;
        self
    }

    /// Parents under a fixed node.
    pub fn with_parent_node(self, parent: &str) -> Self {
        self.with_parent(ParentBinding::Node {
            node: parent.to_string(),
        })
    }

    /// Sets the rotate order.
    pub fn with_rotate_order(mut self, order: RotateOrder) -> Self {
        self.rotate_order = order;
        self
    }

    /// Adds or replaces a channel.
    pub fn with_channel(mut self, attribute: &str, curve: AnimCurve) -> Self {
        self.channels.insert(attribute.to_string(), curve);
        self
    }

    /// Sets static local translation.
    pub fn with_translation(self, translation: [f64; 3]) -> Self {
        self.with_channel("translateX", AnimCurve::constant(translation[0]))
            .with_channel("translateY", AnimCurve::constant(translation[1]))
            .with_channel("translateZ", AnimCurve::constant(translation[2]))
    }

    /// Sets static local rotation in degrees.
    pub fn with_rotation(self, rotation: [f64; 3]) -> Self {
        self.with_channel("rotateX", AnimCurve::constant(rotation[0]))
            .with_channel("rotateY", AnimCurve::constant(rotation[1]))
            .with_channel("rotateZ", AnimCurve::constant(rotation[2]))
    }

    fn default_value(&self, attribute: &str) -> Option<f64> {
        if self.kind.is_transform() {
            transform_channel_default(attribute)
        } else {
            None
        }
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        self.channels.contains_key(attribute) || self.default_value(attribute).is_some()
    }
}

// =============================================================================
// Scene
// =============================================================================

/// A serializable scene held entirely in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryScene {
    #[serde(default)]
    current_time: f64,
    #[serde(default = "default_playback_range")]
    playback_range: [f64; 2],
    #[serde(default)]
    nodes: BTreeMap<String, MemoryNode>,
    #[serde(skip)]
    overrides: BTreeMap<(String, String), f64>,
    #[serde(skip)]
    undo_depth: usize,
    #[serde(skip)]
    undo_chunks: usize,
    #[serde(skip)]
    viewport_depth: usize,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            playback_range: default_playback_range(),
            nodes: BTreeMap::new(),
            overrides: BTreeMap::new(),
            undo_depth: 0,
            undo_chunks: 0,
            viewport_depth: 0,
        }
    }
}

impl MemoryScene {
    /// Creates an empty scene at frame 0 with a 1..120 playback range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a scene snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes a scene snapshot. Unkeyed writes are included, pending
    /// writes to keyed channels are not.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Sets the playback range.
    pub fn with_playback_range(mut self, start: f64, end: f64) -> Self {
        self.playback_range = [start, end];
        self
    }

    /// Sets the time cursor.
    pub fn with_current_time(mut self, time: f64) -> Self {
        self.current_time = time;
        self
    }

    /// Adds a node, builder style.
    pub fn with_node(mut self, name: &str, node: MemoryNode) -> Self {
        self.add_node(name, node);
        self
    }

    /// Adds or replaces a node.
    pub fn add_node(&mut self, name: &str, node: MemoryNode) {
        self.nodes.insert(name.to_string(), node);
    }

    /// Removes a node, returning it.
    pub fn remove_node(&mut self, name: &str) -> Option<MemoryNode> {
        self.overrides.retain(|(node, _), _| node != name);
        self.nodes.remove(name)
    }

    /// Returns a node by name.
    pub fn node(&self, name: &str) -> Option<&MemoryNode> {
        self.nodes.get(name)
    }

    /// Value of an attribute at the current time, if it exists.
    pub fn value(&self, node: &str, attribute: &str) -> Option<f64> {
        self.channel_value(node, attribute).ok()
    }

    /// Key times of one channel.
    pub fn key_times(&self, node: &str, attribute: &str) -> Vec<f64> {
        self.nodes
            .get(node)
            .and_then(|n| n.channels.get(attribute))
            .map(|curve| curve.key_times().collect())
            .unwrap_or_default()
    }

    /// Number of currently open undo chunks.
    pub fn undo_depth(&self) -> usize {
        self.undo_depth
    }

    /// Number of undo chunks opened and closed so far.
    pub fn completed_undo_chunks(&self) -> usize {
        self.undo_chunks
    }

    /// Returns true while viewport redraws are suppressed.
    pub fn viewport_suppressed(&self) -> bool {
        self.viewport_depth > 0
    }

    fn node_ref(&self, name: &str) -> SceneResult<&MemoryNode> {
        self.nodes.get(name).ok_or_else(|| SceneError::NodeNotFound {
            name: name.to_string(),
        })
    }

    fn transform_node(&self, name: &str) -> SceneResult<&MemoryNode> {
        let node = self.node_ref(name)?;
        if node.kind.is_transform() {
            Ok(node)
        } else {
            Err(SceneError::NotTransform {
                node: name.to_string(),
            })
        }
    }

    fn missing_attribute(node: &str, attribute: &str) -> SceneError {
        SceneError::AttributeNotFound {
            node: node.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Keyed or static value at `time`, ignoring pending writes.
    fn curve_value(&self, name: &str, attribute: &str, time: f64) -> SceneResult<f64> {
        let node = self.node_ref(name)?;
        match node.channels.get(attribute) {
            Some(curve) => Ok(curve.evaluate(time)),
            None => node
                .default_value(attribute)
                .ok_or_else(|| Self::missing_attribute(name, attribute)),
        }
    }

    fn channel_value(&self, name: &str, attribute: &str) -> SceneResult<f64> {
        if let Some(value) = self
            .overrides
            .get(&(name.to_string(), attribute.to_string()))
        {
            return Ok(*value);
        }
        self.curve_value(name, attribute, self.current_time)
    }

    fn write_channel(&mut self, name: &str, attribute: &str, value: f64) -> SceneResult<()> {
        let node = self
            .nodes
            .get_mut(name)
            .ok_or_else(|| SceneError::NodeNotFound {
                name: name.to_string(),
            })?;
        let default = match node.channels.get(attribute) {
            Some(_) => 0.0,
            None => node
                .default_value(attribute)
                .ok_or_else(|| Self::missing_attribute(name, attribute))?,
        };
        let curve = node
            .channels
            .entry(attribute.to_string())
            .or_insert_with(|| AnimCurve::constant(default));
        if curve.is_animated() {
            self.overrides
                .insert((name.to_string(), attribute.to_string()), value);
        } else {
            curve.value = value;
        }
        Ok(())
    }

    fn vector(&self, name: &str, prefix: &str) -> SceneResult<[f64; 3]> {
        Ok([
            self.channel_value(name, &format!("{prefix}X"))?,
            self.channel_value(name, &format!("{prefix}Y"))?,
            self.channel_value(name, &format!("{prefix}Z"))?,
        ])
    }

    fn write_vector(&mut self, name: &str, prefix: &str, values: [f64; 3]) -> SceneResult<()> {
        for (axis, value) in ["X", "Y", "Z"].iter().zip(values) {
            self.write_channel(name, &format!("{prefix}{axis}"), value)?;
        }
        Ok(())
    }

    fn local_matrix(&self, name: &str) -> SceneResult<DAffine3> {
        let node = self.transform_node(name)?;
        Ok(transform::local_matrix(
            self.vector(name, "translate")?,
            self.vector(name, "rotate")?,
            self.vector(name, "scale")?,
            node.rotate_order,
        ))
    }

    fn parent_of(&self, name: &str) -> SceneResult<Option<String>> {
        match &self.node_ref(name)?.parent {
            ParentBinding::World => Ok(None),
            ParentBinding::Node { node } => Ok(Some(node.clone())),
            ParentBinding::Space {
                node,
                attribute,
                spaces,
            } => {
                let driver = self.channel_value(node, attribute)?;
                let distance = |option: &SpaceOption| (option.value - driver).abs();
                Ok(spaces
                    .iter()
                    .min_by(|a, b| distance(a).total_cmp(&distance(b)))
                    .and_then(|option| option.parent.clone()))
            }
        }
    }

    fn world_matrix(&self, name: &str) -> SceneResult<DAffine3> {
        let mut matrix = self.local_matrix(name)?;
        let mut parent = self.parent_of(name)?;
        let mut depth = 0;
        while let Some(current) = parent {
            depth += 1;
            if depth > MAX_PARENT_DEPTH {
                return Err(SceneError::failed(format!(
                    "parent chain of '{name}' is cyclic or deeper than {MAX_PARENT_DEPTH}"
                )));
            }
            matrix = self.local_matrix(&current)? * matrix;
            parent = self.parent_of(&current)?;
        }
        Ok(matrix)
    }

    fn parent_matrix(&self, name: &str) -> SceneResult<DAffine3> {
        match self.parent_of(name)? {
            Some(parent) => self.world_matrix(&parent),
            None => Ok(DAffine3::IDENTITY),
        }
    }
}

impl AnimatedScene for MemoryScene {
    type Node = String;

    fn resolve_node(&self, name: &str) -> SceneResult<String> {
        self.node_ref(name).map(|_| name.to_string())
    }

    fn node_type(&self, node: &String) -> NodeType {
        self.nodes.get(node).map_or(NodeType::Other, |n| n.kind)
    }

    fn rotate_order(&self, node: &String) -> RotateOrder {
        self.nodes
            .get(node)
            .map_or(RotateOrder::default(), |n| n.rotate_order)
    }

    fn attribute_exists(&self, node: &String, attribute: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.has_attribute(attribute))
    }

    fn get_attr(&self, node: &String, attribute: &str) -> SceneResult<f64> {
        self.channel_value(node, attribute)
    }

    fn set_attr(&mut self, node: &String, attribute: &str, value: f64) -> SceneResult<()> {
        self.write_channel(node, attribute, value)
    }

    fn set_keyframe(
        &mut self,
        node: &String,
        attribute: &str,
        time: Option<f64>,
    ) -> SceneResult<()> {
        let key_time = time.unwrap_or(self.current_time);
        let at_cursor = (key_time - self.current_time).abs() <= KEY_TIME_EPSILON;
        let value = if at_cursor {
            self.channel_value(node, attribute)?
        } else {
            self.curve_value(node, attribute, key_time)?
        };

        let default = self
            .node_ref(node)?
            .default_value(attribute)
            .unwrap_or(value);
        if let Some(n) = self.nodes.get_mut(node) {
            n.channels
                .entry(attribute.to_string())
                .or_insert_with(|| AnimCurve::constant(default))
                .set_key(key_time, value);
        }
        if at_cursor {
            self.overrides
                .remove(&(node.clone(), attribute.to_string()));
        }
        Ok(())
    }

    fn world_transform(&self, node: &String) -> SceneResult<Pose> {
        let order = self.transform_node(node)?.rotate_order;
        let (_, rotation, translation) = self.world_matrix(node)?.to_scale_rotation_translation();
        Ok(Pose::new(
            translation.to_array(),
            degrees_from_quat(order, rotation),
        ))
    }

    fn set_world_translation(&mut self, node: &String, position: [f64; 3]) -> SceneResult<()> {
        self.transform_node(node)?;
        let parent = self.parent_matrix(node)?;
        let local = parent
            .inverse()
            .transform_point3(DVec3::from_array(position));
        self.write_vector(node, "translate", local.to_array())
    }

    fn set_world_rotation(&mut self, node: &String, rotation: [f64; 3]) -> SceneResult<()> {
        let order = self.transform_node(node)?.rotate_order;
        let (_, parent_rotation, _) = self.parent_matrix(node)?.to_scale_rotation_translation();
        let local = parent_rotation.inverse() * quat_from_degrees(order, rotation);
        self.write_vector(node, "rotate", degrees_from_quat(order, local))
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, time: f64) -> SceneResult<()> {
        if time != self.current_time {
            self.overrides.clear();
            self.current_time = time;
        }
        Ok(())
    }

    fn existing_key_times(&self, nodes: &[String]) -> Vec<f64> {
        let mut times: Vec<f64> = nodes
            .iter()
            .filter_map(|name| self.nodes.get(name))
            .flat_map(|node| node.channels.values())
            .flat_map(|curve| curve.key_times())
            .collect();
        times.sort_by(f64::total_cmp);
        times.dedup_by(|a, b| (*a - *b).abs() <= KEY_TIME_EPSILON);
        times
    }

    fn playback_range(&self) -> (f64, f64) {
        (self.playback_range[0], self.playback_range[1])
    }

    fn begin_undo_chunk(&mut self) {
        self.undo_depth += 1;
    }

    fn end_undo_chunk(&mut self) {
        if self.undo_depth > 0 {
            self.undo_depth -= 1;
            self.undo_chunks += 1;
        }
    }

    fn suppress_viewport(&mut self) {
        self.viewport_depth += 1;
    }

    fn restore_viewport(&mut self) {
        self.viewport_depth = self.viewport_depth.saturating_sub(1);
    }

    fn probe_via_constraint(
        &mut self,
        driver: &String,
        driven: &String,
        kind: ConstraintKind,
    ) -> SceneResult<Pose> {
        self.transform_node(driver)?;
        let order = self.transform_node(driven)?.rotate_order;
        let current = self.world_transform(driven)?;
        let (_, rotation, translation) = self.world_matrix(driver)?.to_scale_rotation_translation();

        let position = translation.to_array();
        let rotation = degrees_from_quat(order, rotation);
        let pose = match kind {
            ConstraintKind::Parent => Pose::new(position, rotation),
            ConstraintKind::Point => Pose::new(position, current.rotation),
            ConstraintKind::Orient => Pose::new(current.position, rotation),
        };
        log::debug!("probed {} -> {}: {:?}", driver, driven, pose);
        Ok(pose)
    }
}
