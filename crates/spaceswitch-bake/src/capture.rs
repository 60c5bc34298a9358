//! Pose capture, apply and channel keying primitives.

use spaceswitch_spec::{ChannelMask, Pose};

use crate::error::{SceneError, SceneResult};
use crate::scene::AnimatedScene;

/// Reads the world pose of `node` at `time`, moving the time cursor if needed.
pub fn capture<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    node: &S::Node,
    time: f64,
) -> SceneResult<Pose> {
    if scene.current_time() != time {
        scene.set_current_time(time)?;
    }
    read_world_pose(scene, node)
}

/// Reads the world pose of `node` at the current time.
///
/// Fails with [`SceneError::NotTransform`] instead of returning a
/// meaningless pose for nodes without a transform.
pub fn read_world_pose<S: AnimatedScene + ?Sized>(scene: &S, node: &S::Node) -> SceneResult<Pose> {
    if !scene.node_type(node).is_transform() {
        log::warn!("cannot capture {:?}: not a transform", node);
        return Err(SceneError::NotTransform {
            node: format!("{:?}", node),
        });
    }
    scene.world_transform(node)
}

/// Forces `node` to a world pose, translation first.
pub fn apply<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    node: &S::Node,
    pose: &Pose,
) -> SceneResult<()> {
    scene.set_world_transform(node, pose)
}

/// Keys the selected transform channels of `node`.
pub fn key_channels<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    node: &S::Node,
    channels: ChannelMask,
    time: Option<f64>,
) -> SceneResult<()> {
    for attribute in channels.attribute_names() {
        scene.set_keyframe(node, attribute, time)?;
    }
    Ok(())
}
