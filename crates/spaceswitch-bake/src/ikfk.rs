//! IK/FK pose reconstruction.
//!
//! IK to FK is a plain read: the skeleton is ground truth and FK controls
//! only need its world rotations. FK to IK needs the IK handle's wrist pose,
//! read through a temporary parent constraint because direct matrix reads
//! flip on some rigs, and a pole-vector position derived from the three joint
//! positions.

use glam::DVec3;
use serde::Serialize;
use spaceswitch_spec::{ControlRef, IkFkSwitchSpec, Pose, SwitchSettings};

use crate::capture::{apply, read_world_pose};
use crate::error::SceneResult;
use crate::scene::{AnimatedScene, ConstraintKind};

/// Places the pole-vector control.
///
/// `M = S + (W - S) * 0.5` is the shoulder-wrist midpoint; the pole sits at
/// `M + (E - M) * distance`.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use spaceswitch_bake::ikfk::pole_vector_position;
///
/// let pole = pole_vector_position(
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(0.0, 5.0, 5.0),
///     DVec3::new(0.0, 0.0, 10.0),
///     4.0,
/// );
/// assert_eq!(pole, DVec3::new(0.0, 20.0, 5.0));
/// ```
pub fn pole_vector_position(shoulder: DVec3, elbow: DVec3, wrist: DVec3, distance: f64) -> DVec3 {
    let midpoint = shoulder + (wrist - shoulder) * 0.5;
    midpoint + (elbow - midpoint) * distance
}

/// FK targets: world rotations of shoulder, elbow and wrist joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FkMatch {
    pub rotations: [[f64; 3]; 3],
}

/// IK targets: wrist handle pose and pole-vector position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IkMatch {
    /// First probe of the wrist pose, refined again after the switch.
    pub wrist: Pose,
    pub pole: [f64; 3],
}

/// Computes IK/FK match targets at the current time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkFkReconstructor {
    pole_distance: f64,
}

impl IkFkReconstructor {
    /// Creates a reconstructor with an explicit pole distance.
    pub fn new(pole_distance: f64) -> Self {
        Self { pole_distance }
    }

    /// Creates a reconstructor from switch settings.
    pub fn from_settings(settings: &SwitchSettings) -> Self {
        Self::new(settings.pole_distance)
    }

    /// Reads the three joint world rotations.
    pub fn ik_to_fk<S: AnimatedScene + ?Sized>(
        &self,
        scene: &S,
        spec: &IkFkSwitchSpec,
    ) -> SceneResult<FkMatch> {
        let mut rotations = [[0.0; 3]; 3];
        for (slot, joint) in rotations.iter_mut().zip(spec.joints()) {
            let node = scene.resolve_node(joint.name())?;
            *slot = read_world_pose(scene, &node)?.rotation;
        }
        Ok(FkMatch { rotations })
    }

    /// Probes the wrist and places the pole vector.
    pub fn fk_to_ik<S: AnimatedScene + ?Sized>(
        &self,
        scene: &mut S,
        spec: &IkFkSwitchSpec,
    ) -> SceneResult<IkMatch> {
        let [shoulder, elbow, wrist] = spec.joints();
        let shoulder = joint_position(scene, shoulder)?;
        let elbow = joint_position(scene, elbow)?;
        let wrist_position = joint_position(scene, wrist)?;
        let pole = pole_vector_position(shoulder, elbow, wrist_position, self.pole_distance);

        let wrist_joint = scene.resolve_node(spec.wrist_joint.name())?;
        let ik_wrist = scene.resolve_node(spec.ik_wrist.name())?;
        let wrist = scene.probe_via_constraint(&wrist_joint, &ik_wrist, ConstraintKind::Parent)?;

        Ok(IkMatch {
            wrist,
            pole: pole.to_array(),
        })
    }
}

fn joint_position<S: AnimatedScene + ?Sized>(scene: &S, joint: &ControlRef) -> SceneResult<DVec3> {
    let node = scene.resolve_node(joint.name())?;
    Ok(DVec3::from_array(read_world_pose(scene, &node)?.position))
}

/// Applies `seed` to the IK wrist, then re-probes and re-applies
/// `iterations - 1` more times. Returns the pose applied last.
///
/// Two passes settle the wrist on the rigs this has been checked against;
/// why one is not enough is unknown.
pub fn settle_wrist<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    wrist_joint: &S::Node,
    ik_wrist: &S::Node,
    seed: &Pose,
    iterations: u32,
) -> SceneResult<Pose> {
    apply(scene, ik_wrist, seed)?;
    let mut pose = *seed;
    for pass in 1..iterations {
        pose = scene.probe_via_constraint(wrist_joint, ik_wrist, ConstraintKind::Parent)?;
        log::debug!("wrist probe pass {}: {:?}", pass + 1, pose);
        apply(scene, ik_wrist, &pose)?;
    }
    Ok(pose)
}
