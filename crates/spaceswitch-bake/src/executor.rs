//! Runs a plan against a scene.

use crate::capture::{apply, key_channels};
use crate::error::{BakeError, BakeResult, SceneResult};
use crate::ikfk::settle_wrist;
use crate::scene::AnimatedScene;
use crate::step::{PoseAction, PoseTarget, TransitionPlan, TransitionStep};

/// Executes every step in order.
///
/// Stops at the first failure and reports it as [`BakeError::Mutation`] with
/// the failing step's time. Steps already executed stay applied.
pub fn execute<S: AnimatedScene + ?Sized>(scene: &mut S, plan: &TransitionPlan) -> BakeResult<()> {
    for (index, step) in plan.steps.iter().enumerate() {
        log::debug!(
            "step {}/{}: {} at {}",
            index + 1,
            plan.steps.len(),
            step.role,
            step.time
        );
        execute_step(scene, step).map_err(|source| BakeError::Mutation {
            time: step.time,
            source,
        })?;
    }
    Ok(())
}

/// Executes a single step.
pub fn execute_step<S: AnimatedScene + ?Sized>(
    scene: &mut S,
    step: &TransitionStep,
) -> SceneResult<()> {
    scene.set_current_time(step.time)?;

    for driver in &step.set_drivers {
        let node = scene.resolve_node(&driver.node)?;
        scene.set_attr(&node, &driver.attribute, driver.value)?;
        scene.set_keyframe(&node, &driver.attribute, None)?;
    }
    for driver in &step.key_drivers {
        let node = scene.resolve_node(&driver.node)?;
        scene.set_keyframe(&node, &driver.attribute, None)?;
    }
    for target in &step.targets {
        apply_target(scene, target)?;
    }
    Ok(())
}

fn apply_target<S: AnimatedScene + ?Sized>(scene: &mut S, target: &PoseTarget) -> SceneResult<()> {
    let node = scene.resolve_node(target.control.name())?;
    match &target.action {
        PoseAction::Hold => {}
        PoseAction::Apply { pose } => apply(scene, &node, pose)?,
        PoseAction::Translate { position } => scene.set_world_translation(&node, *position)?,
        PoseAction::Rotate { rotation } => scene.set_world_rotation(&node, *rotation)?,
        PoseAction::Probe {
            driver,
            seed,
            iterations,
        } => {
            let driver = scene.resolve_node(driver.name())?;
            settle_wrist(scene, &driver, &node, seed, *iterations)?;
        }
    }
    key_channels(scene, &node, target.channels, None)
}
