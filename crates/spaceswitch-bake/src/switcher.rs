//! One complete switch: prepare, capture, execute, release.

use serde::Serialize;
use spaceswitch_spec::{BakeRequest, SwitchSettings, SwitchSpec};

use crate::error::BakeResult;
use crate::executor::execute;
use crate::guard::SceneGuard;
use crate::planner::{Advisory, TransitionPlanner};
use crate::scene::AnimatedScene;
use crate::step::TransitionPlan;

/// Outcome of a successful switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchReport {
    /// The steps that were executed.
    pub plan: TransitionPlan,
    /// Non-fatal findings.
    pub advisories: Vec<Advisory>,
}

/// Plans and executes switches.
#[derive(Debug, Clone, Default)]
pub struct Switcher {
    planner: TransitionPlanner,
}

impl Switcher {
    /// Creates a switcher.
    pub fn new(settings: SwitchSettings) -> Self {
        Self {
            planner: TransitionPlanner::new(settings),
        }
    }

    /// Returns the underlying planner.
    pub fn planner(&self) -> &TransitionPlanner {
        &self.planner
    }

    /// Runs a switch.
    ///
    /// Validation, reference and sample-set errors are returned before the
    /// scene is touched. Once capturing starts the whole run sits inside one
    /// undo chunk with viewport redraws off; a failure stops the remaining
    /// steps and still closes both.
    pub fn run<S: AnimatedScene + ?Sized>(
        &self,
        scene: &mut S,
        spec: &SwitchSpec,
        request: &BakeRequest,
    ) -> BakeResult<SwitchReport> {
        log::info!("{} ({})", spec.mode_name(), request.mode);
        let prepared = self.planner.prepare(scene, spec, request)?;

        let start_time = scene.current_time();
        let plan = {
            let mut guard = SceneGuard::acquire(scene);
            let plan = self.planner.build(&mut *guard, spec, &prepared)?;
            execute(&mut *guard, &plan)?;

            if self.planner.settings().restore_time && guard.current_time() != start_time {
                if let Err(err) = guard.set_current_time(start_time) {
                    log::warn!("could not return to frame {}: {}", start_time, err);
                }
            }
            plan
        };

        log::info!("switch finished: {} steps", plan.len());
        Ok(SwitchReport {
            plan,
            advisories: prepared.advisories,
        })
    }
}
